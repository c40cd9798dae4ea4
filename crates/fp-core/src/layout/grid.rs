//! Layout grid: per-cell type and room id over the container
//!
//! Generation owns the grid mutably. Once a layout is returned, consumers
//! only see the read-only query surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::CellType;
use super::rect::{Pos, Rect};
use super::room::RoomId;

/// `room_id_at` value for an in-bounds cell that belongs to no room
pub const NO_ROOM: i32 = -1;

/// `room_id_at` value for a position outside the grid
pub const OUT_OF_BOUNDS: i32 = -2;

/// Dense cell grid covering the container rect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGrid {
    bounds: Rect,
    cells: Vec<CellType>,
    room_ids: Vec<i32>,
}

impl LayoutGrid {
    /// Create an all-empty grid over `bounds`
    pub fn new(bounds: Rect) -> Self {
        let len = bounds.area() as usize;
        Self {
            bounds,
            cells: vec![CellType::Empty; len],
            room_ids: vec![NO_ROOM; len],
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let x = (pos.0 - self.bounds.min_x) as usize;
        let z = (pos.1 - self.bounds.min_z) as usize;
        Some(z * self.bounds.width() as usize + x)
    }

    /// Cell type, `None` outside the grid
    pub fn cell_type(&self, pos: Pos) -> Option<CellType> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub(crate) fn set_cell_type(&mut self, pos: Pos, cell_type: CellType) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell_type;
        }
    }

    pub(crate) fn set_room_id(&mut self, pos: Pos, id: RoomId) {
        if let Some(i) = self.index(pos) {
            self.room_ids[i] = id as i32;
        }
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.cell_type(pos).is_some_and(|c| c.is_wall())
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.cell_type(pos).is_some_and(|c| c.is_floor())
    }

    pub fn is_door(&self, pos: Pos) -> bool {
        self.cell_type(pos).is_some_and(|c| c.is_door())
    }

    /// True for empty cells and anything out of bounds
    pub fn is_outside(&self, pos: Pos) -> bool {
        self.cell_type(pos).is_none_or(|c| c.is_empty())
    }

    /// Room id at `pos`: [`OUT_OF_BOUNDS`] off the grid, [`NO_ROOM`] if unowned
    pub fn room_id_at(&self, pos: Pos) -> i32 {
        self.index(pos).map_or(OUT_OF_BOUNDS, |i| self.room_ids[i])
    }

    /// Owning room at `pos`, if any
    pub fn room_at(&self, pos: Pos) -> Option<RoomId> {
        usize::try_from(self.room_id_at(pos)).ok()
    }

    /// Every position of the grid, row by row from the south
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        self.bounds.cells()
    }

    /// Number of cells of the given type
    pub fn count(&self, cell_type: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell_type).count()
    }

    /// ASCII rendering, northern row first
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width() + 1) * self.height()) as usize);
        for z in (self.bounds.min_z..=self.bounds.max_z).rev() {
            for x in self.bounds.min_x..=self.bounds.max_x {
                out.push(self.cell_type((x, z)).unwrap_or_default().symbol());
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for LayoutGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_outside() {
        let grid = LayoutGrid::new(Rect::new(0, 0, 9, 4));
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.count(CellType::Empty), 50);
        assert!(grid.is_outside((3, 3)));
        assert_eq!(grid.room_id_at((3, 3)), NO_ROOM);
        assert_eq!(grid.room_at((3, 3)), None);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let grid = LayoutGrid::new(Rect::new(5, 5, 9, 9));
        assert!(grid.is_outside((0, 0)));
        assert!(!grid.is_wall((0, 0)));
        assert!(!grid.is_floor((10, 5)));
        assert_eq!(grid.room_id_at((4, 5)), OUT_OF_BOUNDS);
        assert_eq!(grid.cell_type((9, 10)), None);
    }

    #[test]
    fn test_offset_origin_indexing() {
        let mut grid = LayoutGrid::new(Rect::new(-3, 10, 2, 14));
        grid.set_cell_type((-3, 10), CellType::Wall);
        grid.set_cell_type((2, 14), CellType::Door);
        grid.set_room_id((2, 14), 4);

        assert!(grid.is_wall((-3, 10)));
        assert!(grid.is_door((2, 14)));
        assert_eq!(grid.room_at((2, 14)), Some(4));
        assert_eq!(grid.room_id_at((2, 13)), NO_ROOM);
    }

    #[test]
    fn test_ascii_north_first() {
        let mut grid = LayoutGrid::new(Rect::new(0, 0, 2, 1));
        grid.set_cell_type((0, 1), CellType::Wall);
        grid.set_cell_type((1, 0), CellType::Floor);
        grid.set_cell_type((2, 0), CellType::Door);
        assert_eq!(grid.to_ascii(), "#  \n .+\n");
        assert_eq!(grid.to_string(), grid.to_ascii());
    }
}
