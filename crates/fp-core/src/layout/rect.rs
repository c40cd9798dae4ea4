//! Integer rectangles on the layout grid
//!
//! Bounds are inclusive on both ends, so a rect with `min_x == max_x` is one
//! cell wide. Rects produced by splitting share their cut line, which later
//! becomes the wall between the two halves.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Grid position as `(x, z)`
pub type Pos = (i32, i32);

/// Diagonal neighbour offsets
pub const DIAGONALS: [Pos; 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Cardinal direction; north is `+z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset of one step in this direction
    pub const fn offset(self) -> Pos {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Position one step from `pos`
    pub const fn step(self, pos: Pos) -> Pos {
        let (dx, dz) = self.offset();
        (pos.0 + dx, pos.1 + dz)
    }
}

/// Axis-aligned rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Western column
    pub min_x: i32,
    /// Southern row
    pub min_z: i32,
    /// Eastern column
    pub max_x: i32,
    /// Northern row
    pub max_z: i32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        debug_assert!(
            min_x <= max_x && min_z <= max_z,
            "inverted rect bounds ({min_x}, {min_z})..({max_x}, {max_z})"
        );
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }

    /// Create a rectangle from its south-west corner and size
    pub fn from_size(x: i32, z: i32, width: i32, height: i32) -> Self {
        Self::new(x, z, x + width - 1, z + height - 1)
    }

    /// Check that min <= max on both axes
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_z <= self.max_z
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_z - self.min_z + 1
    }

    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    /// Center cell, rounded towards the south-west
    pub fn center(&self) -> Pos {
        (
            self.min_x + (self.max_x - self.min_x) / 2,
            self.min_z + (self.max_z - self.min_z) / 2,
        )
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 >= self.min_x && pos.0 <= self.max_x && pos.1 >= self.min_z && pos.1 <= self.max_z
    }

    /// Check if this rectangle contains another
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_z <= other.min_z
            && self.max_z >= other.max_z
    }

    /// Check if the two rectangles share at least one cell
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_z < other.min_z
            || self.min_z > other.max_z)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }

        Some(Rect::new(
            self.min_x.max(other.min_x),
            self.min_z.max(other.min_z),
            self.max_x.min(other.max_x),
            self.max_z.min(other.max_z),
        ))
    }

    /// Grow by `n` cells on every side
    pub fn expanded_by(&self, n: i32) -> Rect {
        Rect::new(self.min_x - n, self.min_z - n, self.max_x + n, self.max_z + n)
    }

    /// Shrink by `n` cells on every side, `None` if nothing is left
    pub fn contracted_by(&self, n: i32) -> Option<Rect> {
        let r = Rect {
            min_x: self.min_x + n,
            min_z: self.min_z + n,
            max_x: self.max_x - n,
            max_z: self.max_z - n,
        };
        r.is_valid().then_some(r)
    }

    /// All cells, row by row from the south
    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let Rect {
            min_x,
            min_z,
            max_x,
            max_z,
        } = *self;
        (min_z..=max_z).flat_map(move |z| (min_x..=max_x).map(move |x| (x, z)))
    }

    /// Cells on the side of the rect facing `dir`
    pub fn edge_cells(&self, dir: Direction) -> impl Iterator<Item = Pos> + use<> {
        let r = *self;
        let (fixed, lo, hi, horizontal) = match dir {
            Direction::North => (r.max_z, r.min_x, r.max_x, true),
            Direction::South => (r.min_z, r.min_x, r.max_x, true),
            Direction::East => (r.max_x, r.min_z, r.max_z, false),
            Direction::West => (r.min_x, r.min_z, r.max_z, false),
        };
        (lo..=hi).map(move |i| if horizontal { (i, fixed) } else { (fixed, i) })
    }

    /// Every border cell exactly once
    pub fn perimeter_cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let r = *self;
        r.cells().filter(move |&p| r.is_on_edge(p))
    }

    pub fn is_corner(&self, pos: Pos) -> bool {
        (pos.0 == self.min_x || pos.0 == self.max_x) && (pos.1 == self.min_z || pos.1 == self.max_z)
    }

    pub fn is_on_edge(&self, pos: Pos) -> bool {
        self.contains(pos)
            && (pos.0 == self.min_x
                || pos.0 == self.max_x
                || pos.1 == self.min_z
                || pos.1 == self.max_z)
    }

    /// Number of empty cells separating the two rects (Chebyshev)
    ///
    /// Zero when they touch or overlap.
    pub fn gap_to(&self, other: &Rect) -> i32 {
        let gx = (other.min_x - self.max_x).max(self.min_x - other.max_x) - 1;
        let gz = (other.min_z - self.max_z).max(self.min_z - other.max_z) - 1;
        gx.max(gz).max(0)
    }

    /// Cut at column `min_x + offset`; both halves keep that column
    pub fn split_x(&self, offset: i32) -> (Rect, Rect) {
        debug_assert!(offset > 0 && offset < self.width() - 1, "split offset {offset} out of range");
        let cut = self.min_x + offset;
        (
            Rect::new(self.min_x, self.min_z, cut, self.max_z),
            Rect::new(cut, self.min_z, self.max_x, self.max_z),
        )
    }

    /// Cut at row `min_z + offset`; both halves keep that row
    pub fn split_z(&self, offset: i32) -> (Rect, Rect) {
        debug_assert!(offset > 0 && offset < self.height() - 1, "split offset {offset} out of range");
        let cut = self.min_z + offset;
        (
            Rect::new(self.min_x, self.min_z, self.max_x, cut),
            Rect::new(self.min_x, cut, self.max_x, self.max_z),
        )
    }

    /// How strongly two rects touch
    ///
    /// Shared border length, plus one for each flush end of that border,
    /// minus three per empty cell separating the rects. Rects more than
    /// `max_gap` cells apart score 0 however long their facing borders are.
    /// Corner-only contact scores 1 and diagonal separation scores 0.
    pub fn adjacency_score(&self, other: &Rect, max_gap: i32) -> i32 {
        if self.gap_to(other) > max_gap {
            return 0;
        }
        let ox = self.max_x.min(other.max_x) - self.min_x.max(other.min_x) + 1;
        let oz = self.max_z.min(other.max_z) - self.min_z.max(other.min_z) + 1;
        let flush_x = i32::from(self.min_x == other.min_x) + i32::from(self.max_x == other.max_x);
        let flush_z = i32::from(self.min_z == other.min_z) + i32::from(self.max_z == other.max_z);

        if ox >= 1 && oz >= 1 {
            return match (ox, oz) {
                (1, 1) => 1,
                (_, 1) => ox + flush_x,
                (1, _) => oz + flush_z,
                _ => ox.max(oz),
            };
        }
        if ox >= 1 {
            return (ox + flush_x - 3 * -oz).max(0);
        }
        if oz >= 1 {
            return (oz + flush_z - 3 * -ox).max(0);
        }
        0
    }
}
