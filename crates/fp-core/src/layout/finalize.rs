//! Wall, floor and room id classification
//!
//! Runs three passes over the grid:
//!
//! 1. Rect edge cells become walls, except where the room continues into
//!    another of its own rects beyond that edge.
//! 2. Every rect cell gets its room id; whatever is not a wall is floor.
//! 3. Artifact cleanup: floor touching the outside is walled up, floor
//!    pockets left on rect edges are walled up, and lone wall stubs inside a
//!    single room are opened.

use tracing::debug;

use super::cell::CellType;
use super::grid::LayoutGrid;
use super::rect::{DIAGONALS, Direction, Pos};
use super::room::{Room, RoomId};

fn offset(pos: Pos, d: Pos) -> Pos {
    (pos.0 + d.0, pos.1 + d.1)
}

fn neighbours8(pos: Pos) -> impl Iterator<Item = Pos> {
    Direction::ALL
        .into_iter()
        .map(move |d| d.step(pos))
        .chain(DIAGONALS.into_iter().map(move |d| offset(pos, d)))
}

fn cardinal_walls(grid: &LayoutGrid, pos: Pos) -> usize {
    Direction::ALL.iter().filter(|d| grid.is_wall(d.step(pos))).count()
}

fn diagonal_walls(grid: &LayoutGrid, pos: Pos) -> usize {
    DIAGONALS.iter().filter(|&&d| grid.is_wall(offset(pos, d))).count()
}

/// Classify every room cell of `grid` and assign room ids
///
/// Room ids are set to the rooms' indices. With `avoid_double_walls` an
/// edge cell is left open when the cell beyond it is already a wall.
pub fn finalize_rooms(grid: &mut LayoutGrid, rooms: &mut [Room], avoid_double_walls: bool) {
    for (id, room) in rooms.iter_mut().enumerate() {
        debug_assert!(!room.rects.is_empty(), "room {id} has no rects");
        room.id = id;
    }

    place_walls(grid, rooms, avoid_double_walls);
    place_floors(grid, rooms);

    let plugged = plug_leaks(grid);
    let slivers = close_slivers(grid, rooms);
    let stubs = open_stubs(grid);
    debug!(
        walls = grid.count(CellType::Wall),
        floors = grid.count(CellType::Floor),
        plugged,
        slivers,
        stubs,
        "finalized rooms"
    );
}

fn place_walls(grid: &mut LayoutGrid, rooms: &[Room], avoid_double_walls: bool) {
    for dir in Direction::ALL {
        for room in rooms {
            for rect in &room.rects {
                for pos in rect.edge_cells(dir) {
                    let beyond = dir.step(pos);
                    if room.contains(beyond) {
                        continue;
                    }
                    if avoid_double_walls && grid.is_wall(beyond) {
                        continue;
                    }
                    grid.set_cell_type(pos, CellType::Wall);
                }
            }
        }
    }
}

fn place_floors(grid: &mut LayoutGrid, rooms: &[Room]) {
    for room in rooms {
        for rect in &room.rects {
            for pos in rect.cells() {
                grid.set_room_id(pos, room.id);
                if !grid.is_wall(pos) {
                    grid.set_cell_type(pos, CellType::Floor);
                }
            }
        }
    }
}

/// Floor cells touching the outside, diagonals included, become walls
fn plug_leaks(grid: &mut LayoutGrid) -> usize {
    let leaks: Vec<Pos> = grid
        .positions()
        .filter(|&p| grid.is_floor(p) && neighbours8(p).any(|n| grid.is_outside(n)))
        .collect();
    for &pos in &leaks {
        grid.set_cell_type(pos, CellType::Wall);
    }
    leaks.len()
}

/// Floor cells on a rect edge boxed in by three or more walls
fn close_slivers(grid: &mut LayoutGrid, rooms: &[Room]) -> usize {
    let slivers: Vec<Pos> = grid
        .positions()
        .filter(|&p| grid.is_floor(p) && cardinal_walls(grid, p) >= 3)
        .filter(|&p| {
            grid.room_at(p)
                .and_then(|id| rooms.get(id))
                .is_some_and(|room| room.rects.iter().any(|r| r.is_on_edge(p)))
        })
        .collect();
    for &pos in &slivers {
        grid.set_cell_type(pos, CellType::Wall);
    }
    slivers.len()
}

/// Wall cells poking into the floor of a single room
///
/// The cell must be fully surrounded by room cells, have at most one
/// cardinal and one diagonal wall neighbour, and every open cardinal
/// neighbour must belong to the same room. The opened cell joins that room.
fn open_stubs(grid: &mut LayoutGrid) -> usize {
    let stubs: Vec<(Pos, RoomId)> = grid
        .positions()
        .filter(|&p| grid.is_wall(p))
        .filter(|&p| neighbours8(p).all(|n| !grid.is_outside(n)))
        .filter(|&p| cardinal_walls(grid, p) <= 1 && diagonal_walls(grid, p) < 2)
        .filter_map(|p| stub_room(grid, p).map(|id| (p, id)))
        .collect();
    for &(pos, id) in &stubs {
        grid.set_cell_type(pos, CellType::Floor);
        grid.set_room_id(pos, id);
    }
    stubs.len()
}

/// The one room owning every open cardinal neighbour of `pos`
fn stub_room(grid: &LayoutGrid, pos: Pos) -> Option<RoomId> {
    let mut open = Direction::ALL
        .into_iter()
        .map(|d| d.step(pos))
        .filter(|&n| !grid.is_wall(n))
        .map(|n| grid.room_at(n));
    let first = open.next()??;
    open.all(|id| id == Some(first)).then_some(first)
}
