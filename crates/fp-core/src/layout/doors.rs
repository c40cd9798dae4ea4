//! Door placement and open-plan merging
//!
//! A wall cell can hold a door when it sits in a straight wall line (walls on
//! two opposite sides) and the other two sides are open. The open sides tell
//! which rooms, or the outside, the door connects.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rng::LayoutRng;

use super::cell::CellType;
use super::grid::LayoutGrid;
use super::rect::{Direction, Pos};
use super::room::{Room, RoomId};

/// What lies on one side of a door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomSide {
    Room(RoomId),
    /// Empty cells or beyond the grid
    Outside,
}

impl RoomSide {
    pub fn room(self) -> Option<RoomId> {
        match self {
            RoomSide::Room(id) => Some(id),
            RoomSide::Outside => None,
        }
    }

    pub fn is_outside(self) -> bool {
        self == RoomSide::Outside
    }
}

/// A placed door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub pos: Pos,
    /// Connected sides, ordered with rooms before the outside
    pub sides: (RoomSide, RoomSide),
}

impl Door {
    /// A door to the outside
    pub fn is_entrance(&self) -> bool {
        self.sides.0.is_outside() || self.sides.1.is_outside()
    }

    pub fn connects(&self, a: RoomSide, b: RoomSide) -> bool {
        self.sides == pair_key(a, b)
    }
}

fn pair_key(a: RoomSide, b: RoomSide) -> (RoomSide, RoomSide) {
    if a <= b { (a, b) } else { (b, a) }
}

fn side_at(grid: &LayoutGrid, pos: Pos) -> Option<RoomSide> {
    if grid.is_outside(pos) {
        return Some(RoomSide::Outside);
    }
    grid.room_at(pos).map(RoomSide::Room)
}

fn is_open(grid: &LayoutGrid, pos: Pos) -> bool {
    !grid.is_wall(pos) && !grid.is_door(pos)
}

/// Sides a door at `pos` would connect, if `pos` can hold one
fn door_sides(grid: &LayoutGrid, pos: Pos) -> Option<(RoomSide, RoomSide)> {
    if !grid.is_wall(pos) {
        return None;
    }
    let [north, east, south, west] = Direction::ALL.map(|d| d.step(pos));

    let (a, b) = if grid.is_wall(west) && grid.is_wall(east) && is_open(grid, north) && is_open(grid, south) {
        (north, south)
    } else if grid.is_wall(north) && grid.is_wall(south) && is_open(grid, west) && is_open(grid, east) {
        (west, east)
    } else {
        return None;
    };
    Some((side_at(grid, a)?, side_at(grid, b)?))
}

/// Place doors on the wall cells of `grid`
///
/// Wall cells are visited in random order. Each unordered pair of sides gets
/// at most one door, doors never touch another door, and pairs already
/// opened into each other (`merged_with`) get none. Doors to the outside
/// consume `entrance_budget` and skip rooms flagged `no_exterior_doors`.
pub fn place_doors(
    grid: &mut LayoutGrid,
    rooms: &mut [Room],
    entrance_budget: u32,
    rng: &mut LayoutRng,
) -> Vec<Door> {
    let mut walls: Vec<Pos> = grid.positions().filter(|&p| grid.is_wall(p)).collect();
    rng.shuffle(&mut walls);

    let mut connected: HashSet<(RoomSide, RoomSide)> = rooms
        .iter()
        .flat_map(|room| {
            room.merged_with
                .iter()
                .map(move |&other| pair_key(RoomSide::Room(room.id), RoomSide::Room(other)))
        })
        .collect();
    let mut budget = entrance_budget;
    let mut doors = Vec::new();

    for pos in walls {
        let Some((a, b)) = door_sides(grid, pos) else {
            continue;
        };
        if a == b {
            continue;
        }
        let key = pair_key(a, b);
        if connected.contains(&key) {
            continue;
        }
        if Direction::ALL.iter().any(|d| grid.is_door(d.step(pos))) {
            continue;
        }

        if let (RoomSide::Room(inner), RoomSide::Outside) = key {
            let barred = rooms.get(inner).is_none_or(|r| r.no_exterior_doors);
            if budget == 0 || barred {
                continue;
            }
            budget -= 1;
        }

        grid.set_cell_type(pos, CellType::Door);
        connected.insert(key);
        for id in [a, b].into_iter().filter_map(RoomSide::room) {
            if let Some(room) = rooms.get_mut(id) {
                room.doors.push(pos);
            }
        }
        doors.push(Door { pos, sides: key });
    }

    debug!(
        doors = doors.len(),
        entrances = doors.iter().filter(|d| d.is_entrance()).count(),
        "placed doors"
    );
    doors
}

/// Remove shared walls between pairs of ordinary rooms
///
/// Every pair of distinct non-corridor rooms separated by at least one
/// door-capable wall cell is opened with probability `chance`: all of those
/// cells become floor and both rooms record each other in `merged_with`.
/// Returns the number of pairs opened.
pub fn open_shared_walls(grid: &mut LayoutGrid, rooms: &mut [Room], chance: f32, rng: &mut LayoutRng) -> usize {
    let is_ordinary = |id: RoomId| rooms.get(id).is_some_and(|r| !r.is_corridor());

    let mut shared: BTreeMap<(RoomId, RoomId), Vec<Pos>> = BTreeMap::new();
    for pos in grid.positions() {
        if let Some((RoomSide::Room(a), RoomSide::Room(b))) = door_sides(grid, pos) {
            if a != b && is_ordinary(a) && is_ordinary(b) {
                shared.entry((a.min(b), a.max(b))).or_default().push(pos);
            }
        }
    }

    let mut opened = 0;
    for ((a, b), cells) in shared {
        if !rng.chance(chance) {
            continue;
        }
        for pos in cells {
            grid.set_cell_type(pos, CellType::Floor);
        }
        rooms[a].merged_with.insert(b);
        rooms[b].merged_with.insert(a);
        opened += 1;
    }

    debug!(opened, "opened shared walls");
    opened
}
