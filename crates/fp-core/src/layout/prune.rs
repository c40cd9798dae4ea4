//! Room pruning
//!
//! Removes random rooms until the footprint shrinks to a target area. Unless
//! disconnection is allowed, a removal that would split the room graph into
//! more pieces is rolled back.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::rng::LayoutRng;

use super::rect::Pos;
use super::room::Room;

/// Pruning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneSettings {
    /// Fraction of the footprint to remove
    pub area_prune_percent: f32,
    pub allow_disconnect: bool,
    /// Adjacency score for two rooms to count as connected
    pub adjacency_score: i32,
    /// Widest empty gap between two connected rooms
    pub max_gap: i32,
    /// Never go below this many rooms
    pub min_rooms: usize,
    /// Iteration cap per pass
    pub max_attempts: usize,
}

impl Default for PruneSettings {
    fn default() -> Self {
        Self {
            area_prune_percent: 0.0,
            allow_disconnect: false,
            adjacency_score: 3,
            max_gap: 0,
            min_rooms: 4,
            max_attempts: 100,
        }
    }
}

/// Outcome of a pruning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneReport {
    pub original_area: i32,
    pub target_area: i32,
    pub final_area: i32,
    pub removed: usize,
}

/// Undirected "still walkable" adjacency between rooms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomGraph {
    adjacency: Vec<Vec<usize>>,
}

impl RoomGraph {
    /// Connect every pair of rooms at most `max_gap` cells apart that
    /// scores at least `min_score`
    pub fn build(rooms: &[Room], min_score: i32, max_gap: i32) -> Self {
        let mut adjacency = vec![Vec::new(); rooms.len()];
        for i in 0..rooms.len() {
            for j in i + 1..rooms.len() {
                if rooms[i].is_adjacent_to(&rooms[j], min_score, max_gap) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }
        Self { adjacency }
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbours(&self, room: usize) -> &[usize] {
        &self.adjacency[room]
    }

    /// Number of connected components among the rooms marked alive
    pub fn component_count(&self, alive: &[bool]) -> usize {
        let mut seen = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        let mut components = 0;

        for start in 0..self.adjacency.len() {
            if !alive[start] || seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            queue.push_back(start);
            while let Some(room) = queue.pop_front() {
                for &next in &self.adjacency[room] {
                    if alive[next] && !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        components
    }

    pub fn is_connected(&self, alive: &[bool]) -> bool {
        self.component_count(alive) <= 1
    }
}

fn room_cells(room: &Room) -> Vec<Pos> {
    let cells: HashSet<Pos> = room.rects.iter().flat_map(|r| r.cells()).collect();
    cells.into_iter().collect()
}

/// Number of distinct cells covered by any of the rooms
pub fn footprint_area(rooms: &[Room]) -> i32 {
    let cells: HashSet<Pos> = rooms
        .iter()
        .flat_map(|room| room.rects.iter())
        .flat_map(|r| r.cells())
        .collect();
    cells.len() as i32
}

/// Bookkeeping for one pruning run
struct Pruner<'a> {
    rooms: &'a [Room],
    settings: &'a PruneSettings,
    graph: RoomGraph,
    cells: Vec<Vec<Pos>>,
    coverage: HashMap<Pos, u32>,
    alive: Vec<bool>,
    alive_count: usize,
    components: usize,
    area: i32,
    target: i32,
    removed: usize,
}

impl<'a> Pruner<'a> {
    fn new(rooms: &'a [Room], settings: &'a PruneSettings) -> Self {
        let cells: Vec<Vec<Pos>> = rooms.iter().map(room_cells).collect();
        let mut coverage: HashMap<Pos, u32> = HashMap::new();
        for &pos in cells.iter().flatten() {
            *coverage.entry(pos).or_insert(0) += 1;
        }
        let area = coverage.len() as i32;
        let target = (area as f32 * (1.0 - settings.area_prune_percent)).round() as i32;
        let graph = RoomGraph::build(rooms, settings.adjacency_score, settings.max_gap);
        let alive = vec![true; rooms.len()];
        let components = graph.component_count(&alive);

        Self {
            rooms,
            settings,
            graph,
            cells,
            coverage,
            alive,
            alive_count: rooms.len(),
            components,
            area,
            target,
            removed: 0,
        }
    }

    fn done(&self) -> bool {
        self.area <= self.target || self.alive_count <= self.settings.min_rooms
    }

    fn removable(&self, room: usize) -> bool {
        self.alive[room] && self.rooms[room].required_tag.is_none()
    }

    fn try_remove(&mut self, room: usize) -> bool {
        self.alive[room] = false;
        if !self.settings.allow_disconnect {
            let components = self.graph.component_count(&self.alive);
            if components > self.components {
                self.alive[room] = true;
                return false;
            }
            self.components = components;
        }

        for pos in &self.cells[room] {
            if let Some(count) = self.coverage.get_mut(pos) {
                *count -= 1;
                if *count == 0 {
                    self.coverage.remove(pos);
                    self.area -= 1;
                }
            }
        }
        self.alive_count -= 1;
        self.removed += 1;
        true
    }
}

/// Remove rooms until the footprint is at most `1 - area_prune_percent` of
/// its original size
///
/// The first pass picks random rooms and removes at most a third of them.
/// If the target is still not reached, a second pass walks the remaining
/// rooms in random order. Rooms with a `required_tag` are never removed.
/// Missing the target is not an error; the report tells how close it got.
pub fn prune_rooms(rooms: &mut Vec<Room>, settings: &PruneSettings, rng: &mut LayoutRng) -> PruneReport {
    let n = rooms.len();
    let mut pruner = Pruner::new(rooms.as_slice(), settings);
    let original_area = pruner.area;

    let cap = n / 3;
    let mut attempts = 0;
    while !pruner.done() && pruner.removed < cap && attempts < settings.max_attempts {
        attempts += 1;
        let room = rng.rn2(n as u32) as usize;
        if pruner.removable(room) {
            pruner.try_remove(room);
        }
    }

    if !pruner.done() {
        let mut order: Vec<usize> = (0..n).filter(|&i| pruner.removable(i)).collect();
        rng.shuffle(&mut order);
        for room in order.into_iter().take(settings.max_attempts) {
            if pruner.done() {
                break;
            }
            pruner.try_remove(room);
        }
    }

    let report = PruneReport {
        original_area,
        target_area: pruner.target,
        final_area: pruner.area,
        removed: pruner.removed,
    };
    let alive = pruner.alive;

    let mut index = 0;
    rooms.retain(|_| {
        let keep = alive[index];
        index += 1;
        keep
    });

    debug!(
        removed = report.removed,
        remaining = rooms.len(),
        original_area = report.original_area,
        target_area = report.target_area,
        final_area = report.final_area,
        "pruned rooms"
    );
    report
}
