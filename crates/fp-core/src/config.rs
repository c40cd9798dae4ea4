//! Layout generation parameters
//!
//! Every field has a default, so a JSON config only needs to name what it
//! changes.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::{CarveParams, PruneSettings, Rect, ShapeSet};
use crate::rng::LayoutRng;

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Random value in the range
    pub fn random(&self, rng: &mut LayoutRng) -> i32 {
        rng.range_inclusive(self.min, self.max)
    }
}

/// Corridor carving options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Cells on each side of the corridor center line
    pub expansion: i32,
    /// Shapes the carver may pick from
    pub allowed_shapes: ShapeSet,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            expansion: 1,
            allowed_shapes: ShapeSet::all(),
        }
    }
}

/// Full input of one `generate` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Area to lay out; its border cells become outer walls
    pub container: Rect,
    /// Minimum room width, walls included
    pub min_room_width: i32,
    /// Minimum room height, walls included
    pub min_room_height: i32,
    /// Fraction of the area to prune away, `0.0..1.0`
    pub area_prune_percent: f32,
    pub allow_room_removal: bool,
    /// Let pruning split the room graph
    pub allow_disconnect_on_removal: bool,
    pub generate_doors: bool,
    /// Budget of doors to the outside
    pub entrance_count: u32,
    /// Carve corridors first when set
    pub corridor: Option<CorridorConfig>,
    /// How many split rects a room may be merged from
    pub max_merged_rooms_range: IntRange,
    /// Skip partitioning: the whole container is one room
    pub single_room: bool,
    pub seed: u64,

    /// Don't add a wall next to an existing one
    pub avoid_double_walls: bool,
    /// Adjacency score a rect needs to join a merge group
    pub merge_min_score: i32,
    /// Adjacency score for rooms to count as connected while pruning
    pub prune_adjacency_score: i32,
    /// Widest empty gap two rooms may have and still count as connected
    pub prune_max_gap: i32,
    /// Pruning never goes below this many rooms
    pub prune_min_rooms: usize,
    /// Iteration cap for each pruning pass
    pub prune_max_attempts: usize,
    /// Content tags handed to distinct rooms; tagged rooms survive pruning
    pub required_tags: Vec<String>,
    /// Probability of opening the shared wall between two rooms
    pub open_plan_chance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container: Rect::new(0, 0, 39, 29),
            min_room_width: 6,
            min_room_height: 6,
            area_prune_percent: 0.0,
            allow_room_removal: false,
            allow_disconnect_on_removal: false,
            generate_doors: true,
            entrance_count: 1,
            corridor: None,
            max_merged_rooms_range: IntRange::new(1, 2),
            single_room: false,
            seed: 0,
            avoid_double_walls: true,
            merge_min_score: 5,
            prune_adjacency_score: 3,
            prune_max_gap: 0,
            prune_min_rooms: 4,
            prune_max_attempts: 100,
            required_tags: Vec::new(),
            open_plan_chance: 0.0,
        }
    }
}

impl LayoutConfig {
    /// Default parameters over `container`
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    /// Reject malformed parameters
    ///
    /// Combinations that merely don't fit, like a container smaller than
    /// the minimum room, are accepted here and degrade during generation.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.container.is_valid() {
            return Err(LayoutError::InvalidContainer(self.container));
        }
        if self.min_room_width < 3 || self.min_room_height < 3 {
            return Err(LayoutError::RoomTooSmall {
                width: self.min_room_width,
                height: self.min_room_height,
            });
        }
        if !(0.0..1.0).contains(&self.area_prune_percent) {
            return Err(LayoutError::InvalidPrunePercent(self.area_prune_percent));
        }
        let range = self.max_merged_rooms_range;
        if range.min < 1 || range.min > range.max {
            return Err(LayoutError::InvalidMergeRange {
                min: range.min,
                max: range.max,
            });
        }
        if self.prune_max_gap < 0 {
            return Err(LayoutError::InvalidAdjacencyGap(self.prune_max_gap));
        }
        if let Some(corridor) = &self.corridor {
            if corridor.expansion < 1 {
                return Err(LayoutError::InvalidExpansion(corridor.expansion));
            }
        }
        Ok(())
    }

    /// Carver parameters, if corridors are enabled
    pub fn carve_params(&self) -> Option<CarveParams> {
        self.corridor.map(|c| CarveParams {
            expansion: c.expansion,
            min_room_width: self.min_room_width,
            min_room_height: self.min_room_height,
        })
    }

    pub fn prune_settings(&self) -> PruneSettings {
        PruneSettings {
            area_prune_percent: self.area_prune_percent,
            allow_disconnect: self.allow_disconnect_on_removal,
            adjacency_score: self.prune_adjacency_score,
            max_gap: self.prune_max_gap,
            min_rooms: self.prune_min_rooms,
            max_attempts: self.prune_max_attempts,
        }
    }
}
