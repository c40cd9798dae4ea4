//! Structure layout generation pipeline
//!
//! Partitioning -> (CorridorCarved) -> RoomsMerged -> (Pruned) -> Finalized
//! -> (DoorsPlaced) -> Done
//!
//! Bracketed stages only run when enabled. Scratch state lives in a
//! per-call pipeline value and never outlives one `generate` call.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::rng::LayoutRng;

use super::corridor::{carve_corridors, group_corridors, CorridorShape};
use super::doors::{open_shared_walls, place_doors, Door};
use super::finalize::finalize_rooms;
use super::grid::LayoutGrid;
use super::merger::merge_rects;
use super::prune::{footprint_area, prune_rooms};
use super::rect::Rect;
use super::room::{Room, RoomId, RoomTag};
use super::splitter::split_rect;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum GenerationStage {
    Partitioning,
    CorridorCarved,
    RoomsMerged,
    Pruned,
    Finalized,
    DoorsPlaced,
    Done,
}

/// A generated floor plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub grid: LayoutGrid,
    /// Rooms in creation order; `rooms[i].id == i`
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    /// Corridor shape carved, if any
    pub corridor_shape: Option<CorridorShape>,
    pub seed: u64,
    /// Stages visited, in order
    pub stages: Vec<GenerationStage>,
}

impl Layout {
    /// Number of cells covered by rooms
    pub fn total_area(&self) -> i32 {
        footprint_area(&self.rooms)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Doors to the outside
    pub fn entrances(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().filter(|d| d.is_entrance())
    }

    pub fn corridor_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_corridor())
    }
}

/// Floor plan generator for one validated configuration
#[derive(Debug, Clone)]
pub struct StructureLayoutGenerator {
    config: LayoutConfig,
}

impl StructureLayoutGenerator {
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Generate the layout for the configured seed
    pub fn generate(&self) -> Layout {
        self.generate_with_seed(self.config.seed)
    }

    /// Generate with another seed, keeping every other parameter
    pub fn generate_with_seed(&self, seed: u64) -> Layout {
        LayoutRng::with_seed(seed, |rng| Pipeline::new(&self.config, rng).run())
    }
}

/// Validate `config` and generate its layout
pub fn generate(config: &LayoutConfig) -> Result<Layout, LayoutError> {
    Ok(StructureLayoutGenerator::new(config.clone())?.generate())
}

/// Scratch state of a single generation run
struct Pipeline<'a> {
    config: &'a LayoutConfig,
    rng: &'a mut LayoutRng,
    stages: Vec<GenerationStage>,
    corridor_shape: Option<CorridorShape>,
}

impl<'a> Pipeline<'a> {
    fn new(config: &'a LayoutConfig, rng: &'a mut LayoutRng) -> Self {
        Self {
            config,
            rng,
            stages: Vec::new(),
            corridor_shape: None,
        }
    }

    fn enter(&mut self, stage: GenerationStage) {
        debug!(%stage, "layout stage");
        self.stages.push(stage);
    }

    fn run(mut self) -> Layout {
        let config = self.config;
        let container = config.container;
        self.enter(GenerationStage::Partitioning);

        let too_small = container.width() < config.min_room_width || container.height() < config.min_room_height;
        if too_small && !config.single_room {
            warn!(
                ?container,
                min_room_width = config.min_room_width,
                min_room_height = config.min_room_height,
                "container smaller than the minimum room, using a single room"
            );
        }

        let mut rooms = if config.single_room || too_small {
            vec![Room::new(vec![container])]
        } else {
            let rooms = self.partition(container);
            self.enter(GenerationStage::RoomsMerged);
            rooms
        };
        self.assign_tags(&mut rooms);

        if !config.single_room && !too_small && config.allow_room_removal && config.area_prune_percent > 0.0 {
            prune_rooms(&mut rooms, &config.prune_settings(), self.rng);
            self.enter(GenerationStage::Pruned);
        }

        let mut grid = LayoutGrid::new(container);
        finalize_rooms(&mut grid, &mut rooms, config.avoid_double_walls);
        self.enter(GenerationStage::Finalized);

        if config.open_plan_chance > 0.0 {
            open_shared_walls(&mut grid, &mut rooms, config.open_plan_chance, self.rng);
        }

        let doors = if config.generate_doors {
            let doors = place_doors(&mut grid, &mut rooms, config.entrance_count, self.rng);
            self.enter(GenerationStage::DoorsPlaced);
            doors
        } else {
            Vec::new()
        };

        self.enter(GenerationStage::Done);
        let seed = self.rng.seed();
        debug!(rooms = rooms.len(), doors = doors.len(), seed, "layout generated");

        Layout {
            grid,
            rooms,
            doors,
            corridor_shape: self.corridor_shape,
            seed,
            stages: self.stages,
        }
    }

    /// Corridors first when enabled, then split and merge each space
    fn partition(&mut self, container: Rect) -> Vec<Room> {
        let config = self.config;
        let mut rooms = Vec::new();
        let mut spaces = vec![container];

        if let (Some(params), Some(corridor)) = (config.carve_params(), config.corridor) {
            match carve_corridors(container, &params, corridor.allowed_shapes, self.rng) {
                Some(carve) => {
                    debug!(
                        shape = %carve.shape,
                        corridors = carve.corridors.len(),
                        spaces = carve.spaces.len(),
                        "carved corridors"
                    );
                    rooms.extend(group_corridors(&carve.corridors).into_iter().map(Room::corridor));
                    spaces = carve.spaces;
                    self.corridor_shape = Some(carve.shape);
                    self.enter(GenerationStage::CorridorCarved);
                }
                None => warn!(
                    ?container,
                    shapes = ?corridor.allowed_shapes,
                    "no corridor shape fits, laying out without corridors"
                ),
            }
        }

        for space in spaces {
            let leaves = split_rect(space, config.min_room_width, config.min_room_height, self.rng);
            let groups = merge_rects(leaves, config.max_merged_rooms_range, config.merge_min_score, self.rng);
            rooms.extend(groups.into_iter().map(Room::new));
        }
        debug!(rooms = rooms.len(), "partitioned container");
        rooms
    }

    /// Hand each required tag to a distinct random non-corridor room
    fn assign_tags(&mut self, rooms: &mut [Room]) {
        let tags = &self.config.required_tags;
        if tags.is_empty() {
            return;
        }

        let mut candidates: Vec<usize> = (0..rooms.len()).filter(|&i| !rooms[i].is_corridor()).collect();
        self.rng.shuffle(&mut candidates);
        if tags.len() > candidates.len() {
            warn!(
                tags = tags.len(),
                rooms = candidates.len(),
                "more required tags than rooms, dropping the rest"
            );
        }
        for (tag, index) in tags.iter().zip(candidates) {
            rooms[index].required_tag = Some(RoomTag::Named(tag.clone()));
        }
    }
}
