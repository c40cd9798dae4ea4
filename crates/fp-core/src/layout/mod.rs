//! Floor plan layout
//!
//! Contains the grid, rooms and the generation pipeline: splitting, merging,
//! corridor carving, pruning, finalization and door placement.

mod cell;
mod corridor;
mod doors;
mod finalize;
mod generator;
mod grid;
mod merger;
mod prune;
mod rect;
mod room;
mod splitter;

pub use cell::CellType;
pub use corridor::{
    carve_asymmetric_cross, carve_corridors, carve_cross, carve_h, carve_shape, carve_straight,
    carve_t_junction, group_corridors, CarveParams, CorridorCarve, CorridorShape, ShapeSet,
};
pub use doors::{open_shared_walls, place_doors, Door, RoomSide};
pub use finalize::finalize_rooms;
pub use generator::{generate, GenerationStage, Layout, StructureLayoutGenerator};
pub use grid::{LayoutGrid, NO_ROOM, OUT_OF_BOUNDS};
pub use merger::{merge_rects, DEFAULT_MIN_MERGE_SCORE};
pub use prune::{footprint_area, prune_rooms, PruneReport, PruneSettings, RoomGraph};
pub use rect::{Direction, Pos, Rect, DIAGONALS};
pub use room::{Room, RoomId, RoomTag};
pub use splitter::split_rect;
