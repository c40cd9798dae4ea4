//! Configuration errors

use thiserror::Error;

use crate::layout::Rect;

/// Rejected layout configuration
///
/// Generation itself never fails; only malformed input is reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid container {0:?}: min corner must not exceed max corner")]
    InvalidContainer(Rect),

    #[error("Minimum room size {width}x{height} is below 3x3")]
    RoomTooSmall { width: i32, height: i32 },

    #[error("Area prune percent {0} outside 0.0..1.0")]
    InvalidPrunePercent(f32),

    #[error("Invalid merged rooms range {min}..={max}")]
    InvalidMergeRange { min: i32, max: i32 },

    #[error("Corridor expansion {0} must be at least 1")]
    InvalidExpansion(i32),

    #[error("Adjacency gap {0} must not be negative")]
    InvalidAdjacencyGap(i32),
}
