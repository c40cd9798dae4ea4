//! fp-core: Floor plan generation
//!
//! Partitions a rectangular container into rooms, optionally around carved
//! corridors, prunes rooms down to an area budget, classifies every cell as
//! wall, floor or door, and places doors between rooms.
//!
//! The crate does no I/O. Every random choice draws from one seeded
//! [`LayoutRng`], so a [`LayoutConfig`] alone reproduces its layout.
//!
//! ```
//! use fp_core::{generate, LayoutConfig, Rect};
//!
//! let config = LayoutConfig::new(Rect::new(0, 0, 29, 19));
//! let layout = generate(&config).unwrap();
//! assert!(!layout.rooms.is_empty());
//! println!("{}", layout.grid);
//! ```

pub mod config;
pub mod layout;

mod error;
mod rng;

pub use config::{CorridorConfig, IntRange, LayoutConfig};
pub use error::LayoutError;
pub use layout::{
    generate, CellType, CorridorShape, Door, Layout, LayoutGrid, Rect, Room, RoomId, RoomSide,
    RoomTag, ShapeSet, StructureLayoutGenerator,
};
pub use rng::LayoutRng;
