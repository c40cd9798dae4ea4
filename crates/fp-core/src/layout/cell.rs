//! Grid cell classification

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Cell type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty = 0,
    Floor = 1,
    Wall = 2,
    Door = 3,
}

impl CellType {
    pub const fn is_wall(&self) -> bool {
        matches!(self, CellType::Wall)
    }

    pub const fn is_floor(&self) -> bool {
        matches!(self, CellType::Floor)
    }

    pub const fn is_door(&self) -> bool {
        matches!(self, CellType::Door)
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, CellType::Empty)
    }

    /// Check if this is passable (can walk through)
    pub const fn is_walkable(&self) -> bool {
        matches!(self, CellType::Floor | CellType::Door)
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Floor => '.',
            CellType::Wall => '#',
            CellType::Door => '+',
        }
    }
}
