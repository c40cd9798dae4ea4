//! Rooms: a footprint made of one or more rects plus content metadata
//!
//! A room's footprint is the union of its rects. Pieces may share a wall
//! line (merged splits), cross each other (corridor junctions) or be
//! disjoint.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::rect::{Pos, Rect};

/// Index of a room in the finalized room list
pub type RoomId = usize;

/// Content key attached to a room
///
/// The generator only interprets `Corridor`. Downstream content code maps
/// `Named` keys to its own resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomTag {
    /// Carved corridor; never pruned, never merged with content
    Corridor,
    /// Opaque key for downstream content placement
    Named(String),
}

impl fmt::Display for RoomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomTag::Corridor => f.write_str("corridor"),
            RoomTag::Named(name) => f.write_str(name),
        }
    }
}

/// A room in the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index in the room list, assigned at finalize
    pub id: RoomId,
    /// Pieces making up the footprint
    pub rects: Vec<Rect>,
    /// Rooms whose shared wall with this one was opened up
    pub merged_with: BTreeSet<RoomId>,
    /// Content this room must keep; tagged rooms are never pruned
    pub required_tag: Option<RoomTag>,
    /// Never give this room a door to the outside
    pub no_exterior_doors: bool,
    /// Door cells on this room's walls
    pub doors: Vec<Pos>,
}

impl Room {
    /// Create an ordinary room from its rects
    pub fn new(rects: Vec<Rect>) -> Self {
        debug_assert!(!rects.is_empty(), "room without rects");
        Self {
            id: 0,
            rects,
            merged_with: BTreeSet::new(),
            required_tag: None,
            no_exterior_doors: false,
            doors: Vec::new(),
        }
    }

    /// Create a corridor room
    pub fn corridor(rects: Vec<Rect>) -> Self {
        Self {
            required_tag: Some(RoomTag::Corridor),
            no_exterior_doors: true,
            ..Self::new(rects)
        }
    }

    pub fn is_corridor(&self) -> bool {
        matches!(self.required_tag, Some(RoomTag::Corridor))
    }

    /// Bounding rect of all pieces
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.rects.first()?;
        Some(self.rects[1..].iter().fold(first, |acc, r| {
            Rect::new(
                acc.min_x.min(r.min_x),
                acc.min_z.min(r.min_z),
                acc.max_x.max(r.max_x),
                acc.max_z.max(r.max_z),
            )
        }))
    }

    /// Number of distinct cells covered by the footprint
    pub fn area(&self) -> i32 {
        let Some(b) = self.bounds() else {
            return 0;
        };
        let width = b.width() as usize;
        let mut covered = vec![false; width * b.height() as usize];
        for rect in &self.rects {
            for (x, z) in rect.cells() {
                covered[(z - b.min_z) as usize * width + (x - b.min_x) as usize] = true;
            }
        }
        covered.iter().filter(|&&c| c).count() as i32
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.rects.iter().any(|r| r.contains(pos))
    }

    /// Best rect-to-rect adjacency score between the two rooms
    ///
    /// Rect pairs more than `max_gap` empty cells apart don't count.
    pub fn adjacency_score(&self, other: &Room, max_gap: i32) -> i32 {
        self.rects
            .iter()
            .flat_map(|a| other.rects.iter().map(move |b| a.adjacency_score(b, max_gap)))
            .max()
            .unwrap_or(0)
    }

    pub fn is_adjacent_to(&self, other: &Room, min_score: i32, max_gap: i32) -> bool {
        self.adjacency_score(other, max_gap) >= min_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_counts_shared_line_once() {
        let room = Room::new(vec![Rect::new(0, 0, 6, 6), Rect::new(6, 0, 12, 6)]);
        assert_eq!(room.area(), 13 * 7);
        assert_eq!(room.bounds(), Some(Rect::new(0, 0, 12, 6)));
    }

    #[test]
    fn test_corridor_flags() {
        let corridor = Room::corridor(vec![Rect::new(0, 0, 20, 4)]);
        assert!(corridor.is_corridor());
        assert!(corridor.no_exterior_doors);

        let room = Room::new(vec![Rect::new(0, 0, 5, 5)]);
        assert!(!room.is_corridor());
        assert!(room.required_tag.is_none());
    }

    #[test]
    fn test_room_adjacency() {
        let a = Room::new(vec![Rect::new(0, 0, 6, 6)]);
        let b = Room::new(vec![Rect::new(20, 20, 25, 25), Rect::new(6, 0, 12, 6)]);
        let c = Room::new(vec![Rect::new(30, 0, 35, 6)]);

        assert!(a.is_adjacent_to(&b, 5, 0));
        assert!(!a.is_adjacent_to(&c, 1, 0));
        assert_eq!(a.adjacency_score(&b, 0), b.adjacency_score(&a, 0));

        // tall rooms with a wide empty gap between them
        let west = Room::new(vec![Rect::new(0, 0, 6, 19)]);
        let east = Room::new(vec![Rect::new(12, 0, 18, 19)]);
        assert_eq!(west.adjacency_score(&east, 0), 0);
        assert!(!west.is_adjacent_to(&east, 3, 1));
    }

    #[test]
    fn test_contains() {
        let room = Room::new(vec![Rect::new(0, 0, 3, 3), Rect::new(10, 10, 12, 12)]);
        assert!(room.contains((11, 11)));
        assert!(!room.contains((5, 5)));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(RoomTag::Corridor.to_string(), "corridor");
        assert_eq!(RoomTag::Named("vault".into()).to_string(), "vault");
    }
}
