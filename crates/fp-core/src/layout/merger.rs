//! Grouping split rects into rooms

use crate::config::IntRange;
use crate::rng::LayoutRng;

use super::rect::Rect;

/// Default adjacency score a rect needs to join a group
pub const DEFAULT_MIN_MERGE_SCORE: i32 = 5;

/// Group `rects` into rooms of 1..=k rects each
///
/// The list is shuffled first. Each unused rect starts a group with a size
/// cap drawn from `max_merged` (at least 1), then the rest of the list is
/// scanned for unused rects that touch the group's first rect and score at
/// least `min_score` against it. Every rect ends up in exactly one group.
/// Rects never join across a gap, so a group is always one connected piece.
pub fn merge_rects(
    mut rects: Vec<Rect>,
    max_merged: IntRange,
    min_score: i32,
    rng: &mut LayoutRng,
) -> Vec<Vec<Rect>> {
    rng.shuffle(&mut rects);

    let mut used = vec![false; rects.len()];
    let mut groups = Vec::new();

    for i in 0..rects.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let seed = rects[i];
        let cap = max_merged.random(rng).max(1) as usize;
        let mut group = vec![seed];

        for j in i + 1..rects.len() {
            if group.len() >= cap {
                break;
            }
            if !used[j] && rects[j].adjacency_score(&seed, 0) >= min_score {
                used[j] = true;
                group.push(rects[j]);
            }
        }
        groups.push(group);
    }

    groups
}
