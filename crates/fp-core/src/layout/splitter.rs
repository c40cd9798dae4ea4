//! Recursive rect splitting (binary space partitioning)
//!
//! Works from a FIFO queue instead of recursion. A rect is split along its
//! longer side as long as both halves can keep the minimum room size; the
//! two halves share the cut line.

use std::collections::VecDeque;

use crate::rng::LayoutRng;

use super::rect::Rect;

/// Upper bound on splits per call
const MAX_SPLITS: usize = 4096;

/// Split `rect` into leaves no smaller than `min_width` x `min_height`
///
/// A rect is a leaf once neither side reaches twice the minimum. When both
/// sides could be split the longer one is cut; on a tie the height is cut.
/// Cut offsets are drawn from `min..=side - min`.
pub fn split_rect(rect: Rect, min_width: i32, min_height: i32, rng: &mut LayoutRng) -> Vec<Rect> {
    debug_assert!(min_width > 0 && min_height > 0, "non-positive minimum room size");

    let mut queue = VecDeque::from([rect]);
    let mut leaves = Vec::new();
    let mut splits = 0;

    while let Some(r) = queue.pop_front() {
        let can_split_x = r.width() >= 2 * min_width;
        let can_split_z = r.height() >= 2 * min_height;

        if (!can_split_x && !can_split_z) || splits >= MAX_SPLITS {
            leaves.push(r);
            continue;
        }
        splits += 1;

        let cut_x = if can_split_x && can_split_z {
            r.width() > r.height()
        } else {
            can_split_x
        };

        let (a, b) = if cut_x {
            let offset = rng.range_inclusive(min_width, r.width() - min_width);
            r.split_x(offset)
        } else {
            let offset = rng.range_inclusive(min_height, r.height() - min_height);
            r.split_z(offset)
        };
        queue.push_back(a);
        queue.push_back(b);
    }

    leaves
}
