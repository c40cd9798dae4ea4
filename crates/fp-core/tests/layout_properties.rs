//! Property tests over randomly configured layouts

use std::collections::VecDeque;

use fp_core::layout::{Direction, Pos, RoomGraph, DIAGONALS};
use fp_core::{generate, CorridorConfig, IntRange, Layout, LayoutConfig, Rect, ShapeSet};
use hashbrown::HashSet;
use proptest::prelude::*;

fn corridor_strategy() -> impl Strategy<Value = Option<CorridorConfig>> {
    prop::option::of((1..=2i32, 1u8..32).prop_map(|(expansion, mask)| CorridorConfig {
        expansion,
        allowed_shapes: ShapeSet::from_bits_truncate(mask),
    }))
}

fn config_strategy() -> impl Strategy<Value = LayoutConfig> {
    (
        (8..48i32, 8..48i32, 3..8i32, 3..8i32, any::<u64>()),
        (0.0f32..0.6, any::<bool>(), any::<bool>(), 0u32..4, 1..=3i32),
        (prop::bool::weighted(0.1), corridor_strategy(), prop_oneof![Just(0.0f32), Just(0.5f32)], 0usize..3),
    )
        .prop_map(
            |(
                (width, height, min_w, min_h, seed),
                (prune, allow_removal, allow_disconnect, entrances, max_merged),
                (single_room, corridor, open_plan, tags),
            )| LayoutConfig {
                container: Rect::from_size(0, 0, width, height),
                min_room_width: min_w,
                min_room_height: min_h,
                area_prune_percent: prune,
                allow_room_removal: allow_removal,
                allow_disconnect_on_removal: allow_disconnect,
                entrance_count: entrances,
                max_merged_rooms_range: IntRange::new(1, max_merged),
                single_room,
                corridor,
                open_plan_chance: open_plan,
                required_tags: (0..tags).map(|i| format!("tag{i}")).collect(),
                seed,
                ..LayoutConfig::default()
            },
        )
}

fn pruning_strategy(allow_disconnect: bool) -> impl Strategy<Value = LayoutConfig> {
    (12..36i32, 12..36i32, 5..8i32, any::<u64>(), 0.05f32..0.6).prop_map(
        move |(width, height, min_size, seed, prune)| LayoutConfig {
            container: Rect::from_size(0, 0, width, height),
            min_room_width: min_size,
            min_room_height: min_size,
            area_prune_percent: prune,
            allow_room_removal: true,
            allow_disconnect_on_removal: allow_disconnect,
            seed,
            ..LayoutConfig::default()
        },
    )
}

/// Nothing pruned, doors on, minimum sizes down to one floor line
fn walkable_strategy() -> impl Strategy<Value = LayoutConfig> {
    (
        (8..48i32, 8..48i32, prop_oneof![Just((3, 7)), Just((7, 3)), (3..8i32, 3..8i32)], any::<u64>()),
        (corridor_strategy(), 1..=3i32, prop_oneof![Just(0.0f32), Just(0.5f32)]),
    )
        .prop_map(|((width, height, (min_w, min_h), seed), (corridor, max_merged, open_plan))| LayoutConfig {
            container: Rect::from_size(0, 0, width, height),
            min_room_width: min_w,
            min_room_height: min_h,
            corridor,
            max_merged_rooms_range: IntRange::new(1, max_merged),
            open_plan_chance: open_plan,
            seed,
            ..LayoutConfig::default()
        })
}

/// Number of 4-connected pieces in `cells`
fn piece_count(cells: &HashSet<Pos>) -> usize {
    let mut seen: HashSet<Pos> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut pieces = 0;
    for &start in cells {
        if !seen.insert(start) {
            continue;
        }
        pieces += 1;
        queue.push_back(start);
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = dir.step(pos);
                if cells.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    pieces
}

/// Same configuration with pruning switched off
fn unpruned(config: &LayoutConfig) -> Layout {
    let config = LayoutConfig {
        allow_room_removal: false,
        ..config.clone()
    };
    generate(&config).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rooms_stay_in_container(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        prop_assert!(!layout.rooms.is_empty());
        for room in &layout.rooms {
            for rect in &room.rects {
                prop_assert!(config.container.contains_rect(rect));
            }
        }
    }

    #[test]
    fn prop_rooms_do_not_overlap(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        for (i, a) in layout.rooms.iter().enumerate() {
            for b in &layout.rooms[i + 1..] {
                for shared in a.rects.iter().flat_map(|ra| b.rects.iter().filter_map(move |rb| ra.intersection(rb))) {
                    prop_assert!(shared.width() == 1 || shared.height() == 1, "{:?} shared by {} and {}", shared, a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn prop_generation_is_deterministic(config in config_strategy()) {
        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_doors_pair_distinct_sides(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        let mut pairs = HashSet::new();
        for door in &layout.doors {
            prop_assert_ne!(door.sides.0, door.sides.1);
            prop_assert!(pairs.insert(door.sides));
            prop_assert!(layout.grid.is_door(door.pos));
            for dir in Direction::ALL {
                prop_assert!(!layout.grid.is_door(dir.step(door.pos)));
            }
        }
    }

    #[test]
    fn prop_entrances_within_budget(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        prop_assert!(layout.entrances().count() <= config.entrance_count as usize);
        for door in layout.entrances() {
            let inner = door.sides.0.room().unwrap();
            prop_assert!(!layout.rooms[inner].no_exterior_doors);
        }
    }

    #[test]
    fn prop_floor_never_touches_outside(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        let grid = &layout.grid;
        for pos in grid.positions().filter(|&p| grid.is_floor(p)) {
            let around = Direction::ALL
                .iter()
                .map(|d| d.step(pos))
                .chain(DIAGONALS.iter().map(|d| (pos.0 + d.0, pos.1 + d.1)));
            for n in around {
                prop_assert!(!grid.is_outside(n), "floor {:?} touches outside at {:?}", pos, n);
            }
        }
    }

    #[test]
    fn prop_room_ids_are_indices(config in config_strategy()) {
        let layout = generate(&config).unwrap();
        for (i, room) in layout.rooms.iter().enumerate() {
            prop_assert_eq!(room.id, i);
        }
        for tag in &config.required_tags {
            let holders = layout
                .rooms
                .iter()
                .filter(|r| r.required_tag.as_ref().is_some_and(|t| t.to_string() == *tag))
                .count();
            prop_assert!(holders <= 1);
        }
    }

    #[test]
    fn prop_pruning_converges(config in pruning_strategy(true)) {
        let original = unpruned(&config).total_area();
        let layout = generate(&config).unwrap();
        let area = layout.total_area();

        prop_assert!(area <= original);
        if layout.rooms.len() > config.prune_min_rooms {
            let target = original as f32 * (1.0 - config.area_prune_percent);
            prop_assert!(area as f32 <= target + 1.0, "area {} target {}", area, target);
        }
    }

    #[test]
    fn prop_pruning_keeps_rooms_connected(config in pruning_strategy(false)) {
        let before = unpruned(&config);
        let layout = generate(&config).unwrap();
        let (score, gap) = (config.prune_adjacency_score, config.prune_max_gap);

        let components_before = RoomGraph::build(&before.rooms, score, gap).component_count(&vec![true; before.rooms.len()]);
        let components_after = RoomGraph::build(&layout.rooms, score, gap).component_count(&vec![true; layout.rooms.len()]);
        prop_assert!(components_after <= components_before);
        prop_assert!(layout.rooms.len() >= config.prune_min_rooms.min(before.rooms.len()));
    }

    #[test]
    fn prop_rooms_are_one_piece(config in walkable_strategy()) {
        let layout = generate(&config).unwrap();
        let grid = &layout.grid;
        for room in &layout.rooms {
            let floor: HashSet<Pos> = grid
                .positions()
                .filter(|&p| grid.is_floor(p) && grid.room_at(p) == Some(room.id))
                .collect();
            prop_assert!(piece_count(&floor) <= 1, "room {} split into pieces, rects {:?}", room.id, room.rects);
        }
    }

    #[test]
    fn prop_unpruned_layout_is_walkable(config in walkable_strategy()) {
        let layout = generate(&config).unwrap();
        let grid = &layout.grid;
        let walkable: HashSet<Pos> = grid
            .positions()
            .filter(|&p| grid.is_floor(p) || grid.is_door(p))
            .collect();
        prop_assert_eq!(piece_count(&walkable), 1, "\n{}", grid);
    }
}
