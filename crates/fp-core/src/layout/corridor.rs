//! Corridor carving
//!
//! Each corridor shape is an independent function returning the corridor
//! rects and the leftover space rects around them. Corridor segments run the
//! full length of the container (or up to another segment) and are
//! `2 * expansion + 1` cells thick, walls included. Space rects share their
//! border line with the corridor they face.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

use crate::rng::LayoutRng;

use super::rect::Rect;

/// Corridor topology
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CorridorShape {
    /// One corridor along the long axis
    Straight,
    /// Two corridors crossing near the middle
    Cross,
    /// A main corridor with one branch to a side wall
    TJunction,
    /// Two parallel bars across the short axis joined by a crossbar
    H,
    /// Like `Cross`, with the crossing pushed towards one end
    AsymmetricCross,
}

bitflags! {
    /// Set of allowed corridor shapes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShapeSet: u8 {
        const STRAIGHT = 0x01;
        const CROSS = 0x02;
        const T_JUNCTION = 0x04;
        const H = 0x08;
        const ASYMMETRIC_CROSS = 0x10;
    }
}

impl ShapeSet {
    /// Shapes in the set, in declaration order
    pub fn shapes(self) -> impl Iterator<Item = CorridorShape> {
        CorridorShape::iter().filter(move |&s| self.contains(ShapeSet::from(s)))
    }
}

impl Default for ShapeSet {
    fn default() -> Self {
        ShapeSet::all()
    }
}

impl From<CorridorShape> for ShapeSet {
    fn from(shape: CorridorShape) -> Self {
        match shape {
            CorridorShape::Straight => ShapeSet::STRAIGHT,
            CorridorShape::Cross => ShapeSet::CROSS,
            CorridorShape::TJunction => ShapeSet::T_JUNCTION,
            CorridorShape::H => ShapeSet::H,
            CorridorShape::AsymmetricCross => ShapeSet::ASYMMETRIC_CROSS,
        }
    }
}

impl FromIterator<CorridorShape> for ShapeSet {
    fn from_iter<I: IntoIterator<Item = CorridorShape>>(iter: I) -> Self {
        iter.into_iter().fold(ShapeSet::empty(), |set, s| set | ShapeSet::from(s))
    }
}

// Serialized as a list of shape names
impl Serialize for ShapeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.shapes())
    }
}

impl<'de> Deserialize<'de> for ShapeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let shapes = Vec::<CorridorShape>::deserialize(deserializer)?;
        Ok(shapes.into_iter().collect())
    }
}

/// Size constraints for carving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveParams {
    /// Cells added on each side of the corridor's center line
    pub expansion: i32,
    pub min_room_width: i32,
    pub min_room_height: i32,
}

/// Result of carving one shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorridorCarve {
    pub shape: CorridorShape,
    pub corridors: Vec<Rect>,
    pub spaces: Vec<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

/// Where to place a corridor's center line within its legal range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    /// Middle half of the range
    Middle,
    /// First or last third of the range
    Outer,
}

/// Container in corridor coordinates: `u` along the long axis, `v` across
#[derive(Debug, Clone, Copy)]
struct Frame {
    axis: Axis,
    u_min: i32,
    u_max: i32,
    v_min: i32,
    v_max: i32,
    min_u: i32,
    min_v: i32,
    expansion: i32,
}

impl Frame {
    fn new(container: Rect, params: &CarveParams) -> Self {
        if container.width() >= container.height() {
            Self {
                axis: Axis::X,
                u_min: container.min_x,
                u_max: container.max_x,
                v_min: container.min_z,
                v_max: container.max_z,
                min_u: params.min_room_width,
                min_v: params.min_room_height,
                expansion: params.expansion,
            }
        } else {
            Self {
                axis: Axis::Z,
                u_min: container.min_z,
                u_max: container.max_z,
                v_min: container.min_x,
                v_max: container.max_x,
                min_u: params.min_room_height,
                min_v: params.min_room_width,
                expansion: params.expansion,
            }
        }
    }

    fn rect(&self, u0: i32, v0: i32, u1: i32, v1: i32) -> Rect {
        match self.axis {
            Axis::X => Rect::new(u0, v0, u1, v1),
            Axis::Z => Rect::new(v0, u0, v1, u1),
        }
    }

    /// Center `v` of a corridor running along `u`
    fn along_center(&self, band: Band, rng: &mut LayoutRng) -> Option<i32> {
        pick_center(self.v_min, self.v_max, self.expansion, self.min_v, band, rng)
    }

    /// Center `u` of a corridor running across
    fn across_center(&self, band: Band, rng: &mut LayoutRng) -> Option<i32> {
        pick_center(self.u_min, self.u_max, self.expansion, self.min_u, band, rng)
    }

    /// Full-length corridor along `u` centred on `vc`
    fn along(&self, vc: i32) -> Rect {
        let e = self.expansion;
        self.rect(self.u_min, vc - e, self.u_max, vc + e)
    }

    /// Full-length corridor across, centred on `uc`
    fn across(&self, uc: i32) -> Rect {
        let e = self.expansion;
        self.rect(uc - e, self.v_min, uc + e, self.v_max)
    }
}

/// Pick a center line leaving at least `min_dim` cells on both sides
fn pick_center(lo_edge: i32, hi_edge: i32, e: i32, min_dim: i32, band: Band, rng: &mut LayoutRng) -> Option<i32> {
    let lo = lo_edge + min_dim - 1 + e;
    let hi = hi_edge - min_dim + 1 - e;
    if lo > hi {
        return None;
    }
    let center = match band {
        Band::Middle => {
            let quarter = (hi - lo) / 4;
            rng.range_inclusive(lo + quarter, hi - quarter)
        }
        Band::Outer => {
            let third = (hi - lo) / 3;
            if rng.one_in(2) {
                rng.range_inclusive(lo, lo + third)
            } else {
                rng.range_inclusive(hi - third, hi)
            }
        }
    };
    Some(center)
}

pub fn carve_straight(container: Rect, params: &CarveParams, rng: &mut LayoutRng) -> Option<CorridorCarve> {
    let f = Frame::new(container, params);
    let e = f.expansion;
    let vc = f.along_center(Band::Middle, rng)?;

    Some(CorridorCarve {
        shape: CorridorShape::Straight,
        corridors: vec![f.along(vc)],
        spaces: vec![
            f.rect(f.u_min, f.v_min, f.u_max, vc - e),
            f.rect(f.u_min, vc + e, f.u_max, f.v_max),
        ],
    })
}

fn carve_crossing(
    shape: CorridorShape,
    band: Band,
    container: Rect,
    params: &CarveParams,
    rng: &mut LayoutRng,
) -> Option<CorridorCarve> {
    let f = Frame::new(container, params);
    let e = f.expansion;
    let vc = f.along_center(Band::Middle, rng)?;
    let uc = f.across_center(band, rng)?;

    Some(CorridorCarve {
        shape,
        corridors: vec![f.along(vc), f.across(uc)],
        spaces: vec![
            f.rect(f.u_min, f.v_min, uc - e, vc - e),
            f.rect(uc + e, f.v_min, f.u_max, vc - e),
            f.rect(f.u_min, vc + e, uc - e, f.v_max),
            f.rect(uc + e, vc + e, f.u_max, f.v_max),
        ],
    })
}

pub fn carve_cross(container: Rect, params: &CarveParams, rng: &mut LayoutRng) -> Option<CorridorCarve> {
    carve_crossing(CorridorShape::Cross, Band::Middle, container, params, rng)
}

pub fn carve_asymmetric_cross(
    container: Rect,
    params: &CarveParams,
    rng: &mut LayoutRng,
) -> Option<CorridorCarve> {
    carve_crossing(CorridorShape::AsymmetricCross, Band::Outer, container, params, rng)
}

pub fn carve_t_junction(container: Rect, params: &CarveParams, rng: &mut LayoutRng) -> Option<CorridorCarve> {
    let f = Frame::new(container, params);
    let e = f.expansion;
    let vc = f.along_center(Band::Middle, rng)?;
    let uc = f.across_center(Band::Middle, rng)?;

    let (branch, spaces) = if rng.one_in(2) {
        (
            f.rect(uc - e, vc + e, uc + e, f.v_max),
            vec![
                f.rect(f.u_min, f.v_min, f.u_max, vc - e),
                f.rect(f.u_min, vc + e, uc - e, f.v_max),
                f.rect(uc + e, vc + e, f.u_max, f.v_max),
            ],
        )
    } else {
        (
            f.rect(uc - e, f.v_min, uc + e, vc - e),
            vec![
                f.rect(f.u_min, vc + e, f.u_max, f.v_max),
                f.rect(f.u_min, f.v_min, uc - e, vc - e),
                f.rect(uc + e, f.v_min, f.u_max, vc - e),
            ],
        )
    };

    Some(CorridorCarve {
        shape: CorridorShape::TJunction,
        corridors: vec![f.along(vc), branch],
        spaces,
    })
}

/// Two bars across the short axis joined by a crossbar
///
/// Needs room for three spaces side by side along the long axis, so it is
/// rejected on containers that are too short or too square for that.
pub fn carve_h(container: Rect, params: &CarveParams, rng: &mut LayoutRng) -> Option<CorridorCarve> {
    let f = Frame::new(container, params);
    let e = f.expansion;

    // bar centers must leave min_u on the left, between the bars and on the right
    let spacing = 2 * e + f.min_u - 1;
    let lo1 = f.u_min + f.min_u - 1 + e;
    let hi2 = f.u_max - f.min_u + 1 - e;
    let hi1 = hi2 - spacing;
    if lo1 > hi1 {
        return None;
    }
    let vc = f.along_center(Band::Middle, rng)?;

    let slack = (hi1 - lo1) / 2;
    let u1 = rng.range_inclusive(lo1, lo1 + slack);
    let u2 = rng.range_inclusive((u1 + spacing).max(hi2 - slack), hi2);

    Some(CorridorCarve {
        shape: CorridorShape::H,
        corridors: vec![
            f.across(u1),
            f.across(u2),
            f.rect(u1 + e, vc - e, u2 - e, vc + e),
        ],
        spaces: vec![
            f.rect(f.u_min, f.v_min, u1 - e, f.v_max),
            f.rect(u2 + e, f.v_min, f.u_max, f.v_max),
            f.rect(u1 + e, f.v_min, u2 - e, vc - e),
            f.rect(u1 + e, vc + e, u2 - e, f.v_max),
        ],
    })
}

/// Carve one specific shape, `None` if it does not fit
pub fn carve_shape(
    shape: CorridorShape,
    container: Rect,
    params: &CarveParams,
    rng: &mut LayoutRng,
) -> Option<CorridorCarve> {
    match shape {
        CorridorShape::Straight => carve_straight(container, params, rng),
        CorridorShape::Cross => carve_cross(container, params, rng),
        CorridorShape::TJunction => carve_t_junction(container, params, rng),
        CorridorShape::H => carve_h(container, params, rng),
        CorridorShape::AsymmetricCross => carve_asymmetric_cross(container, params, rng),
    }
}

/// Carve a random shape from `shapes`
///
/// Shapes that do not fit the container are dropped from the candidates.
/// Returns `None` once no candidate is left.
pub fn carve_corridors(
    container: Rect,
    params: &CarveParams,
    shapes: ShapeSet,
    rng: &mut LayoutRng,
) -> Option<CorridorCarve> {
    let mut candidates: Vec<CorridorShape> = shapes.shapes().collect();
    rng.shuffle(&mut candidates);

    for shape in candidates {
        match carve_shape(shape, container, params, rng) {
            Some(carve) => {
                debug_assert!(carve.spaces.iter().all(|s| {
                    s.width() >= params.min_room_width && s.height() >= params.min_room_height
                }));
                return Some(carve);
            }
            None => debug!(%shape, ?container, "corridor shape does not fit, dropping it"),
        }
    }
    None
}

/// Group corridor rects into rooms: rects that overlap, directly or
/// through other rects, share a room
pub fn group_corridors(rects: &[Rect]) -> Vec<Vec<Rect>> {
    let mut group_of: Vec<Option<usize>> = vec![None; rects.len()];
    let mut groups: Vec<Vec<Rect>> = Vec::new();

    for start in 0..rects.len() {
        if group_of[start].is_some() {
            continue;
        }
        let gid = groups.len();
        group_of[start] = Some(gid);
        let mut members = vec![start];
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            for j in 0..rects.len() {
                if group_of[j].is_none() && rects[i].overlaps(&rects[j]) {
                    group_of[j] = Some(gid);
                    members.push(j);
                    stack.push(j);
                }
            }
        }
        members.sort_unstable();
        groups.push(members.into_iter().map(|i| rects[i]).collect());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: CarveParams = CarveParams {
        expansion: 1,
        min_room_width: 5,
        min_room_height: 5,
    };

    fn assert_partition(carve: &CorridorCarve, container: Rect, params: &CarveParams) {
        for r in carve.corridors.iter().chain(&carve.spaces) {
            assert!(container.contains_rect(r), "{r:?} leaves the container");
        }
        for s in &carve.spaces {
            assert!(s.width() >= params.min_room_width && s.height() >= params.min_room_height, "{s:?} too small");
        }
        for (i, a) in carve.spaces.iter().enumerate() {
            for b in &carve.spaces[i + 1..] {
                assert!(!a.overlaps(b), "spaces {a:?} and {b:?} overlap");
            }
        }
        for pos in container.cells() {
            assert!(
                carve.corridors.iter().chain(&carve.spaces).any(|r| r.contains(pos)),
                "{pos:?} not covered by {carve:?}"
            );
        }
        assert_eq!(group_corridors(&carve.corridors).len(), 1);
    }

    #[test]
    fn test_every_shape_partitions_container() {
        let container = Rect::new(0, 0, 47, 29);
        for shape in CorridorShape::iter() {
            for seed in 0..20 {
                let mut rng = LayoutRng::new(seed);
                let carve = carve_shape(shape, container, &PARAMS, &mut rng)
                    .unwrap_or_else(|| panic!("{shape} should fit {container:?}"));
                assert_eq!(carve.shape, shape);
                assert_partition(&carve, container, &PARAMS);
            }
        }
    }

    #[test]
    fn test_tall_container_rotates() {
        let container = Rect::new(0, 0, 11, 39);
        let mut rng = LayoutRng::new(4);
        let carve = carve_straight(container, &PARAMS, &mut rng).unwrap();
        let corridor = carve.corridors[0];
        assert_eq!(corridor.height(), 40);
        assert_eq!(corridor.width(), 3);
        assert_partition(&carve, container, &PARAMS);
    }

    #[test]
    fn test_straight_spans_long_axis() {
        let container = Rect::new(0, 0, 39, 11);
        let params = CarveParams {
            expansion: 2,
            min_room_width: 4,
            min_room_height: 4,
        };
        let mut rng = LayoutRng::new(8);
        let carve = carve_straight(container, &params, &mut rng).unwrap();
        assert_eq!(carve.corridors.len(), 1);
        assert_eq!(carve.corridors[0].width(), 40);
        assert_eq!(carve.corridors[0].height(), 5);
        assert_eq!(carve.spaces.len(), 2);
    }

    #[test]
    fn test_h_rejected_when_too_short() {
        let container = Rect::new(0, 0, 19, 11);
        let params = CarveParams {
            expansion: 2,
            min_room_width: 5,
            min_room_height: 3,
        };
        let mut rng = LayoutRng::new(1);
        assert!(carve_h(container, &params, &mut rng).is_none());
    }

    #[test]
    fn test_nothing_fits_tiny_container() {
        let container = Rect::new(0, 0, 9, 9);
        let mut rng = LayoutRng::new(1);
        assert!(carve_corridors(container, &PARAMS, ShapeSet::all(), &mut rng).is_none());
        assert!(carve_corridors(Rect::new(0, 0, 40, 40), &PARAMS, ShapeSet::empty(), &mut rng).is_none());
    }

    #[test]
    fn test_fallback_to_fitting_shape() {
        // too short for an H, wide enough for a straight corridor
        let container = Rect::new(0, 0, 19, 11);
        let params = CarveParams {
            expansion: 2,
            min_room_width: 5,
            min_room_height: 3,
        };
        for seed in 0..10 {
            let mut rng = LayoutRng::new(seed);
            let carve = carve_corridors(container, &params, ShapeSet::H | ShapeSet::STRAIGHT, &mut rng).unwrap();
            assert_eq!(carve.shape, CorridorShape::Straight);
        }
    }

    #[test]
    fn test_group_corridors() {
        let rects = [
            Rect::new(0, 4, 30, 6),
            Rect::new(40, 0, 42, 20),
            Rect::new(10, 0, 12, 20),
        ];
        let groups = group_corridors(&rects);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec![rects[0], rects[2]]);
        assert_eq!(groups[1], vec![rects[1]]);
    }

    #[test]
    fn test_shape_set_serde() {
        let set = ShapeSet::CROSS | ShapeSet::H;
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["cross","h"]"#);
        let back: ShapeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!("t-junction".parse::<CorridorShape>().unwrap(), CorridorShape::TJunction);
    }
}
