//! Layout engine: where concept nodes sit on the tree drawing
//!
//! Coordinates live in a 1000x800 canvas with the roots at the bottom and the
//! foliage at the top. Layout is presentational only and never feeds back into
//! unlock or completion state.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::LayerId;

/// Node placement on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Position {
    fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

const ROOT_RADIUS: f64 = 26.0;
const TRUNK_RADIUS: f64 = 26.0;
const BRANCH_RADIUS: f64 = 24.0;
/// Trunk nodes placed by the parametric strategy are drawn smaller than the slot table ones.
const PARAMETRIC_TRUNK_RADIUS: f64 = 24.0;

/// Along the root system paths.
const ROOT_SLOTS: [(f64, f64); 6] = [
    (250.0, 750.0),
    (350.0, 760.0),
    (450.0, 740.0),
    (550.0, 740.0),
    (650.0, 760.0),
    (750.0, 750.0),
];

/// Alternating around the trunk, bottom to top.
const TRUNK_SLOTS: [(f64, f64); 8] = [
    (420.0, 680.0),
    (580.0, 670.0),
    (410.0, 620.0),
    (590.0, 610.0),
    (425.0, 560.0),
    (575.0, 570.0),
    (415.0, 500.0),
    (585.0, 510.0),
];

/// Foliage clusters: outer, central, secondary, then spread.
const BRANCH_SLOTS: [(f64, f64); 10] = [
    (250.0, 220.0),
    (750.0, 220.0),
    (400.0, 180.0),
    (600.0, 180.0),
    (500.0, 160.0),
    (320.0, 260.0),
    (680.0, 260.0),
    (450.0, 240.0),
    (550.0, 240.0),
    (370.0, 210.0),
];

/// Number of node slots the drawing has for `layer`.
pub fn slot_count(layer: &LayerId) -> usize {
    match layer {
        LayerId::Roots => ROOT_SLOTS.len(),
        LayerId::Trunk => TRUNK_SLOTS.len(),
        LayerId::Branches => BRANCH_SLOTS.len(),
        LayerId::Other(_) => 0,
    }
}

/// Fixed slot table positions; `min(count, slot_count(layer))` entries.
pub fn slot_positions(layer: &LayerId, count: usize) -> Vec<Position> {
    let (slots, radius): (&[(f64, f64)], f64) = match layer {
        LayerId::Roots => (&ROOT_SLOTS, ROOT_RADIUS),
        LayerId::Trunk => (&TRUNK_SLOTS, TRUNK_RADIUS),
        LayerId::Branches => (&BRANCH_SLOTS, BRANCH_RADIUS),
        LayerId::Other(_) => return Vec::new(),
    };
    slots
        .iter()
        .take(count)
        .map(|&(x, y)| Position::new(x, y, radius))
        .collect()
}

/// Ellipse arc parameters for [`arc_positions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_deg: f64,
    pub end_deg: f64,
}

/// Spread `count` nodes evenly along an ellipse arc, each nudged by up to `jitter`.
pub fn arc_positions<R: Rng + ?Sized>(
    arc: &Arc,
    count: usize,
    jitter: f64,
    base_radius: f64,
    rng: &mut R,
) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    let to_rad = |deg: f64| deg * PI / 180.0;
    let start = to_rad(arc.start_deg);
    let end = to_rad(arc.end_deg);
    let step = (end - start) / count.saturating_sub(1).max(1) as f64;

    (0..count)
        .map(|i| {
            let angle = start + step * i as f64;
            let mut x = arc.center_x + arc.radius_x * angle.cos();
            let mut y = arc.center_y + arc.radius_y * angle.sin();
            if jitter > 0.0 {
                x += rng.gen_range(-1.0_f64..=1.0) * jitter;
                y += rng.gen_range(-1.0_f64..=1.0) * jitter;
            }
            Position::new(x, y, base_radius)
        })
        .collect()
}

/// Alternate nodes left and right of the trunk from `start_y` up to `end_y`.
pub fn trunk_positions<R: Rng + ?Sized>(
    center_x: f64,
    start_y: f64,
    end_y: f64,
    count: usize,
    base_radius: f64,
    rng: &mut R,
) -> Vec<Position> {
    let step = (start_y - end_y) / count.saturating_sub(1).max(1) as f64;
    (0..count)
        .map(|i| {
            let y = start_y - step * i as f64;
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            let offset = 70.0 + (i % 3) as f64 * 15.0;
            let x = center_x + side * offset + rng.gen_range(-4.0_f64..4.0);
            Position::new(x, y + rng.gen_range(-4.0_f64..4.0), base_radius)
        })
        .collect()
}

/// How node positions are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Fixed slot tables; identical output on every call.
    #[default]
    Slots,
    /// Arc and trunk formulas with jitter from a seeded generator.
    Parametric,
}

/// Maps a layer and its concept count to node positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEngine {
    strategy: LayoutStrategy,
    seed: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutStrategy::Slots, 0)
    }
}

impl LayoutEngine {
    pub fn new(strategy: LayoutStrategy, seed: u64) -> Self {
        Self { strategy, seed }
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// Positions for the first `min(count, slot_count(layer))` concepts of `layer`.
    pub fn positions(&self, layer: &LayerId, count: usize) -> Vec<Position> {
        let count = count.min(slot_count(layer));
        match self.strategy {
            LayoutStrategy::Slots => slot_positions(layer, count),
            LayoutStrategy::Parametric => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                match layer {
                    LayerId::Roots => arc_positions(
                        &Arc {
                            center_x: 500.0,
                            center_y: 700.0,
                            radius_x: 260.0,
                            radius_y: 60.0,
                            start_deg: 160.0,
                            end_deg: 20.0,
                        },
                        count,
                        6.0,
                        ROOT_RADIUS,
                        &mut rng,
                    ),
                    LayerId::Trunk => trunk_positions(
                        500.0,
                        680.0,
                        500.0,
                        count,
                        PARAMETRIC_TRUNK_RADIUS,
                        &mut rng,
                    ),
                    LayerId::Branches => arc_positions(
                        &Arc {
                            center_x: 500.0,
                            center_y: 260.0,
                            radius_x: 250.0,
                            radius_y: 100.0,
                            start_deg: 200.0,
                            end_deg: 340.0,
                        },
                        count,
                        10.0,
                        BRANCH_RADIUS,
                        &mut rng,
                    ),
                    LayerId::Other(_) => Vec::new(),
                }
            }
        }
    }
}

/// Node radius grown with the title, bounded to `[base, base + 10]`.
pub fn dynamic_radius(base: f64, title: &str) -> f64 {
    let len = title.chars().count() as f64;
    (len * 1.5 + 12.0).min(base + 10.0).max(base)
}

/// Title lines that fit inside a node of `radius`.
///
/// Long titles are cut with `...`; titles over 15 characters in large nodes are
/// split at the middle word when both halves fit.
pub fn fit_title(title: &str, radius: f64) -> Vec<String> {
    let max_chars = (radius / 2.5).floor() as usize;
    let len = title.chars().count();

    if len > 15 && radius > 30.0 {
        let words: Vec<&str> = title.split(' ').collect();
        let mid = words.len().div_ceil(2);
        let first = words[..mid].join(" ");
        let second = words[mid..].join(" ");
        if first.chars().count() <= max_chars && second.chars().count() <= max_chars {
            return vec![first, second];
        }
    }

    if len > max_chars {
        let kept: String = title.chars().take(max_chars.saturating_sub(3)).collect();
        vec![format!("{kept}...")]
    } else {
        vec![title.to_string()]
    }
}
