//! Random non-overlapping placement for freshly captured items.
//!
//! Placement is presentation data; the day flow only attaches the result to
//! new items and never reasons about it.
//!
//! # Invariants
//! - Accepted candidates avoid the input card and the bottom button regions.
//! - Accepted candidates keep `MIN_DISTANCE` to every positioned item.
//! - After `MAX_ATTEMPTS` rejections the fallback ignores both constraints.

use crate::model::item::{Item, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_ATTEMPTS: usize = 100;
pub const MIN_DISTANCE: f64 = 12.0;

const COORD_MIN: u8 = 10;
const COORD_MAX: u8 = 90;
const ROTATION_MIN: i8 = -10;
const ROTATION_MAX: i8 = 10;

/// Placement source attached to the item store.
pub trait Layout: Send {
    fn place(&mut self, existing: &[Item]) -> Position;
}

/// Rejection-sampling layout over any random source.
pub struct RandomLayout<R: Rng + Send = StdRng> {
    rng: R,
}

impl RandomLayout<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomLayout<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Layout for RandomLayout<R> {
    fn place(&mut self, existing: &[Item]) -> Position {
        for _ in 0..MAX_ATTEMPTS {
            let top = self.rng.gen_range(COORD_MIN..COORD_MAX);
            let left = self.rng.gen_range(COORD_MIN..COORD_MAX);
            if in_reserved_region(top, left) || crowds(top, left, existing) {
                continue;
            }
            return Position {
                top,
                left,
                rotation: self.rng.gen_range(ROTATION_MIN..ROTATION_MAX),
            };
        }

        Position {
            top: self.rng.gen_range(COORD_MIN..COORD_MAX),
            left: self.rng.gen_range(COORD_MIN..COORD_MAX),
            rotation: 0,
        }
    }
}

/// Center input card or bottom "Done" button.
pub fn in_reserved_region(top: u8, left: u8) -> bool {
    let in_center_box = top > 30 && top < 65 && left > 25 && left < 75;
    let in_bottom_button = top > 75 && left > 35 && left < 65;
    in_center_box || in_bottom_button
}

/// Euclidean distance between two placements, in percentage points.
pub fn distance(a: (u8, u8), b: (u8, u8)) -> f64 {
    let dt = f64::from(a.0) - f64::from(b.0);
    let dl = f64::from(a.1) - f64::from(b.1);
    (dt * dt + dl * dl).sqrt()
}

fn crowds(top: u8, left: u8, existing: &[Item]) -> bool {
    existing
        .iter()
        .filter_map(|item| item.pos)
        .any(|pos| distance((top, left), (pos.top, pos.left)) < MIN_DISTANCE)
}
