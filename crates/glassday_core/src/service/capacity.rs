//! Energy-based capacity policy for glass items.
//!
//! # Invariants
//! - Active/postponed status is derived from rank only and never stored.
//! - Unset energy postpones nothing.

use crate::model::day::Energy;

/// Glass count above which the selection view warns. Presentation only.
pub const DEFAULT_GLASS_WARNING_THRESHOLD: usize = 5;

/// Maximum number of active glass items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Limited(usize),
    Unbounded,
}

impl Capacity {
    /// Returns whether the glass item at zero-based `rank` is active.
    pub fn admits(self, rank: usize) -> bool {
        match self {
            Self::Limited(limit) => rank < limit,
            Self::Unbounded => true,
        }
    }
}

/// Whether a glass item is carried today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlassStatus {
    Active,
    Postponed,
}

/// Maps an energy level to the active glass capacity.
pub fn limit(energy: Option<Energy>) -> Capacity {
    match energy {
        Some(Energy::Low) => Capacity::Limited(1),
        Some(Energy::Medium) => Capacity::Limited(3),
        Some(Energy::High) => Capacity::Limited(5),
        None => Capacity::Unbounded,
    }
}

/// Status of the glass item at `rank` under `energy`.
pub fn status_at(rank: usize, energy: Option<Energy>) -> GlassStatus {
    if limit(energy).admits(rank) {
        GlassStatus::Active
    } else {
        GlassStatus::Postponed
    }
}

/// Soft warning shown when too many items were marked glass.
pub fn too_much_glass(glass_count: usize, threshold: usize) -> bool {
    glass_count > threshold
}

#[cfg(test)]
mod tests {
    use super::{limit, status_at, too_much_glass, Capacity, GlassStatus};
    use crate::model::day::Energy;

    #[test]
    fn limits_follow_energy() {
        assert_eq!(limit(Some(Energy::Low)), Capacity::Limited(1));
        assert_eq!(limit(Some(Energy::Medium)), Capacity::Limited(3));
        assert_eq!(limit(Some(Energy::High)), Capacity::Limited(5));
        assert_eq!(limit(None), Capacity::Unbounded);
    }

    #[test]
    fn active_iff_rank_below_limit() {
        for energy in Energy::ALL {
            let Capacity::Limited(cap) = limit(Some(energy)) else {
                panic!("named energy levels are bounded");
            };
            for rank in 0..8 {
                let expected = if rank < cap {
                    GlassStatus::Active
                } else {
                    GlassStatus::Postponed
                };
                assert_eq!(status_at(rank, Some(energy)), expected);
            }
        }
        assert_eq!(status_at(10_000, None), GlassStatus::Active);
    }

    #[test]
    fn warning_starts_above_threshold() {
        assert!(!too_much_glass(5, 5));
        assert!(too_much_glass(6, 5));
    }
}
