//! Playing strength: one rating drives both the local search limits and the
//! options sent to an external engine.

use std::time::Duration;

use crate::search::iterative_deepening::SearchConfig;

pub const DEFAULT_RATING: u32 = 2800;

/// At or above this rating the external engine plays at full strength.
pub const UNLIMITED_RATING: u32 = 2800;

pub const MIN_EXTERNAL_MOVETIME_MS: u64 = 450;
pub const MAX_EXTERNAL_MOVETIME_MS: u64 = 4500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strength {
    pub rating: u32,
}

impl Default for Strength {
    fn default() -> Self {
        Self::new(DEFAULT_RATING)
    }
}

impl Strength {
    #[inline]
    pub const fn new(rating: u32) -> Self {
        Self { rating }
    }

    pub fn search_depth(self) -> u8 {
        match self.rating {
            r if r >= 2600 => 8,
            r if r >= 2200 => 7,
            r if r >= 1800 => 6,
            _ => 4,
        }
    }

    pub fn time_budget(self) -> Duration {
        let ms = match self.rating {
            r if r >= 2600 => 10_000,
            r if r >= 2200 => 8_000,
            r if r >= 1800 => 5_000,
            _ => 2_500,
        };
        Duration::from_millis(ms)
    }

    pub fn search_config(self) -> SearchConfig {
        SearchConfig {
            max_depth: self.search_depth(),
            time_budget: Some(self.time_budget()),
        }
    }

    #[inline]
    pub fn limit_strength(self) -> bool {
        self.rating < UNLIMITED_RATING
    }

    /// `round((rating - 1000) / 70)` clamped to the UCI range 0..=20.
    pub fn skill_level(self) -> u8 {
        let level = ((f64::from(self.rating) - 1000.0) / 70.0).round();
        level.clamp(0.0, 20.0) as u8
    }

    /// `round(rating * 1.15)` ms, clamped to 450..=4500.
    pub fn external_movetime_ms(self) -> u64 {
        let ms = (u64::from(self.rating) * 115 + 50) / 100;
        ms.clamp(MIN_EXTERNAL_MOVETIME_MS, MAX_EXTERNAL_MOVETIME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_rating_thresholds() {
        let cases = [
            (3000, 8, 10_000),
            (2600, 8, 10_000),
            (2599, 7, 8_000),
            (2200, 7, 8_000),
            (1800, 6, 5_000),
            (1799, 4, 2_500),
            (800, 4, 2_500),
        ];
        for (rating, depth, ms) in cases {
            let strength = Strength::new(rating);
            assert_eq!(strength.search_depth(), depth, "rating {rating}");
            assert_eq!(strength.time_budget(), Duration::from_millis(ms), "rating {rating}");
        }
    }

    #[test]
    fn external_options() {
        let full = Strength::default();
        assert!(!full.limit_strength());
        assert_eq!(full.skill_level(), 20);
        assert_eq!(full.external_movetime_ms(), 3220);

        let club = Strength::new(1500);
        assert!(club.limit_strength());
        assert_eq!(club.skill_level(), 7);
        assert_eq!(club.external_movetime_ms(), 1725);

        assert_eq!(Strength::new(900).skill_level(), 0);
        assert_eq!(Strength::new(300).external_movetime_ms(), 450);
        assert_eq!(Strength::new(5000).external_movetime_ms(), 4500);
    }
}
