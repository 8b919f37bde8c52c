//! Difficulty levels and what they mean for the engine.

use std::fmt;
use std::time::Duration;

/// A difficulty level in `1..=Difficulty::MAX`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Every selectable level, lowest first
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }

    /// Thinking time per engine move: `base_unit * (MAX + 1 - level)`.
    /// Level 1 gets the most time, level 20 a single unit.
    pub fn time_budget(self, base_unit: Duration) -> Duration {
        base_unit * u32::from(Self::MAX + 1 - self.0)
    }

    /// Map the level linearly onto an engine option range, level 1 to `min`
    /// and level 20 to `max`
    pub fn scale_to(self, min: i64, max: i64) -> i64 {
        let steps = i128::from(Self::MAX - Self::MIN);
        let (min, max) = (i128::from(min), i128::from(max));
        let scaled = min + i128::from(self.0 - Self::MIN) * (max - min) / steps;
        // stays within the i64 inputs, so the cast cannot truncate
        scaled.clamp(min.min(max), min.max(max)) as i64
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(10)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(21).is_none());
        assert_eq!(Difficulty::new(1).map(Difficulty::level), Some(1));
        assert_eq!(Difficulty::all().count(), 20);
    }

    #[test]
    fn test_time_budget() {
        let base = Duration::from_millis(100);
        assert_eq!(Difficulty::new(1).unwrap().time_budget(base), Duration::from_millis(2000));
        assert_eq!(Difficulty::new(20).unwrap().time_budget(base), Duration::from_millis(100));
        assert_eq!(Difficulty::default().time_budget(base), Duration::from_millis(1100));
    }

    #[test]
    fn test_scale_to() {
        assert_eq!(Difficulty::new(1).unwrap().scale_to(0, 20), 0);
        assert_eq!(Difficulty::new(20).unwrap().scale_to(0, 20), 20);
        assert_eq!(Difficulty::new(11).unwrap().scale_to(0, 19), 10);
        assert_eq!(Difficulty::new(20).unwrap().scale_to(-10, 10), 10);
    }

    #[test]
    fn test_scale_to_wide_and_reversed_ranges() {
        let (lowest, highest) = (Difficulty::new(1).unwrap(), Difficulty::new(20).unwrap());
        assert_eq!(lowest.scale_to(i64::MIN, i64::MAX), i64::MIN);
        assert_eq!(highest.scale_to(i64::MIN, i64::MAX), i64::MAX);
        for level in Difficulty::all() {
            let v = level.scale_to(i64::MIN / 2, i64::MAX / 2);
            assert!((i64::MIN / 2..=i64::MAX / 2).contains(&v));
        }
        assert_eq!(lowest.scale_to(20, 0), 20);
        assert_eq!(highest.scale_to(20, 0), 0);
    }
}
