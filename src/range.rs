use crate::error::{Error, Result};
use crate::strategy::{GuessRecord, GuessResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MIN: i64 = 1;
pub const DEFAULT_MAX: i64 = 10_000;

/// Closed integer interval `[min, max]` known to contain the target.
///
/// A range only ever narrows: `min` goes up after a `low` answer and `max`
/// goes down after a `high` one. Contradictory feedback can push `min` past
/// `max`; that state is reported by [`Range::is_inverted`] rather than
/// rejected, so the caller can end the session cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Distance between the bounds; zero for a single value.
    #[must_use]
    pub fn span(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }

    /// Number of integers still inside the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        if self.is_inverted() {
            0
        } else {
            self.max.abs_diff(self.min).saturating_add(1)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_inverted()
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Floor of the midpoint, computed without overflowing on wide ranges.
    #[must_use]
    pub fn midpoint(&self) -> i64 {
        (i128::from(self.min) + i128::from(self.max)).div_euclid(2) as i64
    }

    /// Turns a raw strategy pick into a guess the host will accept.
    ///
    /// Rounds half up, then clamps into the range. NaN rounds to zero before
    /// clamping. On an inverted range the result is `max`, which no honest
    /// host can accept; callers check [`Range::is_inverted`] first.
    #[must_use]
    pub fn sanitize(&self, raw: f64) -> i64 {
        let rounded = (raw + 0.5).floor() as i64;
        rounded.max(self.min).min(self.max)
    }

    /// Narrows the range with one piece of feedback.
    pub fn narrow(&mut self, record: &GuessRecord) {
        match record.result {
            GuessResult::Low => self.min = self.min.max(record.guess.saturating_add(1)),
            GuessResult::High => self.max = self.max.min(record.guess.saturating_sub(1)),
            GuessResult::Correct => {}
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(guess: i64, result: GuessResult) -> GuessRecord {
        GuessRecord { guess, result }
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        assert!(Range::new(1, 10).is_ok());
        assert!(Range::new(5, 5).is_ok());
        assert!(matches!(
            Range::new(10, 1),
            Err(Error::InvalidRange { min: 10, max: 1 })
        ));
    }

    #[test]
    fn test_default_range() {
        let range = Range::default();
        assert_eq!(range.min, 1);
        assert_eq!(range.max, 10_000);
        assert_eq!(range.len(), 10_000);
    }

    #[test]
    fn test_narrow_low_raises_min() {
        let mut range = Range::new(1, 100).unwrap();
        range.narrow(&record(50, GuessResult::Low));
        assert_eq!(range, Range { min: 51, max: 100 });
    }

    #[test]
    fn test_narrow_high_lowers_max() {
        let mut range = Range::new(1, 100).unwrap();
        range.narrow(&record(50, GuessResult::High));
        assert_eq!(range, Range { min: 1, max: 49 });
    }

    #[test]
    fn test_narrow_never_widens() {
        let mut range = Range::new(40, 60).unwrap();
        // A stale "low" below the current minimum must not move min backwards
        range.narrow(&record(10, GuessResult::Low));
        assert_eq!(range.min, 40);
        // A stale "high" above the current maximum must not move max forwards
        range.narrow(&record(90, GuessResult::High));
        assert_eq!(range.max, 60);
    }

    #[test]
    fn test_narrow_correct_leaves_range() {
        let mut range = Range::new(1, 100).unwrap();
        range.narrow(&record(42, GuessResult::Correct));
        assert_eq!(range, Range { min: 1, max: 100 });
    }

    #[test]
    fn test_contradictory_feedback_inverts() {
        let mut range = Range::new(5, 5).unwrap();
        range.narrow(&record(5, GuessResult::Low));
        assert!(range.is_inverted());
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
    }

    #[test]
    fn test_midpoint_floors() {
        assert_eq!(Range::new(1, 100).unwrap().midpoint(), 50);
        assert_eq!(Range::new(4, 6).unwrap().midpoint(), 5);
        assert_eq!(Range::new(5, 6).unwrap().midpoint(), 5);
        assert_eq!(Range::new(-3, 0).unwrap().midpoint(), -2);
        assert_eq!(Range::new(i64::MAX - 1, i64::MAX).unwrap().midpoint(), i64::MAX - 1);
    }

    #[test]
    fn test_sanitize_rounds_and_clamps() {
        let range = Range::new(10, 20).unwrap();
        assert_eq!(range.sanitize(14.4), 14);
        assert_eq!(range.sanitize(14.5), 15);
        assert_eq!(range.sanitize(-3.0), 10);
        assert_eq!(range.sanitize(1e12), 20);
        assert_eq!(range.sanitize(f64::NAN), 10);
        assert_eq!(range.sanitize(f64::INFINITY), 20);
    }

    #[test]
    fn test_sanitize_inverted_range_does_not_panic() {
        let range = Range { min: 10, max: 1 };
        assert_eq!(range.sanitize(5.0), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::new(1, 100).unwrap().to_string(), "[1, 100]");
    }
}
