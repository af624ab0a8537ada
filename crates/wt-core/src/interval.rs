//! Awake intervals and the overlap test used for deduplication.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The interval ends before it starts.
    #[error("interval ends before it starts: {start} > {end}")]
    EndBeforeStart {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

/// A half-open span of time `[start, end)`.
///
/// Intervals are plain values: two intervals with the same bounds are the
/// same interval. The constructor enforces `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Creates an interval, rejecting one that ends before it starts.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Length of the interval. Never negative.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Calendar date of the start, in the start's own offset.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Returns a copy of this interval stretched to end where `other` ends.
    ///
    /// `other` must not end before `self` starts.
    pub(crate) fn extended_to(self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.start),
        }
    }

    /// Whether the two intervals share at least one instant.
    ///
    /// Comparison is open on both sides, so intervals that only touch at an
    /// endpoint do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    /// Renders as `2024-01-01 09:00 - 10:00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.start.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, FixedOffset};

    use super::Interval;

    /// Parses `2024-01-01 09:00` as a +01:00 timestamp.
    pub fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_str(&format!("{s}:00 +0100"), "%Y-%m-%d %H:%M:%S %z").unwrap()
    }

    /// Builds an interval on 2024-01-01 from two `HH:MM` times.
    pub fn span(start: &str, end: &str) -> Interval {
        Interval::new(at(&format!("2024-01-01 {start}")), at(&format!("2024-01-01 {end}")))
            .unwrap()
    }
}
