//! Noise filtering of awake intervals.
//!
//! Two passes, always in this order:
//!
//! 1. Drop wake periods no longer than `min_wake_duration` (the machine
//!    briefly waking for a notification is not work).
//! 2. Merge wake periods separated by a sleep gap no longer than
//!    `min_sleep_duration` (a short break does not split a session).
//!
//! Merging first would let short blips bridge unrelated long gaps.

use chrono::Duration;

use crate::interval::Interval;

/// Thresholds for the noise filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseFilterConfig {
    /// Wake periods must be strictly longer than this to be kept.
    pub min_wake_duration: Duration,

    /// Sleep gaps up to and including this long are merged away.
    pub min_sleep_duration: Duration,
}

impl Default for NoiseFilterConfig {
    fn default() -> Self {
        Self {
            min_wake_duration: Duration::minutes(10),
            min_sleep_duration: Duration::minutes(30),
        }
    }
}

/// Lazily drops intervals whose duration does not exceed `min_duration`.
pub fn drop_short_wake_periods<I>(
    intervals: I,
    min_duration: Duration,
) -> impl Iterator<Item = Interval>
where
    I: IntoIterator<Item = Interval>,
{
    intervals
        .into_iter()
        .filter(move |interval| interval.duration() > min_duration)
}

/// Accumulates intervals whose separating gaps are short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepGapMerger {
    min_gap: Duration,
    pending: Option<Interval>,
}

impl SleepGapMerger {
    #[must_use]
    pub const fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            pending: None,
        }
    }

    /// Feeds the next interval, returning the previous accumulation once a
    /// gap longer than the threshold closes it.
    pub fn step(&mut self, interval: Interval) -> Option<Interval> {
        let Some(pending) = self.pending else {
            self.pending = Some(interval);
            return None;
        };

        if interval.start() - pending.end() <= self.min_gap {
            self.pending = Some(pending.extended_to(&interval));
            None
        } else {
            self.pending = Some(interval);
            Some(pending)
        }
    }

    /// Ends the stream, returning whatever is still accumulated.
    pub fn finish(&mut self) -> Option<Interval> {
        self.pending.take()
    }
}

/// Iterator adapter merging intervals across short sleep gaps.
#[derive(Debug, Clone)]
pub struct MergeShortSleeps<I> {
    intervals: I,
    merger: SleepGapMerger,
}

impl<I> Iterator for MergeShortSleeps<I>
where
    I: Iterator<Item = Interval>,
{
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        for interval in self.intervals.by_ref() {
            if let Some(done) = self.merger.step(interval) {
                return Some(done);
            }
        }
        self.merger.finish()
    }
}

/// Lazily merges start-sorted intervals separated by gaps of at most
/// `min_duration`.
pub fn merge_short_sleep_periods<I>(
    intervals: I,
    min_duration: Duration,
) -> MergeShortSleeps<I::IntoIter>
where
    I: IntoIterator<Item = Interval>,
{
    MergeShortSleeps {
        intervals: intervals.into_iter(),
        merger: SleepGapMerger::new(min_duration),
    }
}

/// Applies both filter passes in order.
pub fn filter_noise<I>(intervals: I, config: NoiseFilterConfig) -> impl Iterator<Item = Interval>
where
    I: IntoIterator<Item = Interval>,
{
    merge_short_sleep_periods(
        drop_short_wake_periods(intervals, config.min_wake_duration),
        config.min_sleep_duration,
    )
}
