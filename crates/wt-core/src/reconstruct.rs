//! Reconstruction of awake intervals from a wake/sleep event stream.

use chrono::{DateTime, FixedOffset};

use crate::event::{Event, EventKind};
use crate::interval::Interval;

/// Tracks the currently open wake period.
///
/// Only a `Sleep` closes a period, so a wake period that is still open when
/// the stream ends is never reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakePeriodTracker {
    open_since: Option<DateTime<FixedOffset>>,
}

impl WakePeriodTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { open_since: None }
    }

    /// Start of the open wake period, if any.
    #[must_use]
    pub const fn open_since(&self) -> Option<DateTime<FixedOffset>> {
        self.open_since
    }

    /// Feeds one event, returning the interval it completes, if any.
    ///
    /// A repeated `Wake` keeps the first start. A `Sleep` without a preceding
    /// `Wake` is ignored.
    pub fn step(&mut self, event: &Event) -> Option<Interval> {
        match event.kind {
            EventKind::Wake => {
                self.open_since.get_or_insert(event.timestamp);
                None
            }
            EventKind::Sleep => {
                let start = self.open_since.take()?;
                match Interval::new(start, event.timestamp) {
                    Ok(interval) => Some(interval),
                    Err(err) => {
                        // Clock adjustments can put a sleep before its wake.
                        tracing::warn!(%err, "dropping wake period");
                        None
                    }
                }
            }
        }
    }
}

/// Iterator adapter yielding completed wake periods.
#[derive(Debug, Clone)]
pub struct WakePeriods<I> {
    events: I,
    tracker: WakePeriodTracker,
}

impl<I> Iterator for WakePeriods<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        for event in self.events.by_ref() {
            if let Some(interval) = self.tracker.step(&event) {
                return Some(interval);
            }
        }
        None
    }
}

/// Lazily pairs each `Wake` with the next `Sleep`.
///
/// Events must be in timestamp order.
pub fn wake_periods<I>(events: I) -> WakePeriods<I::IntoIter>
where
    I: IntoIterator<Item = Event>,
{
    WakePeriods {
        events: events.into_iter(),
        tracker: WakePeriodTracker::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::test_support::{at, span};

    fn wake(time: &str) -> Event {
        Event {
            timestamp: at(&format!("2024-01-01 {time}")),
            kind: EventKind::Wake,
        }
    }

    fn sleep(time: &str) -> Event {
        Event {
            timestamp: at(&format!("2024-01-01 {time}")),
            kind: EventKind::Sleep,
        }
    }

    #[test]
    fn pairs_alternating_events() {
        let events = vec![
            wake("08:00"),
            sleep("09:00"),
            wake("10:00"),
            sleep("11:30"),
        ];
        let periods: Vec<_> = wake_periods(events).collect();
        assert_eq!(periods, vec![span("08:00", "09:00"), span("10:00", "11:30")]);
    }

    #[test]
    fn trailing_wake_is_not_emitted() {
        let events = vec![wake("08:00"), sleep("09:00"), wake("10:00")];
        let periods: Vec<_> = wake_periods(events).collect();
        assert_eq!(periods, vec![span("08:00", "09:00")]);
    }

    #[test]
    fn repeated_wake_keeps_first_start() {
        let doubled: Vec<_> =
            wake_periods(vec![wake("08:00"), wake("08:30"), sleep("09:00")]).collect();
        let single: Vec<_> = wake_periods(vec![wake("08:00"), sleep("09:00")]).collect();
        assert_eq!(doubled, single);
    }

    #[test]
    fn sleep_without_wake_is_ignored() {
        let events = vec![sleep("07:00"), sleep("07:30"), wake("08:00"), sleep("09:00")];
        let periods: Vec<_> = wake_periods(events).collect();
        assert_eq!(periods, vec![span("08:00", "09:00")]);
    }

    #[test]
    fn sleep_before_its_wake_is_dropped() {
        let events = vec![wake("09:00"), sleep("08:00"), wake("10:00"), sleep("11:00")];
        let periods: Vec<_> = wake_periods(events).collect();
        assert_eq!(periods, vec![span("10:00", "11:00")]);
    }

    #[test]
    fn tracker_step_reports_open_period() {
        let mut tracker = WakePeriodTracker::new();
        assert_eq!(tracker.step(&wake("08:00")), None);
        assert_eq!(tracker.open_since(), Some(at("2024-01-01 08:00")));
        assert_eq!(tracker.step(&sleep("09:00")), Some(span("08:00", "09:00")));
        assert_eq!(tracker.open_since(), None);
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert_eq!(wake_periods(Vec::new()).count(), 0);
    }
}
