//! Grouping of start-sorted intervals by calendar day.

use std::iter::Peekable;

use chrono::NaiveDate;
use serde::Serialize;

use crate::interval::Interval;

/// The awake intervals that start on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyGroup {
    pub date: NaiveDate,
    pub intervals: Vec<Interval>,
}

/// Iterator adapter producing one [`DailyGroup`] per contiguous run of dates.
pub struct DailyGroups<I: Iterator> {
    intervals: Peekable<I>,
}

impl<I> Iterator for DailyGroups<I>
where
    I: Iterator<Item = Interval>,
{
    type Item = DailyGroup;

    fn next(&mut self) -> Option<DailyGroup> {
        let first = self.intervals.next()?;
        let date = first.start_date();
        let mut intervals = vec![first];
        while let Some(next) = self
            .intervals
            .next_if(|interval| interval.start_date() == date)
        {
            intervals.push(next);
        }
        Some(DailyGroup { date, intervals })
    }
}

/// Lazily groups intervals by start date.
///
/// Input must already be sorted by start. Nothing is re-sorted: a date that
/// reappears after another date starts a new group.
pub fn group_by_date<I>(intervals: I) -> DailyGroups<I::IntoIter>
where
    I: IntoIterator<Item = Interval>,
{
    DailyGroups {
        intervals: intervals.into_iter().peekable(),
    }
}
