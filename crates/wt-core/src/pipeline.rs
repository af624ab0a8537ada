//! The end-to-end pipeline from log lines to per-day awake intervals.
//!
//! Every stage pulls from the previous one on demand, so the whole chain can
//! run over a live log without buffering it.

use crate::filter::{NoiseFilterConfig, filter_noise};
use crate::group::{DailyGroup, group_by_date};
use crate::interval::Interval;
use crate::parse::parse_events;
use crate::reconstruct::wake_periods;

/// Completed wake periods, before noise filtering.
pub fn raw_awake_intervals<I>(lines: I) -> impl Iterator<Item = Interval>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    wake_periods(parse_events(lines))
}

/// Completed wake periods with both noise filter passes applied.
pub fn awake_intervals<I>(lines: I, config: NoiseFilterConfig) -> impl Iterator<Item = Interval>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    filter_noise(raw_awake_intervals(lines), config)
}

/// Filtered awake intervals grouped by the date they start on.
pub fn daily_awake_intervals<I>(
    lines: I,
    config: NoiseFilterConfig,
) -> impl Iterator<Item = DailyGroup>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    group_by_date(awake_intervals(lines, config))
}
