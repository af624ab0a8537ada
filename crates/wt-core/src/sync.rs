//! Day-by-day reconciliation against a remote time-tracking service.
//!
//! For every completed day: fetch what is already recorded, keep the
//! candidates that overlap none of it, submit those. Fetch-then-submit is not
//! transactional; entries created remotely in between are not guarded against.

use chrono::NaiveDate;
use thiserror::Error;

use crate::group::DailyGroup;
use crate::interval::Interval;
use crate::reconcile::retain_new;

/// A remote record of worked time, one calendar day at a time.
///
/// Implemented by the web client; tests use in-memory fakes.
pub trait TrackingService {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the intervals already recorded on `date`.
    fn fetch_existing_intervals(&mut self, date: NaiveDate) -> Result<Vec<Interval>, Self::Error>;

    /// Records a new interval.
    fn submit_interval(&mut self, interval: &Interval) -> Result<(), Self::Error>;
}

/// Sync aborts at the first service failure.
#[derive(Debug, Error)]
pub enum SyncError<E: std::error::Error + 'static> {
    #[error("failed to fetch entries for {date}")]
    Fetch {
        date: NaiveDate,
        #[source]
        source: E,
    },
    #[error("failed to submit entry {interval}")]
    Submit {
        interval: Interval,
        #[source]
        source: E,
    },
}

/// What happened to one day's candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySync {
    pub date: NaiveDate,
    /// Candidates with no overlap; submitted unless this was a dry run.
    pub submitted: Vec<Interval>,
    /// Candidates suppressed because they overlap a recorded entry.
    pub already_recorded: Vec<Interval>,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub dry_run: bool,
    pub days: Vec<DaySync>,
    /// Days left alone because they are not over yet.
    pub pending_days: Vec<NaiveDate>,
}

impl SyncReport {
    pub fn submitted_count(&self) -> usize {
        self.days.iter().map(|day| day.submitted.len()).sum()
    }
}

/// Reconciles each completed day in `groups` against `service`.
///
/// Days on or after `today` are skipped since their last wake period may
/// still be open. With `dry_run`, existing entries are still fetched but
/// nothing is submitted.
pub fn sync_days<S, I>(
    service: &mut S,
    groups: I,
    today: NaiveDate,
    dry_run: bool,
) -> Result<SyncReport, SyncError<S::Error>>
where
    S: TrackingService,
    I: IntoIterator<Item = DailyGroup>,
{
    let mut report = SyncReport {
        dry_run,
        ..SyncReport::default()
    };

    for group in groups {
        if group.date >= today {
            tracing::debug!(date = %group.date, "skipping incomplete day");
            report.pending_days.push(group.date);
            continue;
        }

        let existing = service
            .fetch_existing_intervals(group.date)
            .map_err(|source| SyncError::Fetch {
                date: group.date,
                source,
            })?;

        let submitted: Vec<_> = retain_new(&existing, group.intervals.iter().copied()).collect();
        let already_recorded: Vec<_> = group
            .intervals
            .iter()
            .filter(|interval| !submitted.contains(interval))
            .copied()
            .collect();

        if !dry_run {
            for interval in &submitted {
                service
                    .submit_interval(interval)
                    .map_err(|source| SyncError::Submit {
                        interval: *interval,
                        source,
                    })?;
            }
        }

        tracing::debug!(
            date = %group.date,
            submitted = submitted.len(),
            already_recorded = already_recorded.len(),
            "day reconciled"
        );
        report.days.push(DaySync {
            date: group.date,
            submitted,
            already_recorded,
        });
    }

    Ok(report)
}
