//! Submit completed days' awake intervals to Hakuna.
//!
//! Each day is reconciled against the entries Hakuna already has; anything
//! overlapping a recorded entry is left out so repeated runs add nothing.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tokio::runtime::Runtime;
use wt_core::{Interval, SyncReport, TrackingService, daily_awake_intervals, sync_days};
use wt_hakuna::{Client, Credentials, HakunaError};

use crate::Config;
use crate::log_source::LogSource;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Read the power log from this file instead of running the log command.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show what would be submitted without submitting anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Drives the async Hakuna client from the synchronous sync loop.
struct HakunaService {
    runtime: Runtime,
    client: Client,
}

impl TrackingService for HakunaService {
    type Error = HakunaError;

    fn fetch_existing_intervals(&mut self, date: NaiveDate) -> Result<Vec<Interval>, HakunaError> {
        self.runtime.block_on(self.client.entries(date))
    }

    fn submit_interval(&mut self, interval: &Interval) -> Result<(), HakunaError> {
        self.runtime.block_on(self.client.enter_time(interval))
    }
}

pub fn run<W: Write>(writer: &mut W, args: &SyncArgs, config: &Config) -> Result<()> {
    let base_uri = required(config.base_uri.as_deref(), "Hakuna base_uri", "WT_BASE_URI")?;
    let credentials = Credentials {
        username: required(config.username.as_deref(), "Hakuna username", "WT_USERNAME")?
            .to_string(),
        password: required(config.password.as_deref(), "Hakuna password", "WT_PASSWORD")?
            .to_string(),
    };

    let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
    let client = runtime
        .block_on(Client::login(base_uri, &credentials, config.timezone))
        .with_context(|| format!("failed to sign in to {base_uri}"))?;
    tracing::debug!(?client, "signed in");
    let mut service = HakunaService { runtime, client };

    let mut source = LogSource::open(config, args.log_file.as_deref())?;
    let groups = daily_awake_intervals(source.lines(), config.noise_filter());
    let today = config.timezone.today();
    let report = sync_days(&mut service, groups, today, args.dry_run)?;

    write_report(writer, &report)
}

fn required<'a>(value: Option<&'a str>, what: &str, env: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing {what} (set {env} or config.toml)"))
}

fn write_report<W: Write>(writer: &mut W, report: &SyncReport) -> Result<()> {
    for day in &report.days {
        writeln!(writer, "{}", day.date)?;
        for interval in &day.submitted {
            let action = if report.dry_run { "would add" } else { "added" };
            writeln!(writer, "  {action:<17}{}", times(interval))?;
        }
        for interval in &day.already_recorded {
            writeln!(writer, "  {:<17}{}", "already tracked", times(interval))?;
        }
    }
    for date in &report.pending_days {
        writeln!(writer, "{date}  skipped (day not over)")?;
    }

    let count = report.submitted_count();
    let noun = if count == 1 { "entry" } else { "entries" };
    if report.dry_run {
        writeln!(writer, "Dry run: {count} {noun} would be added.")?;
    } else {
        writeln!(writer, "Added {count} {noun}.")?;
    }
    Ok(())
}

fn times(interval: &Interval) -> String {
    format!(
        "{} - {}",
        interval.start().format("%H:%M"),
        interval.end().format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use insta::assert_snapshot;
    use wt_core::DaySync;

    use super::*;

    fn interval(start: &str, end: &str) -> Interval {
        Interval::new(
            DateTime::parse_from_rfc3339(start).unwrap(),
            DateTime::parse_from_rfc3339(end).unwrap(),
        )
        .unwrap()
    }

    fn report(dry_run: bool) -> SyncReport {
        SyncReport {
            dry_run,
            days: vec![DaySync {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                submitted: vec![interval(
                    "2024-01-01T13:00:00+01:00",
                    "2024-01-01T17:00:00+01:00",
                )],
                already_recorded: vec![interval(
                    "2024-01-01T08:10:00+01:00",
                    "2024-01-01T12:00:00+01:00",
                )],
            }],
            pending_days: vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
        }
    }

    fn render(report: &SyncReport) -> String {
        let mut output = Vec::new();
        write_report(&mut output, report).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn report_lists_each_day() {
        assert_snapshot!(render(&report(false)), @r"
        2024-01-01
          added            13:00 - 17:00
          already tracked  08:10 - 12:00
        2024-01-02  skipped (day not over)
        Added 1 entry.
        ");
    }

    #[test]
    fn dry_run_report_says_nothing_was_added() {
        let output = render(&report(true));
        assert!(output.contains("would add"));
        assert!(output.ends_with("Dry run: 1 entry would be added.\n"));
    }

    #[test]
    fn missing_settings_name_the_env_var() {
        let err = required(None, "Hakuna base_uri", "WT_BASE_URI").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing Hakuna base_uri (set WT_BASE_URI or config.toml)"
        );
        assert!(required(Some("  "), "Hakuna username", "WT_USERNAME").is_err());
        assert_eq!(required(Some(" sami "), "x", "y").unwrap(), "sami");
    }
}
