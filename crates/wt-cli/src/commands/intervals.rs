//! Show reconstructed awake intervals, grouped by day.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use clap::Args;
use wt_core::{DailyGroup, daily_awake_intervals, group_by_date, raw_awake_intervals};

use super::format_duration;
use crate::Config;
use crate::log_source::LogSource;

#[derive(Debug, Args)]
pub struct IntervalsArgs {
    /// Read the power log from this file instead of running the log command.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show wake periods without noise filtering.
    #[arg(long)]
    pub raw: bool,

    /// Output one JSON object per day.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &IntervalsArgs, config: &Config) -> Result<()> {
    let mut source = LogSource::open(config, args.log_file.as_deref())?;
    let lines = source.lines();

    let groups: Box<dyn Iterator<Item = DailyGroup> + '_> = if args.raw {
        Box::new(group_by_date(raw_awake_intervals(lines)))
    } else {
        Box::new(daily_awake_intervals(lines, config.noise_filter()))
    };
    render(writer, groups, args.json)
}

/// Writes each day as soon as it is complete.
fn render<W, I>(writer: &mut W, groups: I, json: bool) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = DailyGroup>,
{
    for group in groups {
        if json {
            writeln!(writer, "{}", serde_json::to_string(&group)?)?;
            continue;
        }

        let total = group
            .intervals
            .iter()
            .fold(Duration::zero(), |acc, interval| acc + interval.duration());
        writeln!(writer, "{}  {}", group.date, format_duration(total))?;
        for interval in &group.intervals {
            writeln!(
                writer,
                "  {} - {}",
                interval.start().format("%H:%M"),
                interval.end().format("%H:%M")
            )?;
        }
    }
    Ok(())
}
