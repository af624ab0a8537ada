//! Parsing of power log lines into [`Event`]s.
//!
//! A usable line starts with a tab-separated field shaped like
//! `2024-01-01 09:00:00 +0100 Wake                `: a fixed-width timestamp
//! with a UTC offset, a space, then the (padded) event kind. Headers, blank
//! lines and events of other kinds are noise and are skipped without error.

use chrono::DateTime;

use crate::event::{Event, EventKind};

/// Width of the `YYYY-MM-DD HH:MM:SS ±HHMM` prefix.
const TIMESTAMP_WIDTH: usize = 25;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parses a single log line, returning `None` for anything that is not a
/// sleep or wake event.
pub fn parse_line(line: &str) -> Option<Event> {
    let field = line.split('\t').next().unwrap_or_default();
    let stamp = field.get(..TIMESTAMP_WIDTH)?;
    let timestamp = DateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    let token = field.get(TIMESTAMP_WIDTH + 1..).unwrap_or_default();
    let kind = EventKind::from_token(token)?;
    Some(Event { timestamp, kind })
}

/// Lazily turns a stream of log lines into events.
///
/// Lines are pulled one at a time, so `lines` may be backed by a process that
/// is still writing.
pub fn parse_events<I>(lines: I) -> impl Iterator<Item = Event>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Time stamp                Domain              \tMessage                                                                         \tDuration  \tDelay
==========                ======              \t=======                                                                         \t========  \t=====
2024-01-01 08:00:00 +0100 Wake                \tWake from Deep Idle [CDNVA] : due to smc.70070000 lid UserActivity Assertion\t          \t
2024-01-01 08:04:10 +0100 Assertions          \tPID 123(WindowServer) Created UserIsActive\t          \t
2024-01-01 08:05:00 +0100 Sleep               \tEntering Sleep state due to 'Clamshell Sleep':TCPKeepAlive=active Using Batt\tSleep  \t
2024-01-01 08:07:00 +0100 DarkWake            \tDarkWake from Deep Idle [CDN] : due to RTC/Maintenance\t          \t
";

    #[test]
    fn parses_wake_and_sleep_lines() {
        let event =
            parse_line("2024-01-01 08:00:00 +0100 Wake                \tWake from Deep Idle")
                .unwrap();
        assert_eq!(event.kind, EventKind::Wake);
        assert_eq!(event.timestamp.to_rfc3339(), "2024-01-01T08:00:00+01:00");

        let event = parse_line("2024-01-01 08:05:00 -0500 Sleep\tEntering Sleep state").unwrap();
        assert_eq!(event.kind, EventKind::Sleep);
        assert_eq!(event.timestamp.to_rfc3339(), "2024-01-01T08:05:00-05:00");
    }

    #[test]
    fn skips_headers_and_blank_lines() {
        assert!(parse_line("").is_none());
        assert!(parse_line("Time stamp                Domain").is_none());
        assert!(parse_line("==========                ======").is_none());
    }

    #[test]
    fn skips_malformed_timestamps() {
        assert!(parse_line("2024-13-01 08:00:00 +0100 Wake").is_none());
        assert!(parse_line("2024-01-01 08:00:00 XXXXX Wake").is_none());
    }

    #[test]
    fn skips_unrecognized_kinds() {
        assert!(parse_line("2024-01-01 08:07:00 +0100 DarkWake            \tDarkWake").is_none());
        assert!(parse_line("2024-01-01 08:07:00 +0100 Assertions\tPID 1").is_none());
    }

    #[test]
    fn skips_line_with_timestamp_only() {
        assert!(parse_line("2024-01-01 08:07:00 +0100").is_none());
    }

    #[test]
    fn kind_is_read_from_first_field_only() {
        assert!(parse_line("2024-01-01 08:07:00 +0100 Notification\tWake").is_none());
    }

    #[test]
    fn parse_events_keeps_only_sleep_and_wake() {
        let events: Vec<_> = parse_events(SAMPLE.lines()).collect();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Wake, EventKind::Sleep]);
    }

    #[test]
    fn parse_events_accepts_owned_lines() {
        let lines = vec![String::from("2024-01-01 08:00:00 +0100 Wake")];
        assert_eq!(parse_events(lines).count(), 1);
    }

    #[test]
    fn parse_events_empty_input() {
        assert_eq!(parse_events(Vec::<String>::new()).count(), 0);
    }
}
