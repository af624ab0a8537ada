//! Power-state events read from the system power log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

/// A timestamped power-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// When the transition happened, in the offset the log recorded.
    pub timestamp: DateTime<FixedOffset>,
    /// Which way the machine went.
    pub kind: EventKind,
}

/// The power-state transitions the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Sleep,
    Wake,
}

impl EventKind {
    /// Canonical lowercase token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Wake => "wake",
        }
    }

    /// Maps a log token to a kind, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not exactly `sleep` or `wake`
    /// (e.g. `DarkWake`).
    pub fn from_token(token: &str) -> Option<Self> {
        token.trim().to_lowercase().parse().ok()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(Self::Sleep),
            "wake" => Ok(Self::Wake),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

/// Error type for unrecognized event kind tokens.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}
