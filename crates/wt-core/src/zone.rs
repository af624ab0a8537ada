//! The single reference timezone used to decide "today" and to talk to the
//! time-tracking service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for unparseable timezone settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid timezone {0:?}: expected \"local\", \"UTC\" or an offset like \"+01:00\"")]
pub struct InvalidZone(String);

/// Reference timezone: the machine's local zone or a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ReferenceZone {
    /// Expresses `instant` in this zone.
    pub fn convert<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    /// Calendar date of `now` in this zone.
    pub fn date_of(&self, now: DateTime<Utc>) -> NaiveDate {
        self.convert(&now).date_naive()
    }

    /// Today's date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// Attaches this zone to a wall-clock time on `date`.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant.
    /// Returns `None` for local times skipped by a DST spring-forward.
    pub fn localize(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        let naive = date.and_time(time);
        match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Self::Fixed(offset) => offset.from_local_datetime(&naive).single(),
        }
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for ReferenceZone {
    type Err = InvalidZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::Fixed(Utc.fix()));
        }
        trimmed
            .parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| InvalidZone(s.to_string()))
    }
}

impl Serialize for ReferenceZone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReferenceZone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn parses_supported_forms() {
        assert_eq!("local".parse::<ReferenceZone>(), Ok(ReferenceZone::Local));
        assert_eq!("UTC".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(0))));
        assert_eq!("+01:00".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(1))));
        assert_eq!("+0200".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(2))));
        assert_eq!("-05:00".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(-5))));
        assert_eq!("-0500".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(-5))));
        assert_eq!(" z ".parse::<ReferenceZone>(), Ok(ReferenceZone::Fixed(offset(0))));
        assert_eq!(
            "+05:30".parse::<ReferenceZone>(),
            Ok(ReferenceZone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("Europe/Zurich".parse::<ReferenceZone>().is_err());
        assert!("+1".parse::<ReferenceZone>().is_err());
        assert!("-05".parse::<ReferenceZone>().is_err());
        assert!("01:00".parse::<ReferenceZone>().is_err());
        assert!("+01:75".parse::<ReferenceZone>().is_err());
        assert!("".parse::<ReferenceZone>().is_err());
    }

    #[test]
    fn display_roundtrips() {
        for zone in [ReferenceZone::Local, ReferenceZone::Fixed(offset(1))] {
            assert_eq!(zone.to_string().parse::<ReferenceZone>(), Ok(zone));
        }
    }

    #[test]
    fn date_of_uses_zone_offset() {
        let zone = ReferenceZone::Fixed(offset(1));
        let now = DateTime::parse_from_rfc3339("2024-01-01T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(zone.date_of(now), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn localize_fixed_offset() {
        let zone = ReferenceZone::Fixed(offset(1));
        let dt = zone
            .localize(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T09:15:00+01:00");
    }

    #[test]
    fn convert_moves_instant_into_zone() {
        let zone = ReferenceZone::Fixed(offset(1));
        let dt = DateTime::parse_from_rfc3339("2024-01-01T08:00:00-05:00").unwrap();
        assert_eq!(zone.convert(&dt).to_rfc3339(), "2024-01-01T14:00:00+01:00");
    }
}
