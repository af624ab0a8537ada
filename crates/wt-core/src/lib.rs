//! Core pipeline for the wake-time tracker.
//!
//! This crate turns a machine power log into awake time:
//! - Parsing: log lines into sleep/wake events
//! - Reconstruction: wake/sleep pairs into intervals
//! - Noise filtering: dropping short wakes, bridging short sleeps
//! - Grouping: intervals per calendar day
//! - Reconciliation: skipping intervals already recorded remotely

pub mod event;
pub mod filter;
pub mod group;
pub mod interval;
pub mod parse;
pub mod pipeline;
pub mod reconcile;
pub mod reconstruct;
pub mod sync;
pub mod zone;

pub use event::{Event, EventKind, UnknownEventKind};
pub use filter::{NoiseFilterConfig, filter_noise};
pub use group::{DailyGroup, group_by_date};
pub use interval::{Interval, ValidationError};
pub use pipeline::{awake_intervals, daily_awake_intervals, raw_awake_intervals};
pub use reconcile::{overlaps_any, retain_new};
pub use sync::{DaySync, SyncError, SyncReport, TrackingService, sync_days};
pub use zone::{InvalidZone, ReferenceZone};
