//! Core types: normalized events, time windows, tracing

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{EventDate, NormalizedEvent, UNTITLED_SUMMARY};
pub use time::{TimeWindow, compare_effective_start, parse_bound, select_events};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
