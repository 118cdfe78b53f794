//! Calendar document fetching and parsing.
//!
//! This crate turns a calendar URL into normalized events:
//!
//! - [`IcsSource`] - fetches document text ([`HttpSource`], [`StaticSource`])
//! - [`ics::parse_ics`] - unfolds, scans and normalizes the text
//! - [`RawEvent`] - the per-VEVENT property record between scanning and normalization
//! - [`SourceError`] - what can go wrong while fetching
//!
//! # Architecture
//!
//! ```text
//!   ┌────────────┐  text  ┌──────────┐  lines  ┌──────────┐
//!   │ IcsSource  │ ─────▶ │  unfold  │ ──────▶ │   scan   │
//!   └────────────┘        └──────────┘         └────┬─────┘
//!                                                   │ RawEvent
//!                                                   ▼
//!                                         ┌──────────────────┐
//!                                         │ normalize_event  │
//!                                         └────────┬─────────┘
//!                                                  ▼
//!                                           NormalizedEvent
//! ```
//!
//! # Example
//!
//! ```ignore
//! use icsproxy_source::{HttpSource, HttpSourceConfig, IcsSource, ics::parse_ics};
//!
//! let source = HttpSource::new(HttpSourceConfig::default())?;
//! let body = source.fetch("https://example.com/calendar.ics").await?;
//! let events = parse_ics(&body).events;
//! ```

pub mod error;
pub mod http;
pub mod ics;
pub mod normalize;
pub mod raw_event;
pub mod source;

// Re-export main types at crate root
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use http::{HttpSource, HttpSourceConfig};
pub use ics::{ParseOutcome, ParseStats, parse_events, parse_ics};
pub use normalize::{is_all_day, normalize_event, normalize_events, to_iso};
pub use raw_event::RawEvent;
pub use source::{BoxFuture, IcsSource, StaticResponse, StaticSource};
