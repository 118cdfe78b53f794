//! ICS/iCalendar parsing.
//!
//! A deliberately small subset of RFC 5545: unfold lines, collect the
//! properties of each VEVENT, normalize them. Recurrence rules, VTIMEZONE
//! resolution, multi-valued properties and text unescaping are not handled.
//!
//! Parsing never fails. Malformed input yields fewer events or events with
//! empty/null fields, and [`ParseStats`] records what was skipped.
//!
//! ```
//! use icsproxy_source::ics::parse_ics;
//!
//! let outcome = parse_ics("BEGIN:VEVENT\r\nSUMMARY:Lunch\r\nDTSTART:20240315\r\nEND:VEVENT\r\n");
//! assert_eq!(outcome.events.len(), 1);
//! assert_eq!(outcome.events[0].summary, "Lunch");
//! ```

pub mod scan;
pub mod unfold;

use icsproxy_core::NormalizedEvent;
use serde::Serialize;
use tracing::debug;

use crate::normalize::normalize_events;

pub use scan::{ScanStats, parse_property_line, scan};
pub use unfold::{physical_lines, unfold};

/// Counters collected over one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines before unfolding.
    pub physical_lines: usize,
    /// Lines after unfolding.
    pub logical_lines: usize,
    /// Block-level counters from the scanner.
    #[serde(flatten)]
    pub scan: ScanStats,
    /// Events whose start or end came out null.
    pub events_missing_dates: usize,
}

/// The events of a document plus what was degraded along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Normalized events in document order.
    pub events: Vec<NormalizedEvent>,
    pub stats: ParseStats,
}

/// Parses ICS text into normalized events.
pub fn parse_ics(text: &str) -> ParseOutcome {
    let lines = unfold(text);
    let (raw_events, scan_stats) = scan(&lines);
    let events = normalize_events(&raw_events);

    let stats = ParseStats {
        physical_lines: physical_lines(text).count(),
        logical_lines: lines.len(),
        scan: scan_stats,
        events_missing_dates: events
            .iter()
            .filter(|e| e.start.value().is_none() || e.end.value().is_none())
            .count(),
    };

    debug!(
        events = events.len(),
        physical_lines = stats.physical_lines,
        logical_lines = stats.logical_lines,
        discarded_blocks = stats.scan.discarded_blocks,
        unterminated_blocks = stats.scan.unterminated_blocks,
        missing_dates = stats.events_missing_dates,
        "Parsed ICS document"
    );

    ParseOutcome { events, stats }
}

/// Parses ICS text, discarding the statistics.
pub fn parse_events(text: &str) -> Vec<NormalizedEvent> {
    parse_ics(text).events
}
