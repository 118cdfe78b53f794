//! Event types for the proxy output.
//!
//! This module provides the JSON-facing event shape:
//! - [`NormalizedEvent`]: one calendar event in a Google-Calendar-like layout
//! - [`EventDate`]: the `start`/`end` value, either a calendar date or a timestamp
//!
//! The serialized form is the wire contract of the HTTP endpoint:
//!
//! ```json
//! {
//!   "summary": "Team sync",
//!   "location": "",
//!   "description": "",
//!   "htmlLink": "",
//!   "start": { "dateTime": "2024-03-15T09:00:00.000Z" },
//!   "end": { "dateTime": "2024-03-15T10:00:00.000Z" }
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an event carries no `SUMMARY`.
pub const UNTITLED_SUMMARY: &str = "(제목 없음)";

/// The start or end of a normalized event.
///
/// All-day events carry a `YYYY-MM-DD` date, timed events a full UTC timestamp.
/// The inner value is `None` when the source document had no usable value, and
/// serializes as JSON `null` rather than a guessed default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventDate {
    /// A calendar date (`{"date": "2024-03-15"}`).
    Date(Option<String>),
    /// A UTC timestamp (`{"dateTime": "2024-03-15T09:00:00.000Z"}`).
    DateTime(Option<String>),
}

impl EventDate {
    /// Creates an all-day value.
    pub fn date(value: Option<impl Into<String>>) -> Self {
        Self::Date(value.map(Into::into))
    }

    /// Creates a timed value.
    pub fn date_time(value: Option<impl Into<String>>) -> Self {
        Self::DateTime(value.map(Into::into))
    }

    /// Returns `true` for the date-only variant.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the raw string value, whichever variant holds it.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Date(v) | Self::DateTime(v) => v.as_deref(),
        }
    }

    /// Resolves this value to a single instant.
    ///
    /// Dates resolve to midnight UTC. Returns `None` for a missing or
    /// unparsable value.
    pub fn to_utc_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(Some(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Date(Some(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
            Self::Date(None) | Self::DateTime(None) => None,
        }
    }
}

/// A calendar event in the shape returned by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// Event title, [`UNTITLED_SUMMARY`] when the source had none.
    pub summary: String,
    /// Event location, empty when absent.
    pub location: String,
    /// Event description, empty when absent. Escapes are not decoded.
    pub description: String,
    /// The source `URL` property, empty when absent.
    pub html_link: String,
    /// When the event starts.
    pub start: EventDate,
    /// When the event ends. Always the same variant as `start`.
    pub end: EventDate,
}

impl NormalizedEvent {
    /// Creates an event with the given times and default text fields.
    pub fn new(start: EventDate, end: EventDate) -> Self {
        Self {
            summary: UNTITLED_SUMMARY.to_string(),
            location: String::new(),
            description: String::new(),
            html_link: String::new(),
            start,
            end,
        }
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the link.
    pub fn with_html_link(mut self, html_link: impl Into<String>) -> Self {
        self.html_link = html_link.into();
        self
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// The instant used for filtering and sorting.
    pub fn effective_start(&self) -> Option<DateTime<Utc>> {
        self.start.to_utc_datetime()
    }
}
