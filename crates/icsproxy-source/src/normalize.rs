//! RawEvent to NormalizedEvent conversion.
//!
//! The normalization process:
//! 1. Converts `DTSTART`/`DTEND` to UTC timestamps with [`to_iso`]
//! 2. Classifies the event as all-day or timed from the raw `DTSTART`
//! 3. Fills text fields, substituting defaults for missing properties
//!
//! Timezone parameters are never resolved: `DTSTART;TZID=Asia/Seoul:20240315T090000`
//! is read as `2024-03-15T09:00:00Z`.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use icsproxy_core::{EventDate, NormalizedEvent, UNTITLED_SUMMARY};
use regex::Regex;

use crate::raw_event::RawEvent;

/// Matches a pure `YYYYMMDD` date value.
static DATE_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("Invalid date-only regex"));

/// Basic-format layouts tried for timed values, after the UTC marker is removed.
const BASIC_DATETIME_FORMATS: [&str; 2] = ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"];

/// Length of the `YYYY-MM-DD` prefix of an ISO timestamp.
const DATE_PREFIX_LEN: usize = 10;

/// Returns true if the value is a date with no time component.
pub fn is_date_only(value: &str) -> bool {
    DATE_ONLY_REGEX.is_match(value)
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses a timed value that already ends in the UTC marker.
fn parse_utc_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let bare = value.trim_end_matches(['Z', 'z']);

    BASIC_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(bare, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(bare, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Converts a raw `DTSTART`/`DTEND` value to a normalized UTC timestamp.
///
/// - `None` stays `None`.
/// - `YYYYMMDD` becomes midnight UTC of that date.
/// - Anything else gets a `Z` appended if it lacks one and is parsed as UTC,
///   whatever `TZID` the property carried.
///
/// Returns `None` for values that do not parse rather than guessing.
pub fn to_iso(raw: Option<&str>) -> Option<String> {
    let value = raw?;

    if is_date_only(value) {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return date.and_hms_opt(0, 0, 0).map(|naive| format_utc(naive.and_utc()));
    }

    let marked = if value.ends_with(['Z', 'z']) {
        value.to_string()
    } else {
        format!("{value}Z")
    };
    parse_utc_timestamp(&marked).map(format_utc)
}

/// Returns true if the event has no `DTSTART` or a date-only one.
pub fn is_all_day(raw: &RawEvent) -> bool {
    raw.dtstart().is_none_or(is_date_only)
}

/// Converts a [`RawEvent`] to a [`NormalizedEvent`].
///
/// `end` falls back to the converted start when `DTEND` is missing or does
/// not parse. Both sides use the date variant for all-day events and the
/// timestamp variant otherwise. End-before-start is passed through.
pub fn normalize_event(raw: &RawEvent) -> NormalizedEvent {
    let start = to_iso(raw.dtstart());
    let end = to_iso(raw.dtend()).or_else(|| start.clone());

    let (start, end) = if is_all_day(raw) {
        (
            EventDate::Date(start.map(date_prefix)),
            EventDate::Date(end.map(date_prefix)),
        )
    } else {
        (EventDate::DateTime(start), EventDate::DateTime(end))
    };

    NormalizedEvent::new(start, end)
        .with_summary(raw.summary().unwrap_or(UNTITLED_SUMMARY))
        .with_location(raw.location().unwrap_or_default())
        .with_description(raw.description().unwrap_or_default())
        .with_html_link(raw.url().unwrap_or_default())
}

/// Keeps the `YYYY-MM-DD` part of a timestamp.
fn date_prefix(iso: String) -> String {
    iso.chars().take(DATE_PREFIX_LEN).collect()
}

/// Batch normalize multiple raw events, preserving order.
pub fn normalize_events(raw_events: &[RawEvent]) -> Vec<NormalizedEvent> {
    raw_events.iter().map(normalize_event).collect()
}
