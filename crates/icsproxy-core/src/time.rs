//! Time window filtering and ordering for normalized events.
//!
//! This module provides [`TimeWindow`], an optionally bounded inclusive range
//! built from the `timeMin`/`timeMax` query parameters, and [`select_events`],
//! which applies the window, orders by effective start and caps the result.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::NormalizedEvent;

/// An inclusive `[min, max]` range in UTC where either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Lower bound (inclusive).
    pub min: Option<DateTime<Utc>>,
    /// Upper bound (inclusive).
    pub max: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Creates a window from already-parsed bounds.
    pub fn new(min: Option<DateTime<Utc>>, max: Option<DateTime<Utc>>) -> Self {
        Self { min, max }
    }

    /// Creates a window from raw query strings.
    ///
    /// A bound that is absent or does not parse is left open.
    pub fn from_params(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_bound),
            max: max.and_then(parse_bound),
        }
    }

    /// Returns `true` when neither side is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks if a datetime falls within this window, boundaries included.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.min.is_none_or(|min| dt >= min) && self.max.is_none_or(|max| dt <= max)
    }

    /// Checks if an event's effective start falls within this window.
    ///
    /// Events without an effective start only pass an unbounded window.
    pub fn contains_event(&self, event: &NormalizedEvent) -> bool {
        match event.effective_start() {
            Some(dt) => self.contains(dt),
            None => self.is_unbounded(),
        }
    }
}

/// Parses a `timeMin`/`timeMax` value.
///
/// Accepts RFC 3339 (`2024-03-15T09:00:00+02:00`), a bare date (`2024-03-15`,
/// midnight UTC) and a naive datetime with optional fraction (treated as UTC).
pub fn parse_bound(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Orders two events by effective start, undated events last.
pub fn compare_effective_start(a: &NormalizedEvent, b: &NormalizedEvent) -> Ordering {
    match (a.effective_start(), b.effective_start()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters by window, sorts ascending by effective start and keeps at most
/// `max_results` events.
///
/// The sort is stable, so events sharing a start keep document order.
pub fn select_events(
    events: Vec<NormalizedEvent>,
    window: &TimeWindow,
    max_results: usize,
) -> Vec<NormalizedEvent> {
    let mut selected: Vec<NormalizedEvent> = events
        .into_iter()
        .filter(|event| window.contains_event(event))
        .collect();
    selected.sort_by(compare_effective_start);
    selected.truncate(max_results);
    selected
}
