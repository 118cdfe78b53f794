//! Raw VEVENT property record.
//!
//! A [`RawEvent`] holds the properties captured between `BEGIN:VEVENT` and
//! `END:VEVENT`, keyed by uppercased property name with parameters stripped.
//! It is converted to a [`NormalizedEvent`](icsproxy_core::NormalizedEvent) by
//! [`normalize_event`](crate::normalize::normalize_event).

use std::collections::HashMap;

/// Property names read during normalization.
pub mod keys {
    pub const SUMMARY: &str = "SUMMARY";
    pub const LOCATION: &str = "LOCATION";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const URL: &str = "URL";
    pub const DTSTART: &str = "DTSTART";
    pub const DTEND: &str = "DTEND";
}

/// The properties of one VEVENT block.
///
/// Each key holds a single value; inserting an existing key replaces the
/// earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    properties: HashMap<String, String>,
}

impl RawEvent {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(key.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up a property by its uppercased name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        self.get(keys::SUMMARY)
    }

    pub fn location(&self) -> Option<&str> {
        self.get(keys::LOCATION)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(keys::DESCRIPTION)
    }

    pub fn url(&self) -> Option<&str> {
        self.get(keys::URL)
    }

    /// The raw `DTSTART` value, parameters already stripped from the key.
    pub fn dtstart(&self) -> Option<&str> {
        self.get(keys::DTSTART)
    }

    /// The raw `DTEND` value.
    pub fn dtend(&self) -> Option<&str> {
        self.get(keys::DTEND)
    }

    /// Number of distinct properties captured.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
