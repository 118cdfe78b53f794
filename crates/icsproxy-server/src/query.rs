//! Query parameters of the events endpoint.

use icsproxy_core::TimeWindow;

/// Query string of `GET /api/events`.
///
/// Every field is kept as raw text: unusable values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsQuery {
    /// Calendar URL to fetch.
    pub ics: Option<String>,
    /// Inclusive lower bound on event start.
    pub time_min: Option<String>,
    /// Inclusive upper bound on event start.
    pub time_max: Option<String>,
    /// Result cap.
    pub max_results: Option<String>,
}

impl EventsQuery {
    /// Builds the query from decoded key/value pairs.
    ///
    /// The first occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "ics" => &mut query.ics,
                "timeMin" => &mut query.time_min,
                "timeMax" => &mut query.time_max,
                "maxResults" => &mut query.max_results,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Parses a raw (still percent-encoded) query string.
    pub fn from_query_string(raw: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw.as_bytes()))
    }

    /// The requested calendar URL, ignoring blank values.
    pub fn ics_url(&self) -> Option<&str> {
        self.ics.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// The requested time window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_params(self.time_min.as_deref(), self.time_max.as_deref())
    }

    /// The requested cap, or `default` when absent or unusable.
    pub fn max_results_or(&self, default: usize) -> usize {
        parse_max_results(self.max_results.as_deref(), default)
    }
}

/// Parses a result cap from the leading digits of `raw`.
///
/// `"5abc"` reads as 5 and `"2.5"` as 2. Values without leading digits,
/// negative values and zero give `default`. A digit run too large for
/// `usize` means no cap.
pub fn parse_max_results(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(leading_integer)
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn leading_integer(value: &str) -> Option<usize> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let digits = value.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(value[..digits].parse::<usize>().unwrap_or(usize::MAX))
}
