//! Parse command: runs a local calendar file through the same pipeline as
//! the events endpoint and prints the response body.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use icsproxy_core::{NormalizedEvent, select_events};
use icsproxy_source::ParseStats;
use icsproxy_source::ics::parse_ics;
use serde::Serialize;

use crate::query::EventsQuery;

/// Options for [`render`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub max_results: Option<String>,
    pub stats: bool,
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct ParseOutput {
    items: Vec<NormalizedEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ParseStats>,
}

/// Reads `input` (`-` for stdin) and prints the JSON response to stdout.
pub fn run(input: &Path, options: &ParseOptions, default_max_results: usize) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let rendered = render(&text, options, default_max_results)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("failed to write output")?;
    Ok(())
}

/// Parses `text` and renders the selected events as JSON.
pub fn render(
    text: &str,
    options: &ParseOptions,
    default_max_results: usize,
) -> anyhow::Result<String> {
    let query = EventsQuery {
        ics: None,
        time_min: options.time_min.clone(),
        time_max: options.time_max.clone(),
        max_results: options.max_results.clone(),
    };

    let outcome = parse_ics(text);
    let items = select_events(
        outcome.events,
        &query.window(),
        query.max_results_or(default_max_results),
    );
    let output = ParseOutput {
        items,
        stats: options.stats.then_some(outcome.stats),
    };

    let json = if options.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    json.context("failed to serialize events")
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))
    }
}
