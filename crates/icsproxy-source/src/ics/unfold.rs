//! Line splitting and unfolding.
//!
//! iCalendar lets a logical line wrap across physical lines; each
//! continuation starts with one space or tab. Unfolding removes that single
//! character and appends the rest to the line before it.

/// Splits text into physical lines on CRLF or bare LF.
///
/// A trailing `\r` is stripped from each line so both terminators yield the
/// same sequence. A `\r` anywhere else is kept.
pub fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Returns `true` if the line continues the previous one.
fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Splits and unfolds `text` into logical lines.
///
/// The first line is never treated as a continuation. Runs of continuation
/// lines all join the same logical line. No line after the first in the
/// returned sequence starts with a space or tab.
pub fn unfold(text: &str) -> Vec<String> {
    physical_lines(text).fold(Vec::new(), |mut lines: Vec<String>, line| {
        match lines.last_mut() {
            Some(previous) if is_continuation(line) => previous.push_str(&line[1..]),
            _ => lines.push(line.to_string()),
        }
        lines
    })
}
