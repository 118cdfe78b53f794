//! VEVENT block scanning.
//!
//! The scanner is a two-state machine folded over the unfolded lines:
//!
//! ```text
//!            BEGIN:VEVENT                 BEGIN:VEVENT (drops open record)
//!   ┌──────┐ ───────────▶ ┌─────────┐ ◀──┐
//!   │ Idle │              │ InEvent │ ───┘
//!   └──────┘ ◀─────────── └─────────┘
//!              END:VEVENT (emits record)
//! ```
//!
//! Property lines are only recorded in `InEvent`; everything seen while
//! `Idle` (calendar headers, VTIMEZONE, stray END markers) is skipped.

use serde::Serialize;
use tracing::trace;

use crate::raw_event::RawEvent;

pub const BEGIN_EVENT: &str = "BEGIN:VEVENT";
pub const END_EVENT: &str = "END:VEVENT";

/// Counters describing what the scanner skipped or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Blocks that reached `END:VEVENT`.
    pub events: usize,
    /// Unfinished blocks dropped by a nested `BEGIN:VEVENT`.
    pub discarded_blocks: usize,
    /// Open block left at end of input.
    pub unterminated_blocks: usize,
    /// `END:VEVENT` seen with no open block.
    pub stray_end_markers: usize,
    /// Lines inside a block that had no colon.
    pub lines_without_colon: usize,
}

#[derive(Debug)]
enum ScanState {
    Idle,
    InEvent(RawEvent),
}

#[derive(Debug)]
struct Scanner {
    state: ScanState,
    events: Vec<RawEvent>,
    stats: ScanStats,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: ScanState::Idle,
            events: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    fn step(mut self, line: &str) -> Self {
        self.state = match (self.state, line) {
            (ScanState::InEvent(_), BEGIN_EVENT) => {
                trace!("nested BEGIN:VEVENT, dropping unfinished block");
                self.stats.discarded_blocks += 1;
                ScanState::InEvent(RawEvent::new())
            }
            (ScanState::Idle, BEGIN_EVENT) => ScanState::InEvent(RawEvent::new()),
            (ScanState::InEvent(raw), END_EVENT) => {
                self.stats.events += 1;
                self.events.push(raw);
                ScanState::Idle
            }
            (ScanState::Idle, END_EVENT) => {
                self.stats.stray_end_markers += 1;
                ScanState::Idle
            }
            (ScanState::InEvent(mut raw), line) => {
                match parse_property_line(line) {
                    Some((key, value)) => {
                        raw.insert(key, value);
                    }
                    None => self.stats.lines_without_colon += 1,
                }
                ScanState::InEvent(raw)
            }
            (ScanState::Idle, _) => ScanState::Idle,
        };
        self
    }

    fn finish(mut self) -> (Vec<RawEvent>, ScanStats) {
        if let ScanState::InEvent(_) = self.state {
            self.stats.unterminated_blocks += 1;
        }
        (self.events, self.stats)
    }
}

/// Splits a content line into its bare uppercased key and its value.
///
/// The key ends at the first colon; parameters after a `;` in the key
/// segment are dropped. Later colons belong to the value. Returns `None` when
/// the line has no colon.
pub fn parse_property_line(line: &str) -> Option<(String, &str)> {
    let (key_segment, value) = line.split_once(':')?;
    let key = key_segment
        .split_once(';')
        .map_or(key_segment, |(key, _params)| key);
    Some((key.to_uppercase(), value))
}

/// Collects VEVENT property records from unfolded lines, in document order.
pub fn scan<I, S>(lines: I) -> (Vec<RawEvent>, ScanStats)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .fold(Scanner::new(), |scanner, line| scanner.step(line.as_ref()))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(events: &[RawEvent]) -> Vec<Option<&str>> {
        events.iter().map(RawEvent::summary).collect()
    }

    #[test]
    fn property_line_strips_parameters() {
        assert_eq!(
            parse_property_line("DTSTART;TZID=Asia/Seoul:20240315T090000"),
            Some(("DTSTART".to_string(), "20240315T090000"))
        );
    }

    #[test]
    fn property_line_keeps_colons_in_value() {
        assert_eq!(
            parse_property_line("URL:https://example.com:8443/a"),
            Some(("URL".to_string(), "https://example.com:8443/a"))
        );
    }

    #[test]
    fn property_line_uppercases_key() {
        assert_eq!(
            parse_property_line("summary;LANGUAGE=ko:회의"),
            Some(("SUMMARY".to_string(), "회의"))
        );
    }

    #[test]
    fn property_line_without_colon() {
        assert_eq!(parse_property_line("SUMMARY"), None);
    }

    #[test]
    fn collects_blocks_in_order() {
        let lines = [
            "BEGIN:VCALENDAR",
            "BEGIN:VEVENT",
            "SUMMARY:one",
            "END:VEVENT",
            "BEGIN:VEVENT",
            "SUMMARY:two",
            "END:VEVENT",
            "END:VCALENDAR",
        ];
        let (events, stats) = scan(lines);
        assert_eq!(summaries(&events), [Some("one"), Some("two")]);
        assert_eq!(stats.events, 2);
    }

    #[test]
    fn ignores_lines_outside_blocks() {
        let (events, _) = scan(["SUMMARY:calendar name", "BEGIN:VEVENT", "END:VEVENT"]);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_empty());
    }

    #[test]
    fn duplicate_property_keeps_later_value() {
        let (events, _) = scan([
            "BEGIN:VEVENT",
            "SUMMARY:first",
            "SUMMARY;LANGUAGE=en:second",
            "END:VEVENT",
        ]);
        assert_eq!(summaries(&events), [Some("second")]);
    }

    #[test]
    fn stray_end_emits_nothing() {
        let (events, stats) = scan(["END:VEVENT", "SUMMARY:x"]);
        assert!(events.is_empty());
        assert_eq!(stats.stray_end_markers, 1);
    }

    #[test]
    fn nested_begin_discards_unfinished_block() {
        let (events, stats) = scan([
            "BEGIN:VEVENT",
            "SUMMARY:lost",
            "BEGIN:VEVENT",
            "DTSTART:20240315",
            "END:VEVENT",
        ]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary(), None);
        assert_eq!(events[0].dtstart(), Some("20240315"));
        assert_eq!(stats.discarded_blocks, 1);
    }

    #[test]
    fn unterminated_block_is_dropped() {
        let (events, stats) = scan(["BEGIN:VEVENT", "SUMMARY:open"]);
        assert!(events.is_empty());
        assert_eq!(stats.unterminated_blocks, 1);
    }

    #[test]
    fn markers_must_match_exactly() {
        let (events, stats) = scan(["begin:vevent", "BEGIN:VEVENT ", "SUMMARY:x", "END:VEVENT"]);
        assert!(events.is_empty());
        assert_eq!(stats.stray_end_markers, 1);
    }

    #[test]
    fn lines_without_colon_are_counted_and_skipped() {
        let (events, stats) = scan(["BEGIN:VEVENT", "garbage", "SUMMARY:ok", "END:VEVENT"]);
        assert_eq!(summaries(&events), [Some("ok")]);
        assert_eq!(events[0].len(), 1);
        assert_eq!(stats.lines_without_colon, 1);
    }
}
