//! iCalendar reminder feed encoder.
//!
//! # Responsibility
//! - Emit one daily-repeating `VEVENT` per habit that has a reminder.
//!
//! # Invariants
//! - Output is one-way; nothing in core parses this format back.
//! - Event `UID` is the habit id, so re-exports keep event identity.
//! - Every content line ends with CRLF and is folded at 75 octets.

use crate::model::habit::Habit;
use chrono::NaiveDate;

/// MIME type of the calendar feed.
pub const CALENDAR_MIME_TYPE: &str = "text/calendar";
/// Download name of the calendar feed.
pub const CALENDAR_FILE_NAME: &str = "habit-reminders.ics";
/// Default `PRODID` value.
pub const DEFAULT_PROD_ID: &str = "-//Habit Tracker//PWA//EN";
/// Fixed `DESCRIPTION` for every reminder event.
pub const REMINDER_DESCRIPTION: &str = "Habit reminder";

const MAX_LINE_OCTETS: usize = 75;

/// Builds the calendar feed with the default `PRODID`.
pub fn export_calendar(habits: &[Habit], reference_date: NaiveDate) -> String {
    export_calendar_with_prod_id(habits, reference_date, DEFAULT_PROD_ID)
}

/// Builds the calendar feed for habits with a reminder.
///
/// `DTSTAMP` is midnight UTC of `reference_date`; habits without a reminder
/// are skipped.
pub fn export_calendar_with_prod_id(
    habits: &[Habit],
    reference_date: NaiveDate,
    prod_id: &str,
) -> String {
    let stamp = format!("{}T000000Z", reference_date.format("%Y%m%d"));
    let mut feed = FeedWriter::default();

    feed.line("BEGIN", "VCALENDAR");
    feed.line("VERSION", "2.0");
    feed.line("PRODID", &escape_text(prod_id));
    for habit in habits.iter().filter(|habit| habit.has_reminder()) {
        feed.line("BEGIN", "VEVENT");
        feed.line("UID", habit.id.as_str());
        feed.line("DTSTAMP", &stamp);
        feed.line("SUMMARY", &escape_text(&habit.name));
        feed.line("DESCRIPTION", REMINDER_DESCRIPTION);
        feed.line("RRULE", "FREQ=DAILY");
        feed.line("END", "VEVENT");
    }
    feed.line("END", "VCALENDAR");

    feed.finish()
}

#[derive(Default)]
struct FeedWriter {
    out: String,
}

impl FeedWriter {
    fn line(&mut self, name: &str, value: &str) {
        let mut octets = 0;
        for ch in name.chars().chain(std::iter::once(':')).chain(value.chars()) {
            let width = ch.len_utf8();
            if octets + width > MAX_LINE_OCTETS {
                self.out.push_str("\r\n ");
                octets = 1;
            }
            self.out.push(ch);
            octets += width;
        }
        self.out.push_str("\r\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Escapes a TEXT property value (RFC 5545 §3.3.11).
///
/// Control characters TEXT cannot carry are dropped; tab is kept.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\t' => escaped.push('\t'),
            other if other.is_ascii_control() => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_text, FeedWriter};

    #[test]
    fn escape_text_handles_reserved_characters() {
        assert_eq!(escape_text("a,b;c\\d"), "a\\,b\\;c\\\\d");
        assert_eq!(escape_text("one\r\ntwo\nthree"), "one\\ntwo\\nthree");
    }

    #[test]
    fn escape_text_drops_control_characters() {
        assert_eq!(escape_text("a\u{0}b\u{7}c\u{1b}d\u{7f}"), "abcd");
        assert_eq!(escape_text("a\tb"), "a\tb");
    }

    #[test]
    fn long_lines_fold_at_75_octets() {
        let mut feed = FeedWriter::default();
        feed.line("SUMMARY", &"x".repeat(200));
        let out = feed.finish();

        let lines: Vec<&str> = out.trim_end_matches("\r\n").split("\r\n").collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.len() <= 75));
        assert!(lines[1..].iter().all(|line| line.starts_with(' ')));

        let unfolded = out.replace("\r\n ", "");
        assert_eq!(unfolded, format!("SUMMARY:{}\r\n", "x".repeat(200)));
    }

    #[test]
    fn folding_never_splits_multibyte_chars() {
        let mut feed = FeedWriter::default();
        feed.line("SUMMARY", &"é".repeat(60));
        let out = feed.finish();
        assert!(out.split("\r\n").all(|line| line.len() <= 75));
        assert_eq!(out.replace("\r\n ", ""), format!("SUMMARY:{}\r\n", "é".repeat(60)));
    }
}
