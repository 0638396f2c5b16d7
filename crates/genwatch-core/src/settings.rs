//! Load and exercise settings pages.
//!
//! The settings pages are HTML with the current option state baked into
//! inline script calls (`writeSingleOption(...)`, `writeDays(...)`, ...).
//! Each field is pulled out with one narrow pattern and falls back to a fixed
//! default when the pattern is missing. This is deliberately not an HTML parse:
//! the grammar is whatever the firmware's script generator happens to emit.
//!
//! Known fragility: the exercise minute is taken from the *last*
//! `var match = N;` in the page. A firmware that adds another `match`
//! variable after the minute selector will silently shift that reading.

use crate::commands::{DAY_OPTIONS, FREQUENCY_OPTIONS, HOUR_OPTIONS, MINUTE_OPTIONS};
use crate::snapshot::Snapshot;
use regex::Regex;
use std::sync::OnceLock;

/// Load mode page.
pub const LOADS_PATH: &str = "/loads.html";
/// Load connection feed.
pub const LOADS_DATA_PATH: &str = "/loads_data.html";
/// Exercise settings page.
pub const EXERCISE_PATH: &str = "/exercise.html";

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern compiles"))
}

fn load_mode_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(
        &CELL,
        r#"writeSingleOption\(\s*1,\s*!\((\d+)\s*&\s*0x01\),\s*"Manual"\s*\)"#,
    )
}

fn frequency_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(
        &CELL,
        r#"(?s)var match = (\d+);.*?writeSingleOption\(0,match == 0, "Never"\)"#,
    )
}

fn day_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, r"writeDays\((\d+)\)")
}

fn hour_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, r"hrs24ToHrs12\((\d+)\)")
}

fn match_var_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    pattern(&CELL, r"var match = (\d+);")
}

/// First capture group of the first match.
fn capture<'h>(re: &Regex, haystack: &'h str) -> Option<&'h str> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn option_at(options: &'static [&'static str], digits: Option<&str>) -> Option<&'static str> {
    digits
        .and_then(|d| d.parse::<usize>().ok())
        .and_then(|i| options.get(i).copied())
}

/// Parse the load mode page.
#[must_use]
pub fn parse_loads_page(html: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert("load_mode", load_mode(html));
    snapshot
}

/// Load management mode. The option is `Manual` iff bit 0 of the call argument is clear.
#[must_use]
pub fn load_mode(html: &str) -> &'static str {
    match capture(load_mode_pattern(), html) {
        Some(digits) if !digits.bytes().all(|b| b == b'0') => "Automatic",
        _ => "Manual",
    }
}

/// Parse the two-line load connection feed.
///
/// Lines 1 and 2 carry load 1 and load 2: `0` is connected, anything else
/// disconnected. A short or garbled feed leaves the affected loads out.
#[must_use]
pub fn parse_loads_data(text: &str) -> Snapshot {
    let lines: Vec<&str> = text.trim().split('\n').map(str::trim).collect();
    let mut snapshot = Snapshot::new();
    if lines.len() < 3 {
        tracing::debug!(lines = lines.len(), "Load feed too short, ignoring");
        return snapshot;
    }

    for (key, line) in [("load_1", lines[1]), ("load_2", lines[2])] {
        match line.parse::<i64>() {
            Ok(0) => snapshot.insert(key, "Connected"),
            Ok(_) => snapshot.insert(key, "Disconnected"),
            Err(_) => tracing::debug!(key, line, "Unreadable load state"),
        }
    }
    snapshot
}

/// Parse the exercise settings page.
#[must_use]
pub fn parse_exercise_page(html: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert("exercise_frequency", exercise_frequency(html));
    snapshot.insert("exercise_day", exercise_day(html));
    snapshot.insert("exercise_hour", exercise_hour(html));
    snapshot.insert("exercise_minute", exercise_minute(html));
    snapshot
}

/// Exercise frequency from the `match` variable ahead of the frequency selector.
#[must_use]
pub fn exercise_frequency(html: &str) -> &'static str {
    option_at(FREQUENCY_OPTIONS, capture(frequency_pattern(), html)).unwrap_or("Never")
}

/// Exercise day from the `writeDays(N)` call.
#[must_use]
pub fn exercise_day(html: &str) -> &'static str {
    option_at(DAY_OPTIONS, capture(day_pattern(), html)).unwrap_or("Sunday")
}

/// Exercise hour (24-hour) from the `hrs24ToHrs12(N)` call.
#[must_use]
pub fn exercise_hour(html: &str) -> &'static str {
    option_at(HOUR_OPTIONS, capture(hour_pattern(), html)).unwrap_or("0")
}

/// Exercise minute from the last `var match = N;` in the page.
///
/// `N` is read as an index into `00/15/30/45`; a literal `15`, `30` or `45`
/// is accepted as well.
#[must_use]
pub fn exercise_minute(html: &str) -> &'static str {
    let last = match_var_pattern()
        .captures_iter(html)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    option_at(MINUTE_OPTIONS, last)
        .or_else(|| last.and_then(|l| MINUTE_OPTIONS.iter().copied().find(|m| *m == l)))
        .unwrap_or("00")
}
