//! Numeric-line status feed (`/index_data.html`).
//!
//! The controller answers with one decimal value per line. Fields are
//! addressed by fixed 0-based line index:
//!
//! | Line | Field |
//! |------|-------|
//! | 3 | battery voltage ×10 |
//! | 4 | state code |
//! | 5, 6 | load percentages |
//! | 7 | output voltage |
//! | 8 | frequency |
//! | 9 | engine run counter (minutes) |
//! | 13 | `lcd_status` bit-flag register |
//! | 14 | fault sub-code (state 6 only) |

use crate::snapshot::Snapshot;

/// Minimum number of lines for a usable feed.
pub const MIN_STATUS_LINES: usize = 18;

const LINE_BATTERY: usize = 3;
const LINE_STATE: usize = 4;
const LINE_LOAD_1: usize = 5;
const LINE_LOAD_2: usize = 6;
const LINE_OUTPUT_VOLTAGE: usize = 7;
const LINE_FREQUENCY: usize = 8;
const LINE_ENGINE_COUNTER: usize = 9;
const LINE_LCD_STATUS: usize = 13;
const LINE_FAULT: usize = 14;

/// Parse the status feed into a snapshot.
///
/// A feed shorter than [`MIN_STATUS_LINES`] yields an empty snapshot.
///
/// # Errors
///
/// Returns [`ParseError::MalformedLine`] if a consumed line is not numeric.
pub fn parse_status(text: &str) -> Result<Snapshot, ParseError> {
    let lines: Vec<&str> = text.trim().split('\n').map(str::trim).collect();
    if lines.len() < MIN_STATUS_LINES {
        tracing::debug!(lines = lines.len(), "Status feed too short, ignoring");
        return Ok(Snapshot::new());
    }

    let state = integer_at(&lines, LINE_STATE)?;
    let label = state_label(state, lines[LINE_STATE], lines[LINE_FAULT]);

    let mut snapshot = Snapshot::new();
    snapshot.insert("status", label);
    snapshot.insert("battery_voltage", battery_voltage(number_at(&lines, LINE_BATTERY)?));
    snapshot.insert("output_voltage", integer_at(&lines, LINE_OUTPUT_VOLTAGE)?);
    snapshot.insert("frequency", integer_at(&lines, LINE_FREQUENCY)?);
    snapshot.insert("engine_hours", engine_hours(integer_at(&lines, LINE_ENGINE_COUNTER)?));
    snapshot.insert("load_1", integer_at(&lines, LINE_LOAD_1)?);
    snapshot.insert("load_2", integer_at(&lines, LINE_LOAD_2)?);
    snapshot.insert("lcd_status", integer_at(&lines, LINE_LCD_STATUS)?);

    Ok(snapshot)
}

/// Map a controller state code to its display label.
///
/// `raw_code` is the code as it appeared on the wire and `fault` is the raw
/// fault sub-code line; both are only used to build the fault and unknown labels.
#[must_use]
pub fn state_label(code: i64, raw_code: &str, fault: &str) -> String {
    let label = match code {
        0 | 1 => "Stopped",
        2 | 3 => "Starting",
        4 => "Running",
        5 => "Priming",
        6 => return format!("Fault {fault}"),
        7 => "Eng.Only",
        8 => "TestMode",
        9 => "Volt Adj",
        20 => "Config Mode",
        21 => "Cycle crank pause",
        22 => "Exercising",
        23 => "Engine Cooldown",
        _ => return format!("Unknown {raw_code}"),
    };
    label.to_string()
}

/// Battery voltage is reported in tenths of a volt.
#[must_use]
pub fn battery_voltage(raw: f64) -> f64 {
    raw / 10.0
}

/// Convert the engine run counter (minutes) to hours with one decimal digit.
///
/// `counter / 6` is rounded half-to-even to an integer number of tenths.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engine_hours(counter: i64) -> f64 {
    let mut tenths = counter.div_euclid(6);
    let rem = counter.rem_euclid(6);
    if rem > 3 || (rem == 3 && tenths % 2 != 0) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

fn integer_at(lines: &[&str], index: usize) -> Result<i64, ParseError> {
    lines[index]
        .parse()
        .map_err(|_| ParseError::MalformedLine {
            line: index,
            value: lines[index].to_string(),
        })
}

fn number_at(lines: &[&str], index: usize) -> Result<f64, ParseError> {
    lines[index]
        .parse()
        .map_err(|_| ParseError::MalformedLine {
            line: index,
            value: lines[index].to_string(),
        })
}

/// Errors that can occur while decoding a numeric feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A line at a fixed index did not hold a number
    #[error("line {line} is not numeric: {value:?}")]
    MalformedLine {
        /// 0-based line index
        line: usize,
        /// Offending text
        value: String,
    },
}
