//! Time codec: parsing, formatting, validation and normalization of swim
//! time text.
//!
//! All arithmetic in the crate happens in hundredths of a second; this
//! module is the only place that touches the textual forms. Accepted input
//! shapes (comma accepted as decimal separator): `hh:mm:ss.cc`, `mm:ss.cc`,
//! `mm:ss` (implicit `.00`) and bare `ss.cc` with up to three integer
//! digits. Canonical output is always `mm:ss.cc`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text matches none of the accepted time shapes.
    #[error("unrecognized time format {0:?}")]
    UnrecognizedFormat(String),
}

/// A swim time in hundredths of a second.
///
/// Parsing only ever produces non-negative values; the signed
/// representation exists because long-to-short conversion subtracts a fixed
/// offset with no floor, so a converted value can go negative for very
/// short recorded times (a data-quality signal, not an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeValue(i64);

impl TimeValue {
    pub const fn from_hundredths(hundredths: i64) -> Self {
        TimeValue(hundredths)
    }

    pub const fn hundredths(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format(*self))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn digits_exactly(s: &str, n: usize) -> bool {
    s.len() == n && is_digits(s)
}

/// Seconds field of a colon form: `ss` or `ss.cc`, two digits each.
fn seconds_field(s: &str) -> Option<i64> {
    match s.split_once('.') {
        Some((sec, frac)) if digits_exactly(sec, 2) && digits_exactly(frac, 2) => {
            Some(sec.parse::<i64>().ok()? * 100 + frac.parse::<i64>().ok()?)
        }
        None if digits_exactly(s, 2) => Some(s.parse::<i64>().ok()? * 100),
        _ => None,
    }
}

/// Bare-seconds form: 1-3 integer digits, mandatory two-digit hundredths.
fn bare_seconds(s: &str) -> Option<i64> {
    let (sec, frac) = s.split_once('.')?;
    if !is_digits(sec) || sec.len() > 3 || !digits_exactly(frac, 2) {
        return None;
    }
    Some(sec.parse::<i64>().ok()? * 100 + frac.parse::<i64>().ok()?)
}

fn shape_value(cleaned: &str) -> Option<i64> {
    let parts: Vec<&str> = cleaned.split(':').collect();
    match parts.as_slice() {
        [seconds] => bare_seconds(seconds),
        [minutes, seconds] => {
            // Minutes may exceed two digits: format() never truncates the
            // minutes field, and every formatted value must re-parse.
            // Checked arithmetic: a huge minutes field is a failed shape,
            // not a panic.
            if !is_digits(minutes) {
                return None;
            }
            let m: i64 = minutes.parse().ok()?;
            m.checked_mul(6000)?.checked_add(seconds_field(seconds)?)
        }
        [hours, minutes, seconds] => {
            if !is_digits(hours) || hours.len() > 2 || !digits_exactly(minutes, 2) {
                return None;
            }
            let h: i64 = hours.parse().ok()?;
            let m: i64 = minutes.parse().ok()?;
            h.checked_mul(360_000)?
                .checked_add(m.checked_mul(6000)?)?
                .checked_add(seconds_field(seconds)?)
        }
        _ => None,
    }
}

/// Parse time text into hundredths.
///
/// Empty or whitespace-only input is a distinct success case, `Ok(None)`:
/// "no time present" is not the same as "invalid time".
pub fn parse(text: &str) -> Result<Option<TimeValue>, ParseError> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return Ok(None);
    }
    shape_value(&cleaned)
        .map(|h| Some(TimeValue::from_hundredths(h)))
        .ok_or_else(|| ParseError::UnrecognizedFormat(text.trim().to_string()))
}

/// Canonical display form, `mm:ss.cc`. The minutes field grows past two
/// digits without truncation; hours are always folded into minutes.
pub fn format(value: TimeValue) -> String {
    let (sign, total) = if value.hundredths() < 0 {
        ("-", -value.hundredths())
    } else {
        ("", value.hundredths())
    };
    let minutes = total / 6000;
    let seconds = (total % 6000) / 100;
    let hundredths = total % 100;
    format!("{sign}{minutes:02}:{seconds:02}.{hundredths:02}")
}

/// Gate for user-entered time text. True for empty input and for any of the
/// accepted shapes; never errors on malformed input.
pub fn validate(text: &str) -> bool {
    parse(text).is_ok()
}

/// Normalize stored time text towards the canonical `mm:ss.cc` form.
///
/// Bare seconds become `mm:ss.cc`, `mm:ss` gets `.00` appended, `mm:ss.cc`
/// passes through. Anything else passes through unchanged: sheets carry
/// legacy free-form values and normalization must not destroy them.
/// Idempotent.
pub fn normalize(text: &str) -> String {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return String::new();
    }
    let parts: Vec<&str> = cleaned.split(':').collect();
    match parts.as_slice() {
        [seconds] => match bare_seconds(seconds) {
            Some(h) => format(TimeValue::from_hundredths(h)),
            None => cleaned,
        },
        [minutes, seconds] if is_digits(minutes) && digits_exactly(seconds, 2) => {
            format!("{cleaned}.00")
        }
        _ => cleaned,
    }
}
