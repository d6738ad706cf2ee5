//! Wire codec for the request `timeout` field.
//!
//! The field accepts either a JSON number (a nanosecond count) or a duration
//! string such as `"1s"`, `"250ms"`, or `"1h30m"`, and always serializes back
//! to the string form. Both spellings of the same duration decode to the same
//! internal value.

use std::fmt;
use std::time::Duration;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Duration as it appears in request/response documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WireDuration(pub Duration);

impl WireDuration {
    /// Returns the wrapped duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<Duration> for WireDuration {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl fmt::Display for WireDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Serialize for WireDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(self.0))
    }
}

impl<'de> Deserialize<'de> for WireDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(nanos) => {
                if !nanos.is_finite() || nanos < 0.0 {
                    return Err(D::Error::custom("invalid duration"));
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let nanos = nanos as u64;
                Ok(Self(Duration::from_nanos(nanos)))
            }
            Raw::Text(text) => parse_duration(&text)
                .map(Self)
                .map_err(|_| D::Error::custom(format!("invalid duration {text:?}"))),
        }
    }
}

/// Failed to parse a duration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{b5}s", 1_000),  // µs
    ("\u{3bc}s", 1_000), // μs
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

/// Parses a duration string of the form `<number><unit>[<number><unit>...]`.
///
/// Units are `ns`, `us`/`µs`, `ms`, `s`, `m`, and `h`; each segment may carry
/// a decimal fraction (`"1.5s"`). The bare string `"0"` is accepted.
///
/// # Errors
///
/// Returns [`ParseDurationError`] for empty input, unknown units, missing
/// digits, or overflow.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        return Err(ParseDurationError);
    }

    let mut rest = input;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_str, after_int) = rest.split_at(int_len);

        let (frac_str, after_num) = if let Some(stripped) = after_int.strip_prefix('.') {
            let frac_len = stripped
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(stripped.len());
            stripped.split_at(frac_len)
        } else {
            ("", after_int)
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(ParseDurationError);
        }

        let (unit_str, unit_nanos) = UNITS
            .iter()
            .copied()
            .find(|&(name, _)| after_num.starts_with(name) && matches_unit(after_num, name))
            .ok_or(ParseDurationError)?;

        let int_part: u128 = if int_str.is_empty() {
            0
        } else {
            int_str.parse().map_err(|_| ParseDurationError)?
        };

        let mut segment = int_part
            .checked_mul(unit_nanos)
            .ok_or(ParseDurationError)?;

        let mut scale = unit_nanos;
        for digit in frac_str.chars() {
            scale /= 10;
            let digit = u128::from(digit.to_digit(10).ok_or(ParseDurationError)?);
            segment = segment
                .checked_add(digit * scale)
                .ok_or(ParseDurationError)?;
        }

        total = total.checked_add(segment).ok_or(ParseDurationError)?;
        rest = &after_num[unit_str.len()..];
    }

    let nanos = u64::try_from(total).map_err(|_| ParseDurationError)?;
    Ok(Duration::from_nanos(nanos))
}

// "m" must not match the front of "ms"; longer units sort behind shorter
// ones in UNITS, so check the character following the candidate unit.
fn matches_unit(rest: &str, name: &str) -> bool {
    match rest[name.len()..].chars().next() {
        None => true,
        Some(next) => next.is_ascii_digit() || next == '.',
    }
}

/// Formats a duration the way Go's `time.Duration` prints itself:
/// `"0s"`, `"150ms"`, `"1.5s"`, `"1m30s"`, `"2h45m0s"`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        let (unit, precision) = if nanos < 1_000 {
            ("ns", 0)
        } else if nanos < 1_000_000 {
            ("\u{b5}s", 3)
        } else {
            ("ms", 6)
        };
        let (frac, int) = split_frac(nanos, precision);
        return format!("{int}{frac}{unit}");
    }

    let (frac, whole_seconds) = split_frac(nanos, 9);
    let seconds = whole_seconds % 60;
    let minutes_total = whole_seconds / 60;

    if minutes_total == 0 {
        return format!("{seconds}{frac}s");
    }

    let minutes = minutes_total % 60;
    let hours = minutes_total / 60;

    if hours == 0 {
        return format!("{minutes}m{seconds}{frac}s");
    }

    format!("{hours}h{minutes}m{seconds}{frac}s")
}

/// Splits off `precision` low decimal digits of `value` as a fraction string
/// (leading dot, trailing zeros trimmed; empty when the fraction is zero).
fn split_frac(value: u128, precision: u32) -> (String, u128) {
    let mut value = value;
    let mut digits = String::new();
    let mut significant = false;

    for _ in 0..precision {
        let digit = (value % 10) as u32;
        value /= 10;
        significant = significant || digit != 0;
        if significant {
            if let Some(ch) = char::from_digit(digit, 10) {
                digits.insert(0, ch);
            }
        }
    }

    if significant {
        digits.insert(0, '.');
    }

    (digits, value)
}
