//! ISO-8601 duration subset used by SCTE-224 attributes
//!
//! Durations such as `matchOffset`, `expectedDuration`, `signalTolerance`
//! and `Apply/@duration` are written as `P[nD]T[nH][nM][n[.f]S]`. As in
//! `xs:duration`, a day-only literal may leave out the time part (`P2D`),
//! but a `T` must be followed by at least one component (`P1DT` is
//! malformed). Every magnitude may carry a leading `-`. Decoding yields a nanosecond
//! resolution [`chrono::Duration`]; encoding rounds to the nearest second
//! and renders hours, minutes and seconds (`75s` becomes `PT1M15S`,
//! one hour becomes `PT1H0M0S`).
//!
//! What happens to a malformed literal is a caller decision expressed as a
//! [`DurationPolicy`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(-?\d+)D)?(?:T(?:(-?\d+)H)?(?:(-?\d+)M)?(?:(-?\d+(?:\.\d+)?)S)?)?$")
        .expect("duration pattern is valid")
});

/// Rejected duration literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The literal does not match the duration grammar
    #[error("malformed duration '{0}'")]
    Malformed(String),
    /// The literal is grammatical but does not fit a nanosecond duration
    #[error("duration '{0}' is out of range")]
    OutOfRange(String),
}

/// How a malformed duration literal is handled when it is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationPolicy {
    /// Log a warning and use a zero duration
    #[default]
    Lenient,
    /// Report the literal as an error
    Strict,
}

/// Decode a duration literal under the given policy.
///
/// An empty literal is a zero duration under both policies.
pub fn parse_duration(
    literal: &str,
    policy: DurationPolicy,
) -> Result<chrono::Duration, DurationError> {
    if literal.is_empty() {
        return Ok(chrono::Duration::zero());
    }
    match decode(literal) {
        Ok(value) => Ok(value),
        Err(err) => match policy {
            DurationPolicy::Strict => Err(err),
            DurationPolicy::Lenient => {
                tracing::warn!(literal, error = %err, "unreadable duration, using zero");
                Ok(chrono::Duration::zero())
            }
        },
    }
}

fn decode(literal: &str) -> Result<chrono::Duration, DurationError> {
    let caps = DURATION_PATTERN
        .captures(literal)
        .ok_or_else(|| DurationError::Malformed(literal.to_string()))?;

    if (1..=4).all(|i| caps.get(i).is_none()) || literal.ends_with('T') {
        return Err(DurationError::Malformed(literal.to_string()));
    }

    let out_of_range = || DurationError::OutOfRange(literal.to_string());
    let whole = |index: usize, unit_seconds: i128| -> Result<i128, DurationError> {
        match caps.get(index) {
            Some(m) => {
                let n: i128 = m.as_str().parse().map_err(|_| out_of_range())?;
                n.checked_mul(unit_seconds * NANOS_PER_SECOND)
                    .ok_or_else(out_of_range)
            }
            None => Ok(0),
        }
    };

    let mut nanos = whole(1, 86_400)? + whole(2, 3_600)? + whole(3, 60)?;
    if let Some(m) = caps.get(4) {
        nanos += seconds_to_nanos(m.as_str()).ok_or_else(out_of_range)?;
    }

    let nanos = i64::try_from(nanos).map_err(|_| out_of_range())?;
    Ok(chrono::Duration::nanoseconds(nanos))
}

fn seconds_to_nanos(text: &str) -> Option<i128> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let mut nanos = int_part.parse::<i128>().ok()?.checked_mul(NANOS_PER_SECOND)?;
    if !frac_part.is_empty() {
        // sub-nanosecond digits are truncated
        let mut frac: String = frac_part.chars().take(9).collect();
        while frac.len() < 9 {
            frac.push('0');
        }
        nanos += frac.parse::<i128>().ok()?;
    }
    Some(if negative { -nanos } else { nanos })
}

/// Encode a duration, rounded to the nearest second (halves away from zero)
pub fn format_duration(value: chrono::Duration) -> String {
    let seconds = rounded_seconds(value);
    if seconds == 0 {
        return "PT0S".to_string();
    }

    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    let (h, m, s) = (abs / 3_600, (abs % 3_600) / 60, abs % 60);

    if h > 0 {
        format!("PT{sign}{h}H{sign}{m}M{sign}{s}S")
    } else if m > 0 {
        format!("PT{sign}{m}M{sign}{s}S")
    } else {
        format!("PT{sign}{s}S")
    }
}

fn rounded_seconds(value: chrono::Duration) -> i64 {
    match value.num_nanoseconds() {
        Some(nanos) => {
            let secs = nanos / 1_000_000_000;
            let rem = nanos % 1_000_000_000;
            if rem.abs() >= 500_000_000 {
                secs + nanos.signum()
            } else {
                secs
            }
        }
        None => value.num_seconds(),
    }
}

/// A duration attribute value.
///
/// The literal is kept as written so that re-serializing a parsed document
/// reproduces it exactly; [`Duration::value`] decodes it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(String);

impl Duration {
    /// Wrap a literal without decoding it
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    /// Canonical literal for a numeric duration
    pub fn from_chrono(value: chrono::Duration) -> Self {
        Self(format_duration(value))
    }

    /// Parse a literal, validating it under `policy`.
    ///
    /// Under [`DurationPolicy::Lenient`] the literal is kept as written even
    /// when it does not decode.
    pub fn parse_with(literal: &str, policy: DurationPolicy) -> Result<Self, DurationError> {
        parse_duration(literal, policy)?;
        Ok(Self(literal.to_string()))
    }

    /// The literal as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the literal is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode leniently; malformed literals are zero
    pub fn value(&self) -> chrono::Duration {
        parse_duration(&self.0, DurationPolicy::Lenient).unwrap_or_else(|_| chrono::Duration::zero())
    }

    /// Decode under an explicit policy
    pub fn value_with(&self, policy: DurationPolicy) -> Result<chrono::Duration, DurationError> {
        parse_duration(&self.0, policy)
    }

    /// Re-encode in canonical form
    pub fn canonical(&self) -> Self {
        Self::from_chrono(self.value())
    }
}

impl From<chrono::Duration> for Duration {
    fn from(value: chrono::Duration) -> Self {
        Self::from_chrono(value)
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, DurationPolicy::Strict)
    }
}

impl AsRef<str> for Duration {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(n: i64) -> chrono::Duration {
        chrono::Duration::seconds(n)
    }

    #[test]
    fn test_parse_minutes_and_seconds() {
        assert_eq!(parse_duration("PT1M15S", DurationPolicy::Strict), Ok(secs(75)));
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(parse_duration("", DurationPolicy::Strict), Ok(secs(0)));
        assert_eq!(parse_duration("", DurationPolicy::Lenient), Ok(secs(0)));
    }

    #[test]
    fn test_parse_days_and_hours() {
        assert_eq!(
            parse_duration("P1DT2H", DurationPolicy::Strict),
            Ok(secs(26 * 3600))
        );
        assert_eq!(parse_duration("P2D", DurationPolicy::Strict), Ok(secs(2 * 86_400)));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert_eq!(
            parse_duration("PT1.5S", DurationPolicy::Strict),
            Ok(chrono::Duration::milliseconds(1500))
        );
        assert_eq!(
            parse_duration("PT0.000000001S", DurationPolicy::Strict),
            Ok(chrono::Duration::nanoseconds(1))
        );
    }

    #[test]
    fn test_parse_negative_components() {
        assert_eq!(parse_duration("PT-30S", DurationPolicy::Strict), Ok(secs(-30)));
        assert_eq!(
            parse_duration("PT-1M-15S", DurationPolicy::Strict),
            Ok(secs(-75))
        );
    }

    #[test]
    fn test_malformed_lenient_is_zero() {
        assert_eq!(parse_duration("15 minutes", DurationPolicy::Lenient), Ok(secs(0)));
        assert_eq!(parse_duration("P", DurationPolicy::Lenient), Ok(secs(0)));
    }

    #[test]
    fn test_malformed_strict_is_error() {
        assert_eq!(
            parse_duration("PT1X", DurationPolicy::Strict),
            Err(DurationError::Malformed("PT1X".to_string()))
        );
        assert!(matches!(
            parse_duration("PT", DurationPolicy::Strict),
            Err(DurationError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_time_part_is_malformed() {
        assert_eq!(
            parse_duration("P1DT", DurationPolicy::Strict),
            Err(DurationError::Malformed("P1DT".to_string()))
        );
        assert_eq!(parse_duration("P1DT", DurationPolicy::Lenient), Ok(secs(0)));
        assert!(parse_duration("P1DT0S", DurationPolicy::Strict).is_ok());
    }

    #[test]
    fn test_out_of_range_strict_is_error() {
        assert!(matches!(
            parse_duration("P99999999999999D", DurationPolicy::Strict),
            Err(DurationError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(secs(75)), "PT1M15S");
        assert_eq!(format_duration(secs(0)), "PT0S");
        assert_eq!(format_duration(secs(15)), "PT15S");
        assert_eq!(format_duration(secs(3600)), "PT1H0M0S");
        assert_eq!(format_duration(secs(26 * 3600 + 61)), "PT26H1M1S");
        assert_eq!(format_duration(secs(-75)), "PT-1M-15S");
    }

    #[test]
    fn test_format_rounds_to_nearest_second() {
        assert_eq!(format_duration(chrono::Duration::milliseconds(1499)), "PT1S");
        assert_eq!(format_duration(chrono::Duration::milliseconds(1500)), "PT2S");
        assert_eq!(format_duration(chrono::Duration::milliseconds(-1500)), "PT-2S");
        assert_eq!(format_duration(chrono::Duration::milliseconds(400)), "PT0S");
    }

    #[test]
    fn test_duration_preserves_literal() {
        let d = Duration::new("PT90S");
        assert_eq!(d.as_str(), "PT90S");
        assert_eq!(d.value(), secs(90));
        assert_eq!(d.canonical().as_str(), "PT1M30S");
        assert_eq!(d.to_string(), "PT90S");
    }

    #[test]
    fn test_duration_from_str_is_strict() {
        assert!("PT5M".parse::<Duration>().is_ok());
        assert!("five".parse::<Duration>().is_err());
        assert!(Duration::parse_with("five", DurationPolicy::Lenient).is_ok());
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_is_identity(n in -10_000_000i64..10_000_000i64) {
            let literal = format_duration(secs(n));
            prop_assert_eq!(parse_duration(&literal, DurationPolicy::Strict), Ok(secs(n)));
        }

        #[test]
        fn prop_lenient_never_fails(s in "\\PC*") {
            prop_assert!(parse_duration(&s, DurationPolicy::Lenient).is_ok());
        }
    }
}
