//! Time values and ADM timecodes
//!
//! ADM times are written either as decimal timecodes (`hh:mm:ss.zzzzz`) or,
//! since BS.2076-2, as fractional timecodes (`hh:mm:ss.nnnnnSddddd`) where
//! the fraction is `nnnnn / ddddd` seconds. Both representations are kept so
//! that a parsed document writes back the way it was read.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{AdmError, AdmResult};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Rational time in seconds (`numerator / denominator`)
#[derive(Debug, Clone, Copy)]
pub struct FractionalTime {
    numerator: i64,
    denominator: i64,
}

impl FractionalTime {
    /// Create a fractional time; the denominator must be positive
    pub fn new(numerator: i64, denominator: i64) -> AdmResult<Self> {
        if denominator <= 0 {
            return Err(AdmError::OutOfRange {
                name: "FractionalTime denominator",
                value: denominator.to_string(),
                range: "> 0".into(),
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[inline]
    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Nearest whole nanosecond, exact in `i128`
    fn rounded_nanos(&self) -> i128 {
        let scaled = self.numerator as i128 * NANOS_PER_SECOND as i128;
        let den = self.denominator as i128;
        let half = den / 2;
        if scaled >= 0 {
            (scaled + half) / den
        } else {
            (scaled - half) / den
        }
    }

    /// Nearest whole nanosecond; fails when that does not fit in `i64`
    pub fn to_nanos(&self) -> AdmResult<i64> {
        i64::try_from(self.rounded_nanos()).map_err(|_| AdmError::OutOfRange {
            name: "Time",
            value: format!("{}/{} s", self.numerator, self.denominator),
            range: "i64 nanoseconds".into(),
        })
    }
}

/// A point in (or span of) time
#[derive(Debug, Clone, Copy)]
pub enum Time {
    /// Whole nanoseconds
    Nanoseconds(i64),
    /// Rational seconds, usually with the sample rate as denominator
    Fractional(FractionalTime),
}

impl Time {
    pub const ZERO: Self = Self::Nanoseconds(0);

    #[inline]
    pub fn from_nanos(nanos: i64) -> Self {
        Self::Nanoseconds(nanos)
    }

    #[inline]
    pub fn from_millis(ms: i64) -> Self {
        Self::Nanoseconds(ms.saturating_mul(1_000_000))
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        Self::Nanoseconds(secs.saturating_mul(NANOS_PER_SECOND))
    }

    /// Fractional time; `denominator` must be positive
    pub fn fractional(numerator: i64, denominator: i64) -> AdmResult<Self> {
        Ok(Self::Fractional(FractionalTime::new(numerator, denominator)?))
    }

    /// Value in nanoseconds (fractional times are rounded)
    pub fn as_nanos(&self) -> AdmResult<i64> {
        match self {
            Self::Nanoseconds(ns) => Ok(*ns),
            Self::Fractional(f) => f.to_nanos(),
        }
    }

    /// Value in nanoseconds, clamped to the `i64` range
    fn saturating_nanos(&self) -> i64 {
        match self {
            Self::Nanoseconds(ns) => *ns,
            Self::Fractional(f) => {
                let nanos = f.rounded_nanos();
                i64::try_from(nanos).unwrap_or(if nanos < 0 { i64::MIN } else { i64::MAX })
            }
        }
    }

    /// Value in seconds
    pub fn as_secs_f64(&self) -> f64 {
        match self {
            Self::Nanoseconds(ns) => *ns as f64 / NANOS_PER_SECOND as f64,
            Self::Fractional(f) => f.numerator as f64 / f.denominator as f64,
        }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        *self < Self::ZERO
    }

    /// Exact rational form `(numerator, denominator)`
    fn as_ratio(&self) -> (i128, i128) {
        match self {
            Self::Nanoseconds(ns) => (*ns as i128, NANOS_PER_SECOND as i128),
            Self::Fractional(f) => (f.numerator as i128, f.denominator as i128),
        }
    }

    /// Difference `self - other`.
    ///
    /// Stays fractional when both sides share a denominator, otherwise the
    /// result is in nanoseconds.
    pub fn saturating_sub(&self, other: &Time) -> Time {
        match (self, other) {
            (Self::Fractional(a), Self::Fractional(b)) if a.denominator == b.denominator => {
                Self::Fractional(FractionalTime {
                    numerator: a.numerator.saturating_sub(b.numerator),
                    denominator: a.denominator,
                })
            }
            _ => Self::Nanoseconds(self.saturating_nanos().saturating_sub(other.saturating_nanos())),
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        let (an, ad) = self.as_ratio();
        let (bn, bd) = other.as_ratio();
        (an * bd).cmp(&(bn * ad))
    }
}

impl std::ops::Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        self.saturating_sub(&rhs)
    }
}

impl From<std::time::Duration> for Time {
    fn from(d: std::time::Duration) -> Self {
        Self::Nanoseconds(d.as_nanos().min(i64::MAX as u128) as i64)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TIMECODES
// ═══════════════════════════════════════════════════════════════════════════

const TIMECODE_FORMAT: &str = "hh:mm:ss.zzzzz or hh:mm:ss.zzzzzSfffff";

fn timecode_error(input: &str, reason: &str) -> AdmError {
    AdmError::parse("timecode", input, TIMECODE_FORMAT, reason)
}

fn parse_digits(input: &str, field: &str, what: &str) -> AdmResult<i64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(timecode_error(input, &format!("{what} must be decimal digits")));
    }
    field
        .parse::<i64>()
        .map_err(|_| timecode_error(input, &format!("{what} too large")))
}

/// Parse an ADM timecode (`hh:mm:ss.zzzzz` or `hh:mm:ss.zzzzzSfffff`)
pub fn parse_timecode(input: &str) -> AdmResult<Time> {
    let mut parts = input.splitn(3, ':');
    let (Some(hours), Some(minutes), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(timecode_error(input, "missing ':' separators"));
    };
    let (seconds, fraction) = rest
        .split_once('.')
        .ok_or_else(|| timecode_error(input, "missing '.' before fraction"))?;

    let hours = parse_digits(input, hours, "hours")?;
    let minutes = parse_digits(input, minutes, "minutes")?;
    let seconds = parse_digits(input, seconds, "seconds")?;
    if minutes >= 60 || seconds >= 60 {
        return Err(timecode_error(input, "minutes and seconds must be below 60"));
    }
    let too_large = || timecode_error(input, "value too large");
    let whole_seconds = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(too_large)?;

    if let Some((numerator, denominator)) = fraction.split_once('S') {
        let numerator = parse_digits(input, numerator, "fraction numerator")?;
        let denominator = parse_digits(input, denominator, "fraction denominator")?;
        if denominator == 0 {
            return Err(timecode_error(input, "fraction denominator must not be 0"));
        }
        if numerator >= denominator {
            return Err(timecode_error(input, "fraction numerator must be below denominator"));
        }
        let total = whole_seconds
            .checked_mul(denominator)
            .and_then(|n| n.checked_add(numerator))
            .ok_or_else(too_large)?;
        return Time::fractional(total, denominator);
    }

    if fraction.len() > 9 {
        return Err(timecode_error(input, "more than 9 fractional digits"));
    }
    let digits = parse_digits(input, fraction, "fraction")?;
    let nanos = digits * 10_i64.pow(9 - fraction.len() as u32);
    whole_seconds
        .checked_mul(NANOS_PER_SECOND)
        .and_then(|n| n.checked_add(nanos))
        .map(Time::Nanoseconds)
        .ok_or_else(too_large)
}

/// Format a time as an ADM timecode.
///
/// Nanosecond times use 5 fractional digits when that is exact and 9
/// otherwise. Fractional times keep their denominator.
pub fn format_timecode(time: &Time) -> String {
    match time {
        Time::Nanoseconds(ns) => {
            let sign = if *ns < 0 { "-" } else { "" };
            let ns = ns.unsigned_abs();
            let secs = ns / NANOS_PER_SECOND as u64;
            let frac = ns % NANOS_PER_SECOND as u64;
            let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
            if frac % 10_000 == 0 {
                format!("{sign}{h:02}:{m:02}:{s:02}.{:05}", frac / 10_000)
            } else {
                format!("{sign}{h:02}:{m:02}:{s:02}.{frac:09}")
            }
        }
        Time::Fractional(f) => {
            let sign = if f.numerator < 0 { "-" } else { "" };
            let num = f.numerator.unsigned_abs();
            let den = f.denominator.unsigned_abs();
            let secs = num / den;
            let rem = num % den;
            let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
            let width = f.denominator.to_string().len();
            format!(
                "{sign}{h:02}:{m:02}:{s:02}.{rem:0width$}S{}",
                f.denominator
            )
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_timecode(self))
    }
}

impl FromStr for Time {
    type Err = AdmError;

    fn from_str(s: &str) -> AdmResult<Self> {
        parse_timecode(s)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timecode(self))
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timecode(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_timecode() {
        let t = parse_timecode("00:00:01.50000").unwrap();
        assert_eq!(t.as_nanos().unwrap(), 1_500_000_000);

        let t = parse_timecode("01:02:03.5").unwrap();
        assert_eq!(t.as_nanos().unwrap(), (3723 * NANOS_PER_SECOND) + 500_000_000);
    }

    #[test]
    fn test_parse_fractional_timecode() {
        let t = parse_timecode("00:00:02.24000S48000").unwrap();
        match t {
            Time::Fractional(f) => {
                assert_eq!(f.numerator(), 2 * 48000 + 24000);
                assert_eq!(f.denominator(), 48000);
            }
            _ => panic!("expected fractional time"),
        }
        assert_eq!(t, Time::from_millis(2500));
    }

    #[test]
    fn test_invalid_timecodes() {
        assert!(parse_timecode("00:00:01").is_err());
        assert!(parse_timecode("00:61:01.0").is_err());
        assert!(parse_timecode("aa:00:01.0").is_err());
        assert!(parse_timecode("00:00:01.5S0").is_err());
        assert!(parse_timecode("00:00:01.1234567890").is_err());
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(&Time::ZERO), "00:00:00.00000");
        assert_eq!(format_timecode(&Time::from_millis(100)), "00:00:00.10000");
        assert_eq!(format_timecode(&Time::from_nanos(1)), "00:00:00.000000001");
        assert_eq!(
            format_timecode(&Time::fractional(48001, 48000).unwrap()),
            "00:00:01.00001S48000"
        );
    }

    #[test]
    fn test_timecode_round_trip() {
        for tc in ["00:00:00.00000", "10:59:59.99999", "00:00:05.00010S48000"] {
            assert_eq!(format_timecode(&parse_timecode(tc).unwrap()), tc);
        }
    }

    #[test]
    fn test_subtraction() {
        let a = Time::from_secs(5);
        let b = Time::from_millis(100);
        assert_eq!((a - b).as_nanos().unwrap(), 4_900_000_000);

        let fa = Time::fractional(96000, 48000).unwrap();
        let fb = Time::fractional(24000, 48000).unwrap();
        assert!(matches!(fa - fb, Time::Fractional(_)));
        assert_eq!(fa - fb, Time::from_millis(1500));
    }

    #[test]
    fn test_oversized_timecodes_are_errors() {
        for tc in [
            "9999999:00:00.00000",
            "99999999999:00:00.1S999999999",
            "2562047:47:16.854775808",
            "999999999999999999:00:00.0",
        ] {
            assert!(
                matches!(parse_timecode(tc), Err(AdmError::Parse { .. })),
                "{tc} should be rejected"
            );
        }
        // largest representable time still parses
        assert_eq!(
            parse_timecode("2562047:47:16.854775807").unwrap(),
            Time::from_nanos(i64::MAX)
        );
    }

    #[test]
    fn test_format_extremes() {
        assert_eq!(format_timecode(&Time::from_nanos(i64::MAX)), "2562047:47:16.854775807");
        assert_eq!(format_timecode(&Time::from_nanos(i64::MIN)), "-2562047:47:16.854775808");
        assert_eq!(format_timecode(&Time::from_millis(-1500)), "-00:00:01.50000");
        let f = Time::fractional(i64::MIN, 48000).unwrap();
        assert!(format_timecode(&f).starts_with('-'));
    }

    #[test]
    fn test_nanos_out_of_range() {
        let huge = Time::fractional(i64::MAX, 1).unwrap();
        assert!(matches!(huge.as_nanos(), Err(AdmError::OutOfRange { .. })));
        assert_eq!(Time::fractional(1, 4).unwrap().as_nanos().unwrap(), 250_000_000);
        // subtraction clamps instead of wrapping
        assert_eq!(huge - Time::ZERO, Time::from_nanos(i64::MAX));
        assert_eq!(Time::from_secs(i64::MAX), Time::from_nanos(i64::MAX));
    }

    #[test]
    fn test_mixed_comparison() {
        let f = Time::fractional(1, 3).unwrap();
        assert!(f > Time::from_nanos(333_333_333));
        assert!(f < Time::from_nanos(333_333_334));
    }
}
