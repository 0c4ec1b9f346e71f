//! Minute-of-day arithmetic: parsing and formatting `HH:MM`, and the
//! modular arithmetic used throughout the engine to talk about durations
//! that may wrap past midnight.
//!
//! A newtype with `Display`/operator impls and a plain-integer `serde`
//! representation, counting whole minutes since midnight.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{de, ser, Deserialize};

/// A point in time expressed as minutes since midnight, in `[0, 1440]`.
///
/// `1440` is a sentinel for "end of day", used so a final-stop arrival
/// written as `"00:00"` sorts after same-hour departures instead of before
/// them. See [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Minute(u16);

/// Minutes elapsed between two [`Minute`]s, always non-negative (wrap is
/// resolved modulo 1440 by [`duration`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MinuteDelta(u16);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("time {0:?} is not in HH:MM format")]
    InvalidFormat(String),
    #[error("hour {0} out of range 0..24")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range 0..60")]
    MinuteOutOfRange(u32),
}

impl Minute {
    pub const END_OF_DAY: Minute = Minute(1440);
    pub const MIDNIGHT: Minute = Minute(0);

    /// Constructs a `Minute` from a raw minute-of-day value, clamped into
    /// `[0, 1440]` by wrapping: used internally once a value is already
    /// known to be in range.
    pub(crate) fn from_raw(value: u16) -> Minute {
        debug_assert!(value <= 1440);
        Minute(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

/// Parses `"HH:MM"`. The literal `"00:00"` maps to [`Minute::END_OF_DAY`]
/// (1440) rather than midnight; every other value maps to `h * 60 + m`
/// with `0 <= h < 24, 0 <= m < 60`.
pub fn parse(s: &str) -> Result<Minute, TimeParseError> {
    if s == "00:00" {
        return Ok(Minute::END_OF_DAY);
    }
    let (h, m) = s
        .split_once(':')
        .ok_or_else(|| TimeParseError::InvalidFormat(s.to_owned()))?;
    if h.is_empty() || m.is_empty() {
        return Err(TimeParseError::InvalidFormat(s.to_owned()));
    }
    let hours: u32 = h
        .parse()
        .map_err(|_| TimeParseError::InvalidFormat(s.to_owned()))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| TimeParseError::InvalidFormat(s.to_owned()))?;
    if hours >= 24 {
        return Err(TimeParseError::HourOutOfRange(hours));
    }
    if minutes >= 60 {
        return Err(TimeParseError::MinuteOutOfRange(minutes));
    }
    Ok(Minute((hours * 60 + minutes) as u16))
}

/// Formats a minute-of-day as `"HH:MM"`, wrapping modulo 1440 first, so
/// both `Minute::MIDNIGHT` and `Minute::END_OF_DAY` render as `"00:00"`.
pub fn format(m: Minute) -> String {
    let wrapped = m.0 % 1440;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// `(b - a) mod 1440`, used for both travel and transfer edge durations.
pub fn duration(a: Minute, b: Minute) -> MinuteDelta {
    let a = i32::from(a.0) % 1440;
    let b = i32::from(b.0) % 1440;
    MinuteDelta((((b - a) % 1440 + 1440) % 1440) as u16)
}

/// Renders a duration as `"Xh Ym"`.
pub fn format_duration(d: MinuteDelta) -> String {
    format!("{}h {}m", d.0 / 60, d.0 % 60)
}

impl MinuteDelta {
    pub fn minutes(value: u16) -> MinuteDelta {
        MinuteDelta(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl Add<MinuteDelta> for Minute {
    type Output = Minute;

    fn add(self, rhs: MinuteDelta) -> Minute {
        Minute(self.0 + rhs.0)
    }
}

impl Sub for Minute {
    type Output = MinuteDelta;

    /// Subtracts two `Minute`s with the same wraparound rule as
    /// [`duration`].
    fn sub(self, rhs: Minute) -> MinuteDelta {
        duration(rhs, self)
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format(*self))
    }
}

impl ser::Serialize for Minute {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Minute {
    fn deserialize<D>(deserializer: D) -> Result<Minute, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let raw = u16::deserialize(deserializer)?;
        if raw > 1440 {
            return Err(de::Error::custom(format!(
                "minute-of-day {raw} out of range 0..=1440"
            )));
        }
        Ok(Minute(raw))
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_ordinary_times() {
        assert_eq!(parse("08:00").unwrap().as_u16(), 480);
        assert_eq!(parse("00:01").unwrap().as_u16(), 1);
        assert_eq!(parse("23:59").unwrap().as_u16(), 1439);
    }

    #[test]
    fn midnight_literal_is_end_of_day() {
        assert_eq!(parse("00:00").unwrap(), Minute::END_OF_DAY);
        assert_eq!(parse("00:00").unwrap().as_u16(), 1440);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(parse("24:00").is_err());
        assert!(parse("08:60").is_err());
        assert!(parse("not-a-time").is_err());
        assert!(parse("8:0").is_ok()); // single-digit components are fine
    }

    #[test]
    fn round_trip_over_the_ordinary_range() {
        // m == 1440 is excluded: parse("00:00") always yields 1440, not 0,
        // so the round trip only holds on the half-open range.
        for m in 0..1440u16 {
            let minute = Minute::from_raw(m);
            assert_eq!(parse(&format(minute)).unwrap().as_u16(), m);
        }
    }

    #[test]
    fn duration_wraps_past_midnight() {
        let late = Minute::from_raw(1439);
        let early = Minute::from_raw(1);
        assert_eq!(duration(late, early), MinuteDelta::minutes(2));
    }

    #[test]
    fn format_duration_renders_hours_and_minutes() {
        assert_eq!(format_duration(MinuteDelta::minutes(90)), "1h 30m");
        assert_eq!(format_duration(MinuteDelta::minutes(0)), "0h 0m");
    }
}
