//! Minute-resolution time of day.
//!
//! Profiles are entered in 24-hour `HH:MM` form while generated slots are
//! shown as `h:mm AM/PM`. Internally everything is minutes since midnight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeParseError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day between 00:00 and 23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// 00:00
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    /// 23:59, the last representable minute of a day.
    pub const END_OF_DAY: ClockTime = ClockTime::hm(23, 59);

    /// Const constructor for literal times known to be valid.
    pub(crate) const fn hm(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Build from minutes since midnight. Returns `None` past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes as u16))
        } else {
            None
        }
    }

    /// Build from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Add minutes, returning `None` if the result would cross midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    /// Minutes from `self` until `later`, or 0 if `later` is not after `self`.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }

    /// Parse 24-hour `HH:MM` (one- or two-digit hour, two-digit minute).
    pub fn parse_24h(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        let (hour, minute) = split_hm(trimmed).ok_or_else(|| TimeParseError::Format(input.into()))?;
        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange {
                input: input.into(),
                hour,
            });
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange {
                input: input.into(),
                minute,
            });
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Parse 12-hour `h:mm AM` / `h:mm PM` (case-insensitive meridiem).
    pub fn parse_12h(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        let (clock, meridiem) = trimmed
            .rsplit_once(' ')
            .ok_or_else(|| TimeParseError::Format(input.into()))?;
        let pm = match meridiem.to_ascii_uppercase().as_str() {
            "AM" => false,
            "PM" => true,
            _ => return Err(TimeParseError::Format(input.into())),
        };
        let (hour, minute) = split_hm(clock.trim()).ok_or_else(|| TimeParseError::Format(input.into()))?;
        if !(1..=12).contains(&hour) {
            return Err(TimeParseError::HourOutOfRange {
                input: input.into(),
                hour,
            });
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange {
                input: input.into(),
                minute,
            });
        }
        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Ok(Self((hour24 * 60 + minute) as u16))
    }

    /// `HH:MM` form, as accepted on input.
    pub fn to_24h_string(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

fn split_hm(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    let valid_hour = !h.is_empty() && h.len() <= 2 && h.bytes().all(|b| b.is_ascii_digit());
    let valid_minute = m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit());
    if !valid_hour || !valid_minute {
        return None;
    }
    Some((h.parse().ok()?, m.parse().ok()?))
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    /// Accepts either `HH:MM` or `h:mm AM/PM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper.ends_with("AM") || upper.ends_with("PM") {
            Self::parse_12h(s)
        } else {
            Self::parse_24h(s)
        }
    }
}

impl fmt::Display for ClockTime {
    /// 12-hour display form, e.g. `9:05 AM`, `12:00 PM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour = self.hour();
        let meridiem = if hour >= 12 { "PM" } else { "AM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", display_hour, self.minute(), meridiem)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A contiguous range within one day, `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Length in minutes (0 for inverted ranges).
    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    /// Whether at least one block of `minutes` fits.
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= minutes
    }
}
