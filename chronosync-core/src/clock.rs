/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Wall-clock times of day.
//!
//! Slot starts and break boundaries arrive as `"HH:MM"` strings and leave the
//! compiler in the same form.  [`WallTime`] wraps `chrono::NaiveTime` so the
//! whole pipeline orders and compares real times instead of strings
//! (`"9:05"` vs `"10:00"` would sort wrongly as text).

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

/// Input / output format for every time in the request and response.
const TIME_FORMAT: &str = "%H:%M";

/// Minutes in a day; slot durations must stay below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(NaiveTime);

impl WallTime {
    /// Build from hour and minute.  Returns `None` for out-of-range values.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(WallTime)
    }

    /// Minutes since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Add `minutes`, wrapping past midnight.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        WallTime(self.0 + Duration::minutes(i64::from(minutes)))
    }
}

/// Error returned when a string is not a valid `HH:MM` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWallTimeError {
    pub input: String,
}

impl fmt::Display for ParseWallTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid HH:MM time", self.input)
    }
}

impl std::error::Error for ParseWallTimeError {}

impl FromStr for WallTime {
    type Err = ParseWallTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map(WallTime)
            .map_err(|_| ParseWallTimeError {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
