/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core course data structures for the timetable compiler.
//!
//! Two distinct types model the two sides of validation:
//!
//! ```text
//! request ──(wire)──►  CourseItem  ──(placement)──►  Placement  ──(grid)──►  GridCell
//!                        ↑ input                        ↑ validated
//!                        raw duration string            resolved span, in range
//! ```
//!
//! Slot configuration ([`SlotSettings`]) and [`Break`]s are day-independent
//! and feed the timeline merger.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::clock::WallTime;

// ── Day ───────────────────────────────────────────────────────────────────────

/// One day of the six-day teaching week.
///
/// The derived `Ord` is canonical week order, so a `BTreeMap<Day, _>` always
/// iterates Monday..Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// Every day in canonical week order.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    /// Case-insensitive match on the full English day name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown day '{s}' (valid: Monday..Saturday)"))
    }
}

// ── Duration class ────────────────────────────────────────────────────────────

/// Category of a session, mapping to a fixed number of consecutive slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    /// One slot.
    Lecture,
    /// Two slots.
    Lab,
    /// Three slots.
    Lab3,
}

impl DurationClass {
    /// Number of consecutive slot units this class occupies.
    pub fn span(self) -> u32 {
        match self {
            DurationClass::Lecture => 1,
            DurationClass::Lab => 2,
            DurationClass::Lab3 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationClass::Lecture => "lecture",
            DurationClass::Lab => "lab",
            DurationClass::Lab3 => "lab3",
        }
    }

    /// Resolve a raw duration string.  Unknown classes return `None`; the
    /// caller turns that into an `InvalidDuration` error rather than
    /// defaulting.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "lecture" => Some(DurationClass::Lecture),
            "lab" => Some(DurationClass::Lab),
            "lab3" => Some(DurationClass::Lab3),
            _ => None,
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Slot settings / breaks ────────────────────────────────────────────────────

/// Daily slot configuration: how many slots there are and when each starts.
///
/// `total_slots` stays signed so that a nonsensical request value (zero or
/// negative) reaches the timeline merger and is rejected there with a
/// configuration error instead of being lost in a conversion.
#[derive(Debug, Clone, Default)]
pub struct SlotSettings {
    pub total_slots: i64,

    /// Slot number (1-based) → start time.
    pub starts: BTreeMap<u32, WallTime>,

    /// Slot number → length in minutes.  Missing entries use the compiler's
    /// default slot length.
    pub minutes: BTreeMap<u32, u32>,
}

impl SlotSettings {
    /// Slot settings with every slot at the default length.
    pub fn new(total_slots: i64, starts: BTreeMap<u32, WallTime>) -> Self {
        Self {
            total_slots,
            starts,
            minutes: BTreeMap::new(),
        }
    }
}

/// A named, day-independent break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Break {
    pub name: String,
    pub start: WallTime,
    pub end: WallTime,
}

// ── CourseItem (input) ────────────────────────────────────────────────────────

/// One course placement as submitted: fixed day and starting slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseItem {
    pub subject: String,
    pub day: Day,

    /// Requested first slot.  Signed so `0` and negatives reach the range
    /// check.
    pub starting_slot: i64,

    /// Raw duration class as submitted (`"lecture"`, `"lab"`, `"lab3"`).
    pub duration_class: String,

    pub info: String,

    /// Opaque display token, carried through unchanged.
    pub color: String,
}

// ── Placement (validated) ─────────────────────────────────────────────────────

/// A [`CourseItem`] that passed validation.
///
/// `span` is the resolved slot span after clipping to `total_slots`;
/// `requested_span` is what the duration class asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub subject: String,
    pub day: Day,
    pub starting_slot: u32,
    pub span: u32,
    pub requested_span: u32,
    pub duration_class: DurationClass,
    pub info: String,
    pub color: String,
}

impl Placement {
    /// Last slot covered (inclusive).
    pub fn last_slot(&self) -> u32 {
        self.starting_slot + self.span - 1
    }

    /// `true` if the span had to be shortened to fit `total_slots`.
    pub fn is_clipped(&self) -> bool {
        self.span < self.requested_span
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
