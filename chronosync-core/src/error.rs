/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the timetable compiler.
//!
//! Two layers, mirroring how failures are reported:
//!
//! * [`ConfigurationReason`]: exactly what is wrong with the slot / break
//!   configuration (carries the offending slot numbers and times).
//! * [`CompileError`]: the single request-level failure returned from
//!   [`TimetableCompiler::compile()`](crate::compiler::TimetableCompiler::compile).
//!
//! Every variant maps to one machine-readable [`ErrorKind`] so the HTTP
//! boundary can surface it without parsing messages:
//!
//! | Variant | Kind | Suggested HTTP status |
//! |---|---|---|
//! | `Configuration` | `ConfigurationError` | 400 |
//! | `InvalidDuration` | `InvalidDurationError` | 400 |
//! | `OutOfRange` | `OutOfRangeError` | 400 |
//! | `SchedulingConflict` | `SchedulingConflictError` | 409 |
//! | `MalformedRequest` | `MalformedRequestError` | 400 |

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::clock::WallTime;
use crate::course::Day;

// ── Configuration detail ──────────────────────────────────────────────────────

/// Why the slot / break configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationReason {
    /// `total_slots` is outside `1..=max`.
    TotalSlotsOutOfRange { total_slots: i64, max: u32 },

    /// A slot in `1..=total_slots` has no start time.
    MissingSlotTime { slot: u32 },

    /// A `slot_settings` key is not a positive slot number.
    InvalidSlotKey { key: String },

    /// A slot start or break boundary is not a valid `HH:MM` time.
    InvalidTime { field: String, value: String },

    /// A slot length of zero minutes, or a whole day or more.
    InvalidSlotLength { slot: u32, minutes: u32 },

    /// A break ends at or before it starts.
    EmptyBreak {
        name: String,
        start: WallTime,
        end: WallTime,
    },

    /// Two breaks overlap in time.
    OverlappingBreaks { first: String, second: String },
}

impl fmt::Display for ConfigurationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationReason::TotalSlotsOutOfRange { total_slots, max } => write!(
                f,
                "total_slots must be between 1 and {max}, got {total_slots}"
            ),

            ConfigurationReason::MissingSlotTime { slot } => {
                write!(f, "slot {slot} has no start time in slot_settings")
            }

            ConfigurationReason::InvalidSlotKey { key } => {
                write!(f, "slot_settings key '{key}' is not a slot number")
            }

            ConfigurationReason::InvalidTime { field, value } => {
                write!(f, "{field}: '{value}' is not a valid HH:MM time")
            }

            ConfigurationReason::InvalidSlotLength { slot, minutes } => write!(
                f,
                "slot {slot} length of {minutes} minutes is not between 1 and 1439"
            ),

            ConfigurationReason::EmptyBreak { name, start, end } => write!(
                f,
                "break '{name}' ends at {end}, which is not after its start {start}"
            ),

            ConfigurationReason::OverlappingBreaks { first, second } => {
                write!(f, "breaks '{first}' and '{second}' overlap")
            }
        }
    }
}

impl ConfigurationReason {
    /// The offending slot, key, time or break as structured fields, plus the
    /// human-readable `reason`.
    pub fn details(&self) -> Value {
        let mut details = match self {
            ConfigurationReason::TotalSlotsOutOfRange { total_slots, max } => json!({
                "total_slots": total_slots,
                "max": max,
            }),
            ConfigurationReason::MissingSlotTime { slot } => json!({ "slot": slot }),
            ConfigurationReason::InvalidSlotKey { key } => json!({ "key": key }),
            ConfigurationReason::InvalidTime { field, value } => json!({
                "field": field,
                "value": value,
            }),
            ConfigurationReason::InvalidSlotLength { slot, minutes } => json!({
                "slot": slot,
                "minutes": minutes,
            }),
            ConfigurationReason::EmptyBreak { name, start, end } => json!({
                "name": name,
                "start": start,
                "end": end,
            }),
            ConfigurationReason::OverlappingBreaks { first, second } => json!({
                "first": first,
                "second": second,
            }),
        };
        details["reason"] = Value::String(self.to_string());
        details
    }
}

// ── Conflict detail ───────────────────────────────────────────────────────────

/// One pair of placements whose slot ranges intersect on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub day: Day,
    pub first: String,
    pub second: String,
    /// First overlapping slot (inclusive).
    pub overlap_start: u32,
    /// Last overlapping slot (inclusive).
    pub overlap_end: u32,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' and '{}' on {} ", self.first, self.second, self.day)?;
        if self.overlap_start == self.overlap_end {
            write!(f, "both occupy slot {}", self.overlap_start)
        } else {
            write!(
                f,
                "both occupy slots {}-{}",
                self.overlap_start, self.overlap_end
            )
        }
    }
}

/// Display helper for the conflict list carried by
/// [`CompileError::SchedulingConflict`].
fn describe_conflicts(conflicts: &[Conflict]) -> String {
    match conflicts {
        [] => String::from("no conflicts recorded"),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

// ── Error kind ────────────────────────────────────────────────────────────────

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigurationError,
    InvalidDurationError,
    OutOfRangeError,
    SchedulingConflictError,
    MalformedRequestError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::InvalidDurationError => "InvalidDurationError",
            ErrorKind::OutOfRangeError => "OutOfRangeError",
            ErrorKind::SchedulingConflictError => "SchedulingConflictError",
            ErrorKind::MalformedRequestError => "MalformedRequestError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Top-level compile error ───────────────────────────────────────────────────

/// Request-level failure.  Compilation is atomic: when one of these is
/// returned no grid was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Slot or break configuration is malformed.
    #[error("invalid timetable configuration: {0}")]
    Configuration(ConfigurationReason),

    /// A course names a duration class that is not `lecture`, `lab` or `lab3`.
    #[error("course '{subject}' has unknown duration class '{duration}' (valid: lecture, lab, lab3)")]
    InvalidDuration { subject: String, duration: String },

    /// A course starts outside `1..=total_slots`.
    #[error("course '{subject}' on {day} starts at slot {slot}, outside 1..={total_slots}")]
    OutOfRange {
        subject: String,
        day: Day,
        slot: i64,
        total_slots: u32,
    },

    /// Two or more placements overlap on the same day.  Every overlapping
    /// pair is listed.
    #[error("scheduling conflict: {}", describe_conflicts(.conflicts))]
    SchedulingConflict { conflicts: Vec<Conflict> },

    /// The request could not be decoded into course items (unknown day name,
    /// non-numeric period, ...).
    #[error("malformed request field '{field}': {reason}")]
    MalformedRequest { field: String, reason: String },
}

impl CompileError {
    /// Shorthand for wrapping a [`ConfigurationReason`].
    pub fn config(reason: ConfigurationReason) -> Self {
        CompileError::Configuration(reason)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Configuration(_) => ErrorKind::ConfigurationError,
            CompileError::InvalidDuration { .. } => ErrorKind::InvalidDurationError,
            CompileError::OutOfRange { .. } => ErrorKind::OutOfRangeError,
            CompileError::SchedulingConflict { .. } => ErrorKind::SchedulingConflictError,
            CompileError::MalformedRequest { .. } => ErrorKind::MalformedRequestError,
        }
    }

    /// The offending entities, as structured JSON for the error response.
    pub fn details(&self) -> Value {
        match self {
            CompileError::Configuration(reason) => reason.details(),
            CompileError::InvalidDuration { subject, duration } => json!({
                "subject": subject,
                "duration": duration,
            }),
            CompileError::OutOfRange {
                subject,
                day,
                slot,
                total_slots,
            } => json!({
                "subject": subject,
                "day": day,
                "slot": slot,
                "total_slots": total_slots,
            }),
            CompileError::SchedulingConflict { conflicts } => json!({ "conflicts": conflicts }),
            CompileError::MalformedRequest { field, reason } => json!({
                "field": field,
                "reason": reason,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict(first: &str, second: &str, start: u32, end: u32) -> Conflict {
        Conflict {
            day: Day::Tuesday,
            first: first.into(),
            second: second.into(),
            overlap_start: start,
            overlap_end: end,
        }
    }

    #[test]
    fn kinds_match_their_wire_names() {
        let err = CompileError::InvalidDuration {
            subject: "Art".into(),
            duration: "seminar".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidDurationError);
        assert_eq!(err.kind().as_str(), "InvalidDurationError");
        assert_eq!(
            serde_json::to_string(&ErrorKind::SchedulingConflictError).unwrap(),
            "\"SchedulingConflictError\""
        );
    }

    #[test]
    fn conflict_message_names_subjects_day_and_slot() {
        let err = CompileError::SchedulingConflict {
            conflicts: vec![conflict("Algebra", "Biology", 3, 3)],
        };
        let msg = err.to_string();
        assert!(msg.contains("Algebra"), "{msg}");
        assert!(msg.contains("Biology"), "{msg}");
        assert!(msg.contains("Tuesday"), "{msg}");
        assert!(msg.contains("slot 3"), "{msg}");
    }

    #[test]
    fn conflict_message_summarises_extra_pairs() {
        let err = CompileError::SchedulingConflict {
            conflicts: vec![conflict("A", "B", 1, 2), conflict("B", "C", 2, 2)],
        };
        let msg = err.to_string();
        assert!(msg.contains("slots 1-2"), "{msg}");
        assert!(msg.contains("and 1 more"), "{msg}");
    }

    #[test]
    fn conflict_details_list_every_pair() {
        let err = CompileError::SchedulingConflict {
            conflicts: vec![conflict("A", "B", 1, 2), conflict("B", "C", 2, 2)],
        };
        let details = err.details();
        assert_eq!(details["conflicts"].as_array().unwrap().len(), 2);
        assert_eq!(details["conflicts"][0]["day"], "Tuesday");
        assert_eq!(details["conflicts"][1]["second"], "C");
    }

    #[test]
    fn configuration_reason_is_in_message() {
        let err = CompileError::config(ConfigurationReason::TotalSlotsOutOfRange {
            total_slots: 0,
            max: 24,
        });
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("between 1 and 24, got 0"));
    }

    #[test]
    fn out_of_range_details_carry_slot_and_bound() {
        let err = CompileError::OutOfRange {
            subject: "Chemistry".into(),
            day: Day::Friday,
            slot: 5,
            total_slots: 4,
        };
        let details = err.details();
        assert_eq!(details["slot"], 5);
        assert_eq!(details["total_slots"], 4);
        assert_eq!(details["day"], "Friday");
    }

    #[test]
    fn configuration_details_name_the_offending_slot() {
        let err = CompileError::config(ConfigurationReason::MissingSlotTime { slot: 3 });
        let details = err.details();
        assert_eq!(details["slot"], 3);
        assert!(details["reason"].as_str().unwrap().contains("slot 3"));
    }

    #[test]
    fn configuration_details_carry_break_times() {
        let err = CompileError::config(ConfigurationReason::EmptyBreak {
            name: "Lunch".into(),
            start: "12:00".parse().unwrap(),
            end: "11:30".parse().unwrap(),
        });
        let details = err.details();
        assert_eq!(details["name"], "Lunch");
        assert_eq!(details["start"], "12:00");
        assert_eq!(details["end"], "11:30");
    }

    #[test]
    fn configuration_details_carry_field_and_value() {
        let err = CompileError::config(ConfigurationReason::InvalidTime {
            field: "slot_settings.2".into(),
            value: "25:99".into(),
        });
        let details = err.details();
        assert_eq!(details["field"], "slot_settings.2");
        assert_eq!(details["value"], "25:99");
    }
}
