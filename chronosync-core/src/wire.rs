/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! JSON request / response shapes of `POST /api/generate`.
//!
//! Decoding is strict about anything the compiler depends on (slot numbers,
//! times, day names) and lenient about display-only fields (`info`, `color`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::WallTime;
use crate::compiler::{CompiledTimetable, TimetableInput};
use crate::course::{Break, CourseItem, Day, SlotSettings};
use crate::error::{CompileError, ConfigurationReason};
use crate::grid::Grid;
use crate::placement::ClippedSpan;
use crate::timeline::{Column, ColumnKey};

/// Color given to items that do not send one.
pub const DEFAULT_COLOR: &str = "#007bff";

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TimetableRequest {
    pub total_slots: i64,

    /// `"<slot number>"` → `"HH:MM"` start time.
    pub slot_settings: BTreeMap<String, String>,

    /// `"<slot number>"` → length in minutes.  Optional per slot.
    #[serde(default)]
    pub slot_durations: BTreeMap<String, u32>,

    #[serde(default)]
    pub breaks: Vec<BreakRequest>,

    #[serde(default)]
    pub schedule_items: Vec<ScheduleItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakRequest {
    #[serde(default)]
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleItemRequest {
    pub subject: String,
    pub day: String,
    pub period: SlotRef,
    pub duration: String,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

/// A slot number sent either as a JSON string (`"3"`) or a number (`3`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SlotRef {
    Number(i64),
    Text(String),
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

impl SlotRef {
    fn resolve(&self, field: impl FnOnce() -> String) -> Result<i64, CompileError> {
        match self {
            SlotRef::Number(n) => Ok(*n),
            SlotRef::Text(s) => s.trim().parse().map_err(|_| CompileError::MalformedRequest {
                field: field(),
                reason: format!("'{s}' is not a slot number"),
            }),
        }
    }
}

impl TimetableRequest {
    /// Decode into compiler input.
    ///
    /// Items with a blank subject are dropped.  Slot entries numbered above
    /// `total_slots` are ignored.
    ///
    /// # Errors
    /// * [`CompileError::Configuration`] for a bad slot key or an unparseable
    ///   slot / break time.
    /// * [`CompileError::MalformedRequest`] for an unknown day or a
    ///   non-numeric period.
    pub fn into_input(self) -> Result<TimetableInput, CompileError> {
        let total_slots = self.total_slots;

        let mut starts = BTreeMap::new();
        for (key, value) in &self.slot_settings {
            let slot = parse_slot_key(key)?;
            if i64::from(slot) > total_slots {
                continue;
            }
            starts.insert(slot, parse_time(format!("slot_settings.{key}"), value)?);
        }

        let mut minutes = BTreeMap::new();
        for (key, value) in &self.slot_durations {
            let slot = parse_slot_key(key)?;
            if i64::from(slot) <= total_slots {
                minutes.insert(slot, *value);
            }
        }

        let breaks = self
            .breaks
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Ok(Break {
                    name: b.name.clone(),
                    start: parse_time(format!("breaks[{i}].start"), &b.start)?,
                    end: parse_time(format!("breaks[{i}].end"), &b.end)?,
                })
            })
            .collect::<Result<Vec<_>, CompileError>>()?;

        let submitted = self.schedule_items.len();
        let mut items = Vec::with_capacity(submitted);
        for (i, raw) in self.schedule_items.into_iter().enumerate() {
            // Trimmed only to spot blanks; the subject is kept as submitted.
            if raw.subject.trim().is_empty() {
                continue;
            }
            let day: Day = raw
                .day
                .parse()
                .map_err(|reason| CompileError::MalformedRequest {
                    field: format!("schedule_items[{i}].day"),
                    reason,
                })?;
            let starting_slot = raw
                .period
                .resolve(|| format!("schedule_items[{i}].period"))?;
            items.push(CourseItem {
                subject: raw.subject,
                day,
                starting_slot,
                duration_class: raw.duration,
                info: raw.info.unwrap_or_default(),
                color: raw.color,
            });
        }
        if items.len() < submitted {
            debug!(
                dropped = submitted - items.len(),
                "blank-subject items dropped"
            );
        }

        Ok(TimetableInput {
            slots: SlotSettings {
                total_slots,
                starts,
                minutes,
            },
            breaks,
            items,
        })
    }
}

fn parse_slot_key(key: &str) -> Result<u32, CompileError> {
    match key.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CompileError::config(ConfigurationReason::InvalidSlotKey {
            key: key.to_owned(),
        })),
    }
}

fn parse_time(field: String, value: &str) -> Result<WallTime, CompileError> {
    value.parse().map_err(|_| {
        CompileError::config(ConfigurationReason::InvalidTime {
            field,
            value: value.to_owned(),
        })
    })
}

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableResponse {
    pub days: Vec<Day>,
    pub periods_order: Vec<ColumnKey>,
    pub header_times: BTreeMap<ColumnKey, String>,
    pub grid_schedule: Grid,
    /// Break columns in display order, for rendering breaks from their own
    /// metadata.
    pub breaks: Vec<BreakInfo>,
    pub clipped_spans: Vec<ClippedSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakInfo {
    pub id: ColumnKey,
    pub name: String,
    pub start: WallTime,
    pub end: WallTime,
}

impl From<CompiledTimetable> for TimetableResponse {
    fn from(compiled: CompiledTimetable) -> Self {
        let breaks = compiled
            .timeline
            .break_columns()
            .filter_map(|c| match c {
                Column::Break {
                    index,
                    name,
                    start,
                    end,
                } => Some(BreakInfo {
                    id: ColumnKey::Break(*index),
                    name: name.clone(),
                    start: *start,
                    end: *end,
                }),
                Column::Slot { .. } => None,
            })
            .collect();

        Self {
            days: compiled.days,
            periods_order: compiled.timeline.periods_order(),
            header_times: compiled.timeline.header_times(),
            grid_schedule: compiled.grid,
            breaks,
            clipped_spans: compiled.clipped,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
