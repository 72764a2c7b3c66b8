/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timeline merging: slot columns and break columns in one chronological
//! sequence.
//!
//! Both column kinds go through a single [`Column`] abstraction and a single
//! comparator (start time), so `periods_order` is the sorted column list by
//! construction and the header and per-day rows can never disagree on order.
//!
//! # Tie policy
//! Columns are built slots first (`1..=total_slots`), then breaks in request
//! order, and sorted with a **stable** sort.  When a break starts exactly when
//! a slot starts, the slot column comes first; equal-start breaks keep request
//! order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::clock::{WallTime, MINUTES_PER_DAY};
use crate::compiler::CompilerSettings;
use crate::course::{Break, SlotSettings};
use crate::error::{CompileError, ConfigurationReason};

// ── Column key ────────────────────────────────────────────────────────────────

/// Key of one timeline column, as it appears in `periods_order`,
/// `header_times` and `grid_schedule`.
///
/// The derived `Ord` (all slots by number, then all breaks by index) is only
/// used for map storage; chronological order lives in [`Timeline::columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    /// Slot number, rendered as `"3"`.
    Slot(u32),
    /// Break index in the request's break list, rendered as `"break_0"`.
    Break(usize),
}

impl ColumnKey {
    pub fn is_break(&self) -> bool {
        matches!(self, ColumnKey::Break(_))
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Slot(n) => write!(f, "{n}"),
            ColumnKey::Break(i) => write!(f, "break_{i}"),
        }
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

/// One column of the compiled timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Slot {
        number: u32,
        start: WallTime,
        end: WallTime,
    },
    Break {
        index: usize,
        name: String,
        start: WallTime,
        end: WallTime,
    },
}

impl Column {
    pub fn key(&self) -> ColumnKey {
        match self {
            Column::Slot { number, .. } => ColumnKey::Slot(*number),
            Column::Break { index, .. } => ColumnKey::Break(*index),
        }
    }

    /// The single ordering key for both column kinds.
    pub fn start(&self) -> WallTime {
        match self {
            Column::Slot { start, .. } | Column::Break { start, .. } => *start,
        }
    }

    pub fn end(&self) -> WallTime {
        match self {
            Column::Slot { end, .. } | Column::Break { end, .. } => *end,
        }
    }

    /// Slot number for slot columns, `None` for breaks.
    pub fn slot_number(&self) -> Option<u32> {
        match self {
            Column::Slot { number, .. } => Some(*number),
            Column::Break { .. } => None,
        }
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Chronologically ordered columns for one (every) day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    total_slots: u32,
    columns: Vec<Column>,
}

impl Timeline {
    pub fn total_slots(&self) -> u32 {
        self.total_slots
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column keys in display order.
    pub fn periods_order(&self) -> Vec<ColumnKey> {
        self.columns.iter().map(Column::key).collect()
    }

    /// Column key → display time (the column's start, `HH:MM`).
    pub fn header_times(&self) -> BTreeMap<ColumnKey, String> {
        self.columns
            .iter()
            .map(|c| (c.key(), c.start().to_string()))
            .collect()
    }

    /// Position of `key` in display order.
    pub fn position(&self, key: ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c.key() == key)
    }

    /// Slot columns only, in display order.
    pub fn slot_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.key().is_break())
    }

    /// Break columns only, in display order.
    pub fn break_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.key().is_break())
    }
}

// ── Merger ────────────────────────────────────────────────────────────────────

/// Merge numbered slots and named breaks into one [`Timeline`].
///
/// # Errors
/// [`CompileError::Configuration`] when `total_slots` is outside
/// `1..=settings.max_total_slots`, a slot has no start time or an invalid
/// length, a break ends at or before its start, or two breaks overlap.
pub fn merge_timeline(
    slots: &SlotSettings,
    breaks: &[Break],
    settings: &CompilerSettings,
) -> Result<Timeline, CompileError> {
    let total_slots = checked_total_slots(slots.total_slots, settings.max_total_slots)?;

    // Sized from the entries actually supplied, not the requested count.
    let mut columns = Vec::with_capacity(slots.starts.len() + breaks.len());

    for number in 1..=total_slots {
        let start = *slots.starts.get(&number).ok_or_else(|| {
            CompileError::config(ConfigurationReason::MissingSlotTime { slot: number })
        })?;
        let minutes = slots
            .minutes
            .get(&number)
            .copied()
            .unwrap_or(settings.default_slot_minutes);
        if minutes == 0 || minutes >= MINUTES_PER_DAY {
            return Err(CompileError::config(
                ConfigurationReason::InvalidSlotLength {
                    slot: number,
                    minutes,
                },
            ));
        }
        columns.push(Column::Slot {
            number,
            start,
            end: start.plus_minutes(minutes),
        });
    }

    check_breaks(breaks)?;
    for (index, b) in breaks.iter().enumerate() {
        columns.push(Column::Break {
            index,
            name: b.name.clone(),
            start: b.start,
            end: b.end,
        });
    }

    // Stable: ties keep construction order (slots before breaks).
    columns.sort_by_key(Column::start);

    for c in &columns {
        debug!(column = %c.key(), start = %c.start(), end = %c.end(), "timeline column");
    }
    info!(
        total_slots,
        break_count = breaks.len(),
        column_count = columns.len(),
        "timeline merged"
    );

    Ok(Timeline {
        total_slots,
        columns,
    })
}

fn checked_total_slots(total_slots: i64, max: u32) -> Result<u32, CompileError> {
    match u32::try_from(total_slots) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(CompileError::config(
            ConfigurationReason::TotalSlotsOutOfRange { total_slots, max },
        )),
    }
}

/// Every break must be non-empty and no two may overlap.
fn check_breaks(breaks: &[Break]) -> Result<(), CompileError> {
    for b in breaks {
        if b.end <= b.start {
            return Err(CompileError::config(ConfigurationReason::EmptyBreak {
                name: b.name.clone(),
                start: b.start,
                end: b.end,
            }));
        }
    }

    let mut by_start: Vec<&Break> = breaks.iter().collect();
    by_start.sort_by_key(|b| b.start);
    for pair in by_start.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(CompileError::config(
                ConfigurationReason::OverlappingBreaks {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                },
            ));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn t(s: &str) -> WallTime {
        s.parse().unwrap()
    }

    fn slots(times: &[&str]) -> SlotSettings {
        let starts = times
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32 + 1, t(s)))
            .collect();
        SlotSettings::new(times.len() as i64, starts)
    }

    fn brk(name: &str, start: &str, end: &str) -> Break {
        Break {
            name: name.into(),
            start: t(start),
            end: t(end),
        }
    }

    fn keys(timeline: &Timeline) -> Vec<String> {
        timeline
            .periods_order()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    // ── ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn break_is_interleaved_by_start_time() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00", "10:00", "11:00"]),
            &[brk("Recess", "09:30", "10:00")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(keys(&tl), vec!["1", "2", "break_0", "3", "4"]);
    }

    #[test]
    fn break_before_first_slot_leads_the_timeline() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00"]),
            &[brk("Assembly", "07:30", "08:00")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(keys(&tl), vec!["break_0", "1", "2"]);
    }

    #[test]
    fn slots_are_ordered_by_time_not_number() {
        let tl = merge_timeline(
            &slots(&["10:00", "08:00", "09:00"]),
            &[],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(keys(&tl), vec!["2", "3", "1"]);
    }

    #[test]
    fn multiple_breaks_get_distinct_keys() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00", "10:00"]),
            &[brk("Lunch", "09:55", "10:00"), brk("Tea", "08:55", "09:00")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(keys(&tl), vec!["1", "break_1", "2", "break_0", "3"]);
    }

    #[test]
    fn tie_between_slot_and_break_puts_slot_first() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00"]),
            &[brk("Stand-up", "09:00", "09:10")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(keys(&tl), vec!["1", "2", "break_0"]);
    }

    #[test]
    fn periods_order_is_sorted_by_start_time() {
        let tl = merge_timeline(
            &slots(&["08:15", "09:10", "10:05", "11:30", "12:25", "13:20"]),
            &[brk("Tea", "11:00", "11:30"), brk("Lunch", "13:15", "13:20")],
            &CompilerSettings::default(),
        )
        .unwrap();
        let starts: Vec<WallTime> = tl.columns().iter().map(Column::start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(tl.slot_columns().count(), 6);
        assert_eq!(tl.break_columns().count(), 2);
    }

    // ── header times / slot ends ──────────────────────────────────────────────

    #[test]
    fn header_times_use_column_start() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00"]),
            &[brk("Recess", "08:55", "09:00")],
            &CompilerSettings::default(),
        )
        .unwrap();
        let headers = tl.header_times();
        assert_eq!(headers[&ColumnKey::Slot(1)], "08:00");
        assert_eq!(headers[&ColumnKey::Break(0)], "08:55");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn slot_end_uses_configured_or_default_length() {
        let mut s = slots(&["08:15", "09:10"]);
        s.minutes.insert(2, 40);
        let tl = merge_timeline(&s, &[], &CompilerSettings::default()).unwrap();
        assert_eq!(tl.columns()[0].end().to_string(), "09:10"); // default 55
        assert_eq!(tl.columns()[1].end().to_string(), "09:50");
    }

    // ── configuration errors ──────────────────────────────────────────────────

    #[test]
    fn zero_or_negative_total_slots_is_rejected() {
        for total in [0, -3] {
            let s = SlotSettings::new(total, BTreeMap::new());
            let err = merge_timeline(&s, &[], &CompilerSettings::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        }
    }

    #[test]
    fn total_slots_above_limit_is_rejected() {
        let settings = CompilerSettings {
            max_total_slots: 2,
            ..CompilerSettings::default()
        };
        let err = merge_timeline(&slots(&["08:00", "09:00", "10:00"]), &[], &settings)
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::TotalSlotsOutOfRange {
                total_slots: 3,
                max: 2
            })
        ));
    }

    #[test]
    fn missing_slot_time_is_rejected() {
        let mut s = slots(&["08:00", "09:00", "10:00"]);
        s.starts.remove(&2);
        let err = merge_timeline(&s, &[], &CompilerSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::MissingSlotTime { slot: 2 })
        ));
    }

    #[test]
    fn huge_total_slots_without_times_is_a_configuration_error() {
        let settings = CompilerSettings {
            max_total_slots: u32::MAX,
            ..CompilerSettings::default()
        };
        let s = SlotSettings::new(4_000_000_000, BTreeMap::new());
        let err = merge_timeline(&s, &[], &settings).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::MissingSlotTime { slot: 1 })
        ));
    }

    #[test]
    fn slot_entries_beyond_total_are_ignored() {
        let mut s = slots(&["08:00", "09:00", "10:00"]);
        s.total_slots = 2;
        let tl = merge_timeline(&s, &[], &CompilerSettings::default()).unwrap();
        assert_eq!(keys(&tl), vec!["1", "2"]);
    }

    #[test]
    fn zero_length_slot_is_rejected() {
        let mut s = slots(&["08:00"]);
        s.minutes.insert(1, 0);
        let err = merge_timeline(&s, &[], &CompilerSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::InvalidSlotLength { slot: 1, .. })
        ));
    }

    #[test]
    fn break_ending_before_start_is_rejected() {
        let err = merge_timeline(
            &slots(&["08:00"]),
            &[brk("Backwards", "10:00", "09:30")],
            &CompilerSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::EmptyBreak { .. })
        ));
    }

    #[test]
    fn zero_length_break_is_rejected() {
        let err = merge_timeline(
            &slots(&["08:00"]),
            &[brk("Blink", "10:00", "10:00")],
            &CompilerSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    }

    #[test]
    fn overlapping_breaks_are_rejected() {
        let err = merge_timeline(
            &slots(&["08:00"]),
            &[brk("Lunch", "12:00", "13:00"), brk("Prayer", "12:30", "12:45")],
            &CompilerSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationReason::OverlappingBreaks { .. })
        ));
    }

    #[test]
    fn back_to_back_breaks_are_accepted() {
        let tl = merge_timeline(
            &slots(&["08:00"]),
            &[brk("A", "09:00", "09:10"), brk("B", "09:10", "09:20")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(tl.break_columns().count(), 2);
    }

    #[test]
    fn position_finds_column_in_display_order() {
        let tl = merge_timeline(
            &slots(&["08:00", "09:00"]),
            &[brk("Recess", "08:55", "09:00")],
            &CompilerSettings::default(),
        )
        .unwrap();
        assert_eq!(tl.position(ColumnKey::Slot(2)), Some(2));
        assert_eq!(tl.position(ColumnKey::Slot(9)), None);
    }
}
