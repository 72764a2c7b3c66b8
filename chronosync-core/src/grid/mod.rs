/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Grid compilation: validated placements laid out on the merged timeline.
//!
//! Every day gets one cell per slot column.  Break columns never appear in
//! the per-day map; renderers draw them from the timeline's break metadata.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::clock::WallTime;
use crate::course::{Day, DurationClass, Placement};
use crate::timeline::{Column, ColumnKey, Timeline};

// ── Cells ─────────────────────────────────────────────────────────────────────

/// Content of an occupied-lead cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadCell {
    pub subject: String,
    pub duration: DurationClass,
    pub info: String,
    pub color: String,
    pub start: WallTime,
    /// End of the last column this cell visually covers.
    pub end: WallTime,
    pub colspan: u32,
}

/// One `(day, slot column)` cell.
///
/// Wire form: a lead is an object with its content, a continuation is the
/// bare string `"occupied"`, a gap is `{"is_gap": true}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Lead(LeadCell),
    /// Consumed by the preceding lead's colspan.  Renderers skip it.
    Continuation,
    Gap,
}

impl GridCell {
    pub fn as_lead(&self) -> Option<&LeadCell> {
        match self {
            GridCell::Lead(lead) => Some(lead),
            _ => None,
        }
    }
}

impl Serialize for GridCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GridCell::Lead(lead) => lead.serialize(serializer),
            GridCell::Continuation => serializer.serialize_str("occupied"),
            GridCell::Gap => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("is_gap", &true)?;
                map.end()
            }
        }
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// `day → slot column → cell` for all six days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    days: BTreeMap<Day, BTreeMap<ColumnKey, GridCell>>,
}

impl Grid {
    /// Every slot column of `timeline` set to [`GridCell::Gap`] on every day.
    fn empty(timeline: &Timeline) -> Self {
        let row: BTreeMap<ColumnKey, GridCell> = timeline
            .slot_columns()
            .map(|c| (c.key(), GridCell::Gap))
            .collect();
        let days = Day::ALL.into_iter().map(|d| (d, row.clone())).collect();
        Self { days }
    }

    pub fn day(&self, day: Day) -> Option<&BTreeMap<ColumnKey, GridCell>> {
        self.days.get(&day)
    }

    pub fn cell(&self, day: Day, key: ColumnKey) -> Option<&GridCell> {
        self.days.get(&day).and_then(|row| row.get(&key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Day, &BTreeMap<ColumnKey, GridCell>)> {
        self.days.iter()
    }

    fn set(&mut self, day: Day, key: ColumnKey, cell: GridCell) {
        self.days.entry(day).or_default().insert(key, cell);
    }
}

// ── Compiler ──────────────────────────────────────────────────────────────────

/// Lay out `placements` on `timeline`.
///
/// Placements are processed sorted by `(day, starting_slot)`.  A lead's
/// continuation cells follow it through `periods_order` only while each next
/// column is the next-numbered slot; a break column, an out-of-sequence slot,
/// or the end of the day truncates the visual span.  Truncation is not an
/// error.
///
/// Expects placements that already passed validation (in range, no
/// same-day overlap).
pub fn compile_grid(placements: &[Placement], timeline: &Timeline) -> Grid {
    let mut grid = Grid::empty(timeline);
    let columns = timeline.columns();

    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| (p.day, p.starting_slot));

    let mut truncated = 0usize;
    for p in ordered {
        let lead_key = ColumnKey::Slot(p.starting_slot);
        let Some(lead_pos) = timeline.position(lead_key) else {
            debug!(subject = %p.subject, slot = p.starting_slot, "no column for starting slot");
            continue;
        };

        let covered = contiguous_run(columns, lead_pos, p.starting_slot, p.span);
        let colspan = covered.len() as u32;
        for col in covered.iter().skip(1) {
            grid.set(p.day, col.key(), GridCell::Continuation);
        }

        if colspan < p.span {
            truncated += 1;
            debug!(
                subject = %p.subject,
                day = %p.day,
                starting_slot = p.starting_slot,
                span = p.span,
                colspan,
                "visual span truncated at column boundary"
            );
        }

        let lead = &covered[0];
        let end = covered.last().map_or(lead.end(), Column::end);
        grid.set(
            p.day,
            lead_key,
            GridCell::Lead(LeadCell {
                subject: p.subject.clone(),
                duration: p.duration_class,
                info: p.info.clone(),
                color: p.color.clone(),
                start: lead.start(),
                end,
                colspan,
            }),
        );
    }

    info!(
        placement_count = placements.len(),
        truncated_count = truncated,
        "grid compiled"
    );
    grid
}

/// Columns covered by a span starting at `columns[lead_pos]`: the lead, then
/// each following column while it is slot `starting_slot + k`.  Never empty.
fn contiguous_run(columns: &[Column], lead_pos: usize, starting_slot: u32, span: u32) -> &[Column] {
    let mut len = 1;
    while (len as u32) < span {
        let expected = starting_slot + len as u32;
        match columns.get(lead_pos + len).and_then(Column::slot_number) {
            Some(n) if n == expected => len += 1,
            _ => break,
        }
    }
    &columns[lead_pos..lead_pos + len]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompilerSettings;
    use crate::course::{Break, SlotSettings};
    use crate::timeline::merge_timeline;

    fn t(s: &str) -> WallTime {
        s.parse().unwrap()
    }

    fn timeline(times: &[&str], breaks: &[(&str, &str, &str)]) -> Timeline {
        let starts = times
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32 + 1, t(s)))
            .collect();
        let breaks: Vec<Break> = breaks
            .iter()
            .map(|(name, start, end)| Break {
                name: (*name).into(),
                start: t(start),
                end: t(end),
            })
            .collect();
        merge_timeline(
            &SlotSettings::new(times.len() as i64, starts),
            &breaks,
            &CompilerSettings::default(),
        )
        .unwrap()
    }

    /// Four hourly slots with a recess between slots 2 and 3.
    fn school_day() -> Timeline {
        timeline(
            &["08:00", "09:00", "10:00", "11:00"],
            &[("Recess", "09:30", "10:00")],
        )
    }

    fn placed(subject: &str, day: Day, start: u32, class: DurationClass) -> Placement {
        Placement {
            subject: subject.into(),
            day,
            starting_slot: start,
            span: class.span(),
            requested_span: class.span(),
            duration_class: class,
            info: String::new(),
            color: "#22c55e".into(),
        }
    }

    fn lead(grid: &Grid, day: Day, slot: u32) -> &LeadCell {
        grid.cell(day, ColumnKey::Slot(slot))
            .and_then(GridCell::as_lead)
            .unwrap()
    }

    // ── layout ────────────────────────────────────────────────────────────────

    #[test]
    fn empty_placements_leave_every_slot_a_gap() {
        let grid = compile_grid(&[], &school_day());
        for (_, row) in grid.iter() {
            assert_eq!(row.len(), 4);
            assert!(row.values().all(|c| *c == GridCell::Gap));
        }
        assert_eq!(grid.iter().count(), 6);
    }

    #[test]
    fn break_columns_are_not_in_day_rows() {
        let grid = compile_grid(&[], &school_day());
        assert!(grid.cell(Day::Monday, ColumnKey::Break(0)).is_none());
    }

    #[test]
    fn lecture_is_a_single_lead() {
        let grid = compile_grid(
            &[placed("Algebra", Day::Monday, 1, DurationClass::Lecture)],
            &school_day(),
        );
        let cell = lead(&grid, Day::Monday, 1);
        assert_eq!(cell.subject, "Algebra");
        assert_eq!(cell.colspan, 1);
        assert_eq!(cell.start, t("08:00"));
        assert_eq!(cell.end, t("08:55"));
        assert_eq!(grid.cell(Day::Monday, ColumnKey::Slot(2)), Some(&GridCell::Gap));
    }

    #[test]
    fn lab_inside_a_run_spans_two_columns() {
        let grid = compile_grid(
            &[placed("Chem", Day::Wednesday, 3, DurationClass::Lab)],
            &school_day(),
        );
        let cell = lead(&grid, Day::Wednesday, 3);
        assert_eq!(cell.colspan, 2);
        assert_eq!(cell.end, t("11:55"));
        assert_eq!(
            grid.cell(Day::Wednesday, ColumnKey::Slot(4)),
            Some(&GridCell::Continuation)
        );
    }

    #[test]
    fn span_is_truncated_before_a_break() {
        let grid = compile_grid(
            &[placed("Physics", Day::Monday, 2, DurationClass::Lab3)],
            &school_day(),
        );
        assert_eq!(lead(&grid, Day::Monday, 2).colspan, 1);
        assert_eq!(grid.cell(Day::Monday, ColumnKey::Slot(3)), Some(&GridCell::Gap));
        assert_eq!(grid.cell(Day::Monday, ColumnKey::Slot(4)), Some(&GridCell::Gap));
    }

    #[test]
    fn span_stops_at_out_of_sequence_slot() {
        // Slot 2 is configured before slot 1, so slot 1 is followed by slot 3.
        let tl = timeline(&["09:00", "08:00", "10:00"], &[]);
        let grid = compile_grid(&[placed("Bio", Day::Friday, 1, DurationClass::Lab)], &tl);
        assert_eq!(lead(&grid, Day::Friday, 1).colspan, 1);
        assert_eq!(grid.cell(Day::Friday, ColumnKey::Slot(3)), Some(&GridCell::Gap));
    }

    #[test]
    fn clipped_placement_keeps_its_clipped_span() {
        let mut p = placed("Lab", Day::Saturday, 4, DurationClass::Lab3);
        p.span = 1;
        let grid = compile_grid(&[p], &school_day());
        assert_eq!(lead(&grid, Day::Saturday, 4).colspan, 1);
    }

    #[test]
    fn other_days_are_untouched() {
        let grid = compile_grid(
            &[placed("Art", Day::Thursday, 1, DurationClass::Lab)],
            &school_day(),
        );
        let monday = grid.day(Day::Monday).unwrap();
        assert!(monday.values().all(|c| *c == GridCell::Gap));
    }

    // ── properties ────────────────────────────────────────────────────────────

    #[test]
    fn every_row_partitions_into_total_slots_cells() {
        let tl = timeline(
            &["08:00", "09:00", "10:00", "11:00", "13:00", "14:00"],
            &[("Recess", "09:55", "10:00"), ("Lunch", "12:00", "13:00")],
        );
        let grid = compile_grid(
            &[
                placed("A", Day::Monday, 1, DurationClass::Lab3),
                placed("B", Day::Monday, 4, DurationClass::Lab),
                placed("C", Day::Monday, 6, DurationClass::Lecture),
                placed("D", Day::Tuesday, 5, DurationClass::Lab),
            ],
            &tl,
        );
        for (_, row) in grid.iter() {
            assert_eq!(row.len() as u32, tl.total_slots());
        }
    }

    #[test]
    fn continuations_directly_follow_their_lead() {
        let tl = timeline(
            &["08:00", "09:00", "10:00", "11:00", "13:00", "14:00"],
            &[("Lunch", "12:00", "13:00")],
        );
        let grid = compile_grid(
            &[
                placed("A", Day::Monday, 1, DurationClass::Lab3),
                placed("B", Day::Monday, 4, DurationClass::Lab3),
            ],
            &tl,
        );
        let order = tl.periods_order();
        let row = grid.day(Day::Monday).unwrap();
        for (pos, key) in order.iter().enumerate() {
            if let Some(GridCell::Lead(cell)) = row.get(key) {
                for k in 1..cell.colspan as usize {
                    let next = order[pos + k];
                    assert!(!next.is_break());
                    assert_eq!(row.get(&next), Some(&GridCell::Continuation));
                }
                if let Some(after) = order.get(pos + cell.colspan as usize) {
                    assert_ne!(row.get(after), Some(&GridCell::Continuation));
                }
            }
        }
        assert_eq!(lead(&grid, Day::Monday, 4).colspan, 1);
    }

    // ── wire form ─────────────────────────────────────────────────────────────

    #[test]
    fn cells_serialize_to_renderer_shapes() {
        let grid = compile_grid(
            &[placed("Chem", Day::Monday, 3, DurationClass::Lab)],
            &school_day(),
        );
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["Monday"]["1"], serde_json::json!({ "is_gap": true }));
        assert_eq!(json["Monday"]["4"], "occupied");
        assert_eq!(json["Monday"]["3"]["subject"], "Chem");
        assert_eq!(json["Monday"]["3"]["duration"], "lab");
        assert_eq!(json["Monday"]["3"]["start"], "10:00");
        assert_eq!(json["Monday"]["3"]["end"], "11:55");
        assert_eq!(json["Monday"]["3"]["colspan"], 2);
        assert!(json["Monday"].get("break_0").is_none());
    }
}
