/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Same-day interval overlap detection.
//!
//! A sweep over placements sorted by starting slot: the active set holds
//! every earlier placement whose range still reaches the current start, so
//! each placement is compared only against ranges it can actually intersect.
//! All intersecting pairs are reported, not just the first.

use std::collections::BTreeMap;

use crate::course::{Day, Placement};
use crate::error::Conflict;

/// Find every pair of placements on the same day whose inclusive slot ranges
/// intersect.
///
/// Output order is deterministic: days Monday..Saturday, then sweep order
/// (by starting slot, ties by input position).
pub fn find_conflicts(placements: &[Placement]) -> Vec<Conflict> {
    let mut by_day: BTreeMap<Day, Vec<&Placement>> = BTreeMap::new();
    for p in placements {
        by_day.entry(p.day).or_default().push(p);
    }

    let mut conflicts = Vec::new();
    for (day, mut day_placements) in by_day {
        // Stable sort keeps input order for equal starts.
        day_placements.sort_by_key(|p| p.starting_slot);

        let mut active: Vec<&Placement> = Vec::new();
        for current in day_placements {
            active.retain(|open| open.last_slot() >= current.starting_slot);
            for open in &active {
                conflicts.push(Conflict {
                    day,
                    first: open.subject.clone(),
                    second: current.subject.clone(),
                    overlap_start: current.starting_slot,
                    overlap_end: open.last_slot().min(current.last_slot()),
                });
            }
            active.push(current);
        }
    }
    conflicts
}

// ── Tests ─────────────────────────────────────────────────────────────────────
