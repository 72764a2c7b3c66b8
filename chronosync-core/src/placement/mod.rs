/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Placement validation.
//!
//! Turns submitted [`CourseItem`]s into [`Placement`]s:
//!
//! 1. resolve the duration class to a span (unknown class fails the request),
//! 2. reject starting slots outside `1..=total_slots`,
//! 3. clip spans that run past `total_slots` (flagged, never an error),
//! 4. reject the whole request if any two placements overlap on the same day.
//!
//! Pure function over its inputs; no partial result is ever returned.

pub mod overlap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::course::{CourseItem, Day, DurationClass, Placement};
use crate::error::CompileError;

use overlap::find_conflicts;

/// A placement whose span was shortened to fit `total_slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClippedSpan {
    pub subject: String,
    pub day: Day,
    pub starting_slot: u32,
    pub requested_span: u32,
    pub span: u32,
}

impl ClippedSpan {
    fn from_placement(p: &Placement) -> Self {
        Self {
            subject: p.subject.clone(),
            day: p.day,
            starting_slot: p.starting_slot,
            requested_span: p.requested_span,
            span: p.span,
        }
    }
}

/// Validated placements, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPlacements {
    pub placements: Vec<Placement>,
    pub clipped: Vec<ClippedSpan>,
}

/// Validate `items` against a day of `total_slots` slots.
///
/// # Errors
/// * [`CompileError::InvalidDuration`] for the first item with an unknown
///   duration class.
/// * [`CompileError::OutOfRange`] for the first item starting outside
///   `1..=total_slots`.
/// * [`CompileError::SchedulingConflict`] listing every overlapping pair.
pub fn validate_placements(
    items: &[CourseItem],
    total_slots: u32,
) -> Result<ValidatedPlacements, CompileError> {
    let mut placements = Vec::with_capacity(items.len());
    let mut clipped = Vec::new();

    for item in items {
        let placement = validate_item(item, total_slots)?;
        if placement.is_clipped() {
            warn!(
                subject = %placement.subject,
                day = %placement.day,
                starting_slot = placement.starting_slot,
                requested_span = placement.requested_span,
                span = placement.span,
                total_slots,
                "span clipped to fit the day"
            );
            clipped.push(ClippedSpan::from_placement(&placement));
        }
        placements.push(placement);
    }

    let conflicts = find_conflicts(&placements);
    if !conflicts.is_empty() {
        for c in &conflicts {
            warn!(
                day = %c.day,
                first = %c.first,
                second = %c.second,
                overlap_start = c.overlap_start,
                overlap_end = c.overlap_end,
                "overlapping placements"
            );
        }
        return Err(CompileError::SchedulingConflict { conflicts });
    }

    info!(
        placement_count = placements.len(),
        clipped_count = clipped.len(),
        "placements validated"
    );
    Ok(ValidatedPlacements {
        placements,
        clipped,
    })
}

fn validate_item(item: &CourseItem, total_slots: u32) -> Result<Placement, CompileError> {
    let duration_class =
        DurationClass::parse(&item.duration_class).ok_or_else(|| CompileError::InvalidDuration {
            subject: item.subject.clone(),
            duration: item.duration_class.clone(),
        })?;

    let starting_slot = match u32::try_from(item.starting_slot) {
        Ok(slot) if (1..=total_slots).contains(&slot) => slot,
        _ => {
            return Err(CompileError::OutOfRange {
                subject: item.subject.clone(),
                day: item.day,
                slot: item.starting_slot,
                total_slots,
            })
        }
    };

    let requested_span = duration_class.span();
    let room = total_slots - starting_slot + 1;
    let span = requested_span.min(room);

    debug!(
        subject = %item.subject,
        day = %item.day,
        starting_slot,
        span,
        duration = %duration_class,
        "placement resolved"
    );

    Ok(Placement {
        subject: item.subject.clone(),
        day: item.day,
        starting_slot,
        span,
        requested_span,
        duration_class,
        info: item.info.clone(),
        color: item.color.clone(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
