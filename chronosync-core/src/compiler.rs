/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The Timetable Grid Compiler.
//!
//! [`TimetableCompiler`] is stateless: it holds only immutable
//! [`CompilerSettings`] and can be shared between request handlers behind an
//! `Arc` without locking.  Each call builds everything fresh from its input.
//!
//! Pipeline:
//!
//! ```text
//! TimetableInput ──► merge_timeline ──► Timeline ─────────────┐
//!              └───► validate_placements ──► Placements ───────┴──► compile_grid ──► Grid
//! ```
//!
//! The first failing stage ends compilation; nothing partial is returned.

use tracing::{debug, info, warn};

use crate::course::{Break, CourseItem, Day, SlotSettings};
use crate::error::CompileError;
use crate::grid::{compile_grid, Grid};
use crate::placement::{validate_placements, ClippedSpan};
use crate::timeline::{merge_timeline, Timeline};
use crate::wire::{TimetableRequest, TimetableResponse};

/// Default upper bound on `total_slots`.
pub const DEFAULT_MAX_TOTAL_SLOTS: u32 = 24;

/// Default slot length in minutes when a request gives none.
pub const DEFAULT_SLOT_MINUTES: u32 = 55;

/// Tunables for the compiler.  Populated from the `compiler` section of the
/// server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Largest accepted `total_slots`.
    pub max_total_slots: u32,
    /// Length of a slot without an explicit duration.
    pub default_slot_minutes: u32,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_total_slots: DEFAULT_MAX_TOTAL_SLOTS,
            default_slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

/// Decoded compilation input.
#[derive(Debug, Clone, Default)]
pub struct TimetableInput {
    pub slots: SlotSettings,
    pub breaks: Vec<Break>,
    pub items: Vec<CourseItem>,
}

/// A complete, internally consistent compilation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTimetable {
    /// Canonical week order, Monday..Saturday.
    pub days: Vec<Day>,
    pub timeline: Timeline,
    pub grid: Grid,
    /// Placements whose span was shortened to fit `total_slots`.
    pub clipped: Vec<ClippedSpan>,
}

pub struct TimetableCompiler {
    settings: CompilerSettings,
}

impl TimetableCompiler {
    pub fn new(settings: CompilerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Compile a decoded input.
    ///
    /// # Errors
    /// Any [`CompileError`] from the timeline merger or placement validator.
    pub fn compile(&self, input: &TimetableInput) -> Result<CompiledTimetable, CompileError> {
        debug!(
            total_slots = input.slots.total_slots,
            break_count = input.breaks.len(),
            item_count = input.items.len(),
            "compiling timetable"
        );

        let timeline = merge_timeline(&input.slots, &input.breaks, &self.settings)
            .inspect_err(|e| warn!(kind = %e.kind(), error = %e, "timeline rejected"))?;

        let validated = validate_placements(&input.items, timeline.total_slots())
            .inspect_err(|e| warn!(kind = %e.kind(), error = %e, "placements rejected"))?;

        let grid = compile_grid(&validated.placements, &timeline);

        info!(
            total_slots = timeline.total_slots(),
            columns = timeline.columns().len(),
            placements = validated.placements.len(),
            clipped = validated.clipped.len(),
            "timetable compiled"
        );

        Ok(CompiledTimetable {
            days: Day::ALL.to_vec(),
            timeline,
            grid,
            clipped: validated.clipped,
        })
    }

    /// Decode a wire request, compile it and build the wire response.
    ///
    /// # Errors
    /// [`CompileError::MalformedRequest`] or [`CompileError::Configuration`]
    /// from decoding, then anything [`compile`](Self::compile) returns.
    pub fn compile_request(
        &self,
        request: TimetableRequest,
    ) -> Result<TimetableResponse, CompileError> {
        let input = request.into_input()?;
        let compiled = self.compile(&input)?;
        Ok(TimetableResponse::from(compiled))
    }
}

impl Default for TimetableCompiler {
    fn default() -> Self {
        Self::new(CompilerSettings::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
