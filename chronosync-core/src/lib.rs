/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ChronoSync core – the timetable grid compiler
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── clock         – HH:MM wall-clock times
//! ├── course        – days, duration classes, course items, placements
//! ├── timeline/     – slot + break column merge (periods_order, header_times)
//! ├── placement/    – span resolution, range checks, same-day overlap sweep
//! ├── grid/         – per-day lead / continuation / gap layout
//! ├── compiler      – TimetableCompiler pipeline and settings
//! ├── wire          – JSON request / response shapes
//! └── error         – CompileError and its machine-readable kinds
//! ```

pub mod clock;
pub mod compiler;
pub mod course;
pub mod error;
pub mod grid;
pub mod placement;
pub mod timeline;
pub mod wire;

pub use compiler::{CompiledTimetable, CompilerSettings, TimetableCompiler, TimetableInput};
pub use error::{CompileError, ErrorKind};
pub use wire::{TimetableRequest, TimetableResponse};
