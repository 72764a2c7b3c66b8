/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ChronoSync server – HTTP boundary around the timetable grid compiler
//!
//! ```text
//! lib.rs
//! ├── config/   – YAML server + compiler configuration
//! ├── http/     – axum router, handlers, CORS, error responses
//! └── export    – xlsx and CSV rendering of a compiled grid
//! ```

pub mod config;
pub mod export;
pub mod http;

pub use config::ServerConfig;
pub use http::{build_router, AppState};
