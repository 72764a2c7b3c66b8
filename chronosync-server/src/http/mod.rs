/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! HTTP boundary.
//!
//! ```text
//! GET  /healthz        liveness
//! POST /api/generate   TimetableRequest → TimetableResponse (JSON)
//! POST /api/export     TimetableRequest → compiled grid as xlsx
//!                      (?format=csv for CSV)
//! ```
//!
//! Handlers share only immutable state, so requests never see each other's
//! data.

pub mod error;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use chronosync_core::{TimetableCompiler, TimetableRequest, TimetableResponse};

use crate::config::ServerConfig;
use crate::export::{
    render_csv, render_xlsx, CSV_CONTENT_TYPE, CSV_DISPOSITION, XLSX_CONTENT_TYPE,
    XLSX_DISPOSITION,
};

pub use error::ApiError;

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub compiler: Arc<TimetableCompiler>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let compiler = TimetableCompiler::new(config.compiler.clone());
        Self {
            compiler: Arc::new(compiler),
            config: Arc::new(config),
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/generate", post(generate_handler))
        .route("/api/export", post(export_handler))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<TimetableRequest>, JsonRejection>,
) -> Result<Json<TimetableResponse>, ApiError> {
    let Json(request) = payload?;
    let item_count = request.schedule_items.len();
    let response = state.compiler.compile_request(request)?;
    info!(
        item_count,
        columns = response.periods_order.len(),
        clipped = response.clipped_spans.len(),
        "timetable generated"
    );
    Ok(Json(response))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}

async fn export_handler(
    State(state): State<AppState>,
    params: Result<Query<ExportParams>, QueryRejection>,
    payload: Result<Json<TimetableRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let Json(request) = payload?;
    let input = request.into_input()?;
    let compiled = state.compiler.compile(&input)?;

    let (rendered, content_type, disposition) = match params.format {
        ExportFormat::Xlsx => (render_xlsx(&compiled), XLSX_CONTENT_TYPE, XLSX_DISPOSITION),
        ExportFormat::Csv => (render_csv(&compiled), CSV_CONTENT_TYPE, CSV_DISPOSITION),
    };
    let bytes = rendered.map_err(|e| ApiError::Internal(format!("{e:#}")))?;
    info!(format = ?params.format, bytes = bytes.len(), "timetable exported");
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ── CORS ──────────────────────────────────────────────────────────────────────

const ALLOW_METHODS: &str = "GET,POST,OPTIONS";
const ALLOW_HEADERS: &str = "content-type";

async fn cors_middleware(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allowed = origin
        .as_deref()
        .filter(|o| state.config.allows_origin(o))
        .and_then(|o| HeaderValue::from_str(o).ok());

    if *req.method() == Method::OPTIONS {
        debug!(origin = ?origin, allowed = allowed.is_some(), "CORS preflight");
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(value) = allowed {
            let headers = resp.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            );
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(value) = allowed {
        let headers = resp.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    resp
}
