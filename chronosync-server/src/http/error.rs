/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error responses.
//!
//! Every failure leaves the server as
//! `{"error": {"kind": ..., "message": ..., "details": {...}}}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use chronosync_core::{CompileError, ErrorKind};

#[derive(Debug)]
pub enum ApiError {
    /// The compiler rejected the request.
    Compile(CompileError),
    /// The body is not valid JSON for the endpoint.
    BadBody(JsonRejection),
    /// The query string does not decode (unknown export format, ...).
    BadQuery(QueryRejection),
    /// Failure after a successful compile (export rendering).
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Compile(e) if e.kind() == ErrorKind::SchedulingConflictError => {
                StatusCode::CONFLICT
            }
            ApiError::Compile(_) | ApiError::BadBody(_) | ApiError::BadQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        let (kind, message, details) = match self {
            ApiError::Compile(e) => (e.kind().as_str(), e.to_string(), e.details()),
            ApiError::BadBody(rejection) => (
                ErrorKind::MalformedRequestError.as_str(),
                rejection.body_text(),
                json!({}),
            ),
            ApiError::BadQuery(rejection) => (
                ErrorKind::MalformedRequestError.as_str(),
                rejection.body_text(),
                json!({}),
            ),
            ApiError::Internal(message) => ("InternalError", message.clone(), json!({})),
        };
        json!({ "error": { "kind": kind, "message": message, "details": details } })
    }
}

impl From<CompileError> for ApiError {
    fn from(e: CompileError) -> Self {
        ApiError::Compile(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = ?self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
