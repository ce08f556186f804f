// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::openrouter::GenerateError;

/// JSON error body returned to the browser. Never a stack trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Caller problem: no prompt, unparseable body
    InvalidRequest(String),
    /// Credential missing or malformed; caught before any network activity
    InvalidCredential(String),
    /// The remote call produced no image (declined, rejected, or unreachable)
    UpstreamFailure(String),
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InvalidCredential(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ApiError::InvalidRequest(msg)
            | ApiError::InvalidCredential(msg)
            | ApiError::UpstreamFailure(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalError(msg) => msg.clone(),
        };
        ErrorResponse { error: message }
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::MissingCredential | GenerateError::MalformedCredential => {
                ApiError::InvalidCredential(
                    "Missing or invalid OPENROUTER_API_KEY. Check your .env and restart the server."
                        .to_string(),
                )
            }
            GenerateError::NoImage { .. } => {
                ApiError::UpstreamFailure("No images returned from model.".to_string())
            }
            GenerateError::Transport(_) | GenerateError::Rejected { .. } => {
                ApiError::UpstreamFailure(e.to_string())
            }
            GenerateError::Io(_) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::InvalidCredential(msg) => write!(f, "Invalid credential: {}", msg),
            ApiError::UpstreamFailure(msg) => write!(f, "Upstream failure: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
