// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Failure taxonomy for the image generation call

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between "here is a prompt" and "here are the
/// saved files". Configuration problems are caught before any network
/// activity; a success status with no usable payload is kept distinct from
/// transport failures so callers can tell "the model declined" from "the
/// network failed".
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("OPENROUTER_API_KEY is not set; add it to your .env")]
    MissingCredential,

    #[error("OPENROUTER_API_KEY does not look like an OpenRouter key (expected prefix 'sk-or-v1-')")]
    MalformedCredential,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OpenRouter returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("no image data in response; assistant said: {preview}")]
    NoImage { preview: String },

    #[error("failed to write image file: {0}")]
    Io(#[from] std::io::Error),
}
