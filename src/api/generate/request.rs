// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation request types and prompt resolution

use serde::Deserialize;

/// Base name used when neither a `name` field nor an uploaded filename
/// provides one.
pub const DEFAULT_BASE_NAME: &str = "image";

pub const NO_PROMPT_ERROR: &str =
    "No prompt provided. Provide JSON {prompt} or upload a .txt file.";

/// JSON body for POST /api/generate. Both fields are optional at the wire
/// level; resolution decides whether a usable prompt came through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,

    /// Base output filename without extension
    #[serde(default)]
    pub name: Option<String>,
}

/// A prompt and base name after JSON/multipart precedence rules have been
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrompt {
    pub prompt: String,
    pub base_name: String,
}

impl GenerateRequest {
    /// Resolve the JSON form: the prompt must be non-empty after trimming,
    /// the name falls back to [`DEFAULT_BASE_NAME`].
    pub fn resolve(self) -> Result<ResolvedPrompt, String> {
        let prompt = self
            .prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| NO_PROMPT_ERROR.to_string())?;

        let base_name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

        Ok(ResolvedPrompt { prompt, base_name })
    }
}
