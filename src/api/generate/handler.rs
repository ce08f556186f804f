// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation endpoint handler

use std::path::Path;

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::request::{GenerateRequest, ResolvedPrompt, DEFAULT_BASE_NAME, NO_PROMPT_ERROR};
use super::response::GenerateResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /api/generate - Generate images for a single prompt
///
/// Accepts either JSON `{prompt, name?}` or multipart form data with
/// optional `prompt_file` (text upload), `prompt`, and `name` fields.
/// The credential shape is validated before any work; a request that
/// resolves no prompt never reaches the network.
pub async fn generate_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<GenerateResponse>, ApiError> {
    // Check auth quickly to fail fast with a meaningful error
    if !state.config.api_key.is_well_formed() {
        warn!(
            "generation refused: api key {} missing or malformed",
            state.config.api_key.masked()
        );
        return Err(ApiError::InvalidCredential(
            "Missing or invalid OPENROUTER_API_KEY. Check your .env and restart the server."
                .to_string(),
        ));
    }

    let resolved = resolve_prompt(request).await?;
    debug!(
        "generate request: base_name={}, prompt_len={}",
        resolved.base_name,
        resolved.prompt.len()
    );

    let images = state
        .client
        .generate(&resolved.prompt, &resolved.base_name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(GenerateResponse::from_filenames(images)))
}

/// Branch on the declared content type: JSON body or multipart form.
async fn resolve_prompt(request: Request) -> Result<ResolvedPrompt, ApiError> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        let Json(body) = Json::<GenerateRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("invalid JSON body: {e}")))?;
        body.resolve().map_err(ApiError::InvalidRequest)
    } else {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| ApiError::InvalidRequest(NO_PROMPT_ERROR.to_string()))?;
        resolve_multipart(multipart).await
    }
}

/// Multipart precedence: a non-empty `prompt` field overrides the uploaded
/// file's text, a non-empty `name` field overrides the uploaded file's stem.
async fn resolve_multipart(mut multipart: Multipart) -> Result<ResolvedPrompt, ApiError> {
    let mut file_text: Option<String> = None;
    let mut file_stem: Option<String> = None;
    let mut form_prompt: Option<String> = None;
    let mut form_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt_file") => {
                let stem = field
                    .file_name()
                    .and_then(|filename| Path::new(filename).file_stem())
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
                    .filter(|stem| !stem.is_empty());

                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::InvalidRequest(format!("failed to read uploaded file: {e}"))
                })?;
                let text = String::from_utf8_lossy(&bytes).trim().to_string();

                if !text.is_empty() {
                    file_text = Some(text);
                }
                if stem.is_some() {
                    file_stem = stem;
                }
            }
            Some("prompt") => {
                form_prompt = field
                    .text()
                    .await
                    .ok()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty());
            }
            Some("name") => {
                form_name = field
                    .text()
                    .await
                    .ok()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty());
            }
            // Unknown fields (e.g. extra UI form state) are ignored
            _ => {}
        }
    }

    let prompt = form_prompt
        .or(file_text)
        .ok_or_else(|| ApiError::InvalidRequest(NO_PROMPT_ERROR.to_string()))?;
    let base_name = form_name
        .or(file_stem)
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

    Ok(ResolvedPrompt { prompt, base_name })
}
