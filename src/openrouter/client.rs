// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenRouter client: one chat-completions call per prompt, images decoded
//! from data URLs and written under the output directory

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, LOCATION};
use reqwest::{redirect, Client};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ApiKey, API_KEY_PREFIX};

use super::data_url::decode_image_data_url;
use super::error::GenerateError;
use super::response::{ChatMessage, ChatResponse};

/// Attribution headers OpenRouter uses for app rankings.
const REFERER: &str = "https://github.com/yourusername/blood-assassin";
const TITLE: &str = "Blood Assassin Image Generator";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const AUTH_CHECK_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for generating images through OpenRouter's chat-completions API.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
    output_dir: PathBuf,
}

impl OpenRouterClient {
    /// Build the client and make sure the output directory exists.
    ///
    /// Redirects are never followed: a cross-host redirect can drop the
    /// Authorization header, so a 3xx is surfaced to the caller instead.
    pub fn new(config: &AppConfig) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(GENERATE_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;

        fs::create_dir_all(&config.output_dir)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            output_dir: config.output_dir.clone(),
        })
    }

    /// Generate images for one prompt and save them as `<base_name>.<ext>`
    /// (or `<base_name>_1..N.<ext>` when the response carries several).
    ///
    /// Exactly one network call. Returns the filenames written.
    pub async fn generate(
        &self,
        prompt: &str,
        base_name: &str,
    ) -> Result<Vec<String>, GenerateError> {
        let key = self.require_key()?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": format!("Generate an image based on this prompt: {prompt}"),
            }],
            // Request image outputs explicitly per OpenRouter docs
            "modalities": ["image", "text"],
        });

        info!("generating image for: {}", base_name);
        debug!("generate POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .header(ACCEPT, "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("generation rejected: {} {}", status, body);
            return Err(GenerateError::Rejected { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        self.save_images(&chat.into_first_message(), base_name)
    }

    /// Validate the credential against the models listing endpoint before a
    /// batch spends failed generation calls on it.
    pub async fn check_auth(&self) -> Result<(), GenerateError> {
        let key = self.require_key()?;

        let url = format!("{}/models", self.base_url);
        info!("auth check: key={} endpoint={}", self.api_key.masked(), url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(key)
            .header(ACCEPT, "application/json")
            .timeout(AUTH_CHECK_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        info!("auth check status: {}", status);

        if status.is_redirection() {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                warn!("auth check redirect: {}", location);
            }
        }

        if status.is_success() {
            return Ok(());
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(300)
            .collect();
        warn!("auth check body: {}", body);
        Err(GenerateError::Rejected { status, body })
    }

    /// Credential precondition, checked before every network call.
    fn require_key(&self) -> Result<&str, GenerateError> {
        match self.api_key.raw() {
            None => Err(GenerateError::MissingCredential),
            Some(key) if !key.starts_with(API_KEY_PREFIX) => {
                Err(GenerateError::MalformedCredential)
            }
            Some(key) => Ok(key),
        }
    }

    /// Walk the fallback chain: the `images` attachments first, then an
    /// inline data URL in the plain content. A malformed entry only skips
    /// itself; the remaining attachments in the same response still save.
    fn save_images(
        &self,
        message: &ChatMessage,
        base_name: &str,
    ) -> Result<Vec<String>, GenerateError> {
        let mut saved = Vec::new();

        let images = message.images.as_deref().unwrap_or(&[]);
        let multiple = images.len() > 1;
        for (idx, image) in images.iter().enumerate() {
            let Some(url) = image.resolved_url() else {
                continue;
            };
            if !url.starts_with("data:image") {
                continue;
            }
            match decode_image_data_url(url) {
                Ok(decoded) => {
                    let suffix = if multiple {
                        format!("_{}", idx + 1)
                    } else {
                        String::new()
                    };
                    let filename = format!("{base_name}{suffix}.{}", decoded.extension);
                    fs::write(self.output_dir.join(&filename), &decoded.bytes)?;
                    info!("saved: {}", filename);
                    saved.push(filename);
                }
                Err(e) => warn!("failed to decode image {}: {}", idx + 1, e),
            }
        }

        if !saved.is_empty() {
            return Ok(saved);
        }

        // Fallback: some responses inline a single data URL in content
        if let Some(content) = message.content_text() {
            if content.starts_with("data:image") {
                match decode_image_data_url(content) {
                    Ok(decoded) => {
                        let filename = format!("{base_name}.{}", decoded.extension);
                        fs::write(self.output_dir.join(&filename), &decoded.bytes)?;
                        info!("saved: {}", filename);
                        return Ok(vec![filename]);
                    }
                    Err(e) => warn!("failed to decode inline image: {}", e),
                }
            }
        }

        let preview: String = message
            .content_text()
            .unwrap_or_default()
            .chars()
            .take(120)
            .collect();
        warn!("no image data in response; assistant said: {}", preview);
        Err(GenerateError::NoImage { preview })
    }
}
