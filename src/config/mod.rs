// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration, built once at startup and injected everywhere else

use std::env;
use std::path::PathBuf;

/// Every OpenRouter API key carries this prefix; anything else is rejected
/// before a single byte goes on the wire.
pub const API_KEY_PREFIX: &str = "sk-or-v1-";

/// Bearer token for OpenRouter, read once from the environment.
#[derive(Debug, Clone)]
pub struct ApiKey(Option<String>);

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()))
    }

    pub fn from_env() -> Self {
        Self::new(env::var("OPENROUTER_API_KEY").ok())
    }

    /// The raw key, if one was configured at all.
    pub fn raw(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Present and matching the known OpenRouter prefix.
    pub fn is_well_formed(&self) -> bool {
        matches!(&self.0, Some(key) if key.starts_with(API_KEY_PREFIX))
    }

    /// Redacted rendering safe for logs.
    pub fn masked(&self) -> String {
        match &self.0 {
            None => "<missing>".to_string(),
            Some(key) if key.len() < 5 => "***".to_string(),
            Some(key) if key.len() <= 10 => format!("{}...{}", &key[..3], &key[key.len() - 2..]),
            Some(key) => format!("{}...{}", &key[..8], &key[key.len() - 6..]),
        }
    }
}

/// Configuration for both binaries. Constructed from the environment (after
/// `.env` has been loaded) and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: ApiKey,
    /// OpenRouter API base, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    /// Model asked to produce the images
    pub model: String,
    /// Directory scanned for `*.txt` prompt files
    pub prompts_dir: PathBuf,
    /// Directory generated images are written into
    pub output_dir: PathBuf,
    /// Directory holding the static browser UI
    pub web_dir: PathBuf,
    /// HTTP facade listen port
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());
        let model = env::var("IMAGE_MODEL")
            .unwrap_or_else(|_| "google/gemini-2.5-flash-image".to_string());
        let prompts_dir = env::var("PROMPTS_DIR").unwrap_or_else(|_| "image-prompts".to_string());
        let output_dir = env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated-images".to_string());
        let web_dir = env::var("WEB_DIR").unwrap_or_else(|_| "web".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        Self {
            api_key: ApiKey::from_env(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            prompts_dir: PathBuf::from(prompts_dir),
            output_dir: PathBuf::from(output_dir),
            web_dir: PathBuf::from(web_dir),
            port,
        }
    }
}
