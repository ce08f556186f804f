// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tolerant response types for the chat-completions endpoint
//!
//! Providers are inconsistent about which optional fields they populate, so
//! every lookup returns an absent marker instead of failing the whole parse.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatMessage {
    /// Plain content; may be a string, an array, or absent depending on the
    /// provider, so it is kept as raw JSON until queried.
    #[serde(default)]
    pub content: Option<serde_json::Value>,

    /// Image attachments, the preferred transport for generated images.
    #[serde(default)]
    pub images: Option<Vec<MessageImage>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageImage {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub image_url: Option<ImageUrl>,

    /// Some providers put the URL directly on the entry.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageUrl {
    #[serde(default)]
    pub url: Option<String>,
}

impl ChatResponse {
    /// The first choice's message, or an empty one when the response carries
    /// no choices at all.
    pub fn into_first_message(self) -> ChatMessage {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .unwrap_or_default()
    }
}

impl ChatMessage {
    /// The textual content, when the provider sent a plain string.
    pub fn content_text(&self) -> Option<&str> {
        self.content.as_ref().and_then(|value| value.as_str())
    }
}

impl MessageImage {
    /// Resolve the URL for this entry: the `image_url` envelope when the
    /// entry is typed as one, the bare `url` field otherwise.
    pub fn resolved_url(&self) -> Option<&str> {
        if self.kind.as_deref() == Some("image_url") {
            self.image_url.as_ref().and_then(|envelope| envelope.url.as_deref())
        } else {
            self.url.as_deref()
        }
    }
}
