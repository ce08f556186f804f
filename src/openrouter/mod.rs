// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenRouter chat-completions client for image generation

pub mod client;
pub mod data_url;
pub mod error;
pub mod response;

pub use client::OpenRouterClient;
pub use data_url::{decode_image_data_url, DataUrlError, DecodedImage};
pub use error::GenerateError;
pub use response::{ChatMessage, ChatResponse, MessageImage};
