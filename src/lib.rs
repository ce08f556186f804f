// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod batch;
pub mod config;
pub mod openrouter;
pub mod version;

// Re-export main types
pub use api::{router, start_server, ApiError, AppState, ErrorResponse, GenerateResponse};
pub use batch::{BatchConfig, BatchRunner, BatchSummary};
pub use config::{ApiKey, AppConfig, API_KEY_PREFIX};
pub use openrouter::{GenerateError, OpenRouterClient};
