// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::Result;
use image_gen_node::api::{start_server, AppState};
use image_gen_node::config::AppConfig;
use image_gen_node::openrouter::OpenRouterClient;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("Starting image generation server...");
    println!("Version: {}", image_gen_node::version::VERSION);

    let config = Arc::new(AppConfig::from_env());
    if !config.api_key.is_well_formed() {
        // The server still starts so the UI can explain the problem, but
        // every generation request will be refused with a 400.
        warn!(
            "OPENROUTER_API_KEY missing or malformed (key={}); generation requests will fail",
            config.api_key.masked()
        );
    }

    let client = Arc::new(OpenRouterClient::new(&config)?);

    start_server(AppState { config, client }).await
}
