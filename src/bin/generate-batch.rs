// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use image_gen_node::batch::{BatchConfig, BatchRunner};
use image_gen_node::config::AppConfig;
use image_gen_node::openrouter::OpenRouterClient;

/// Generate images for every prompt file in a directory
#[derive(Parser, Debug)]
#[command(name = "generate-batch")]
#[command(about = "Run one image generation request per *.txt prompt file", long_about = None)]
struct Args {
    /// Directory containing *.txt prompt files
    #[arg(long, env = "PROMPTS_DIR", default_value = "image-prompts")]
    prompts_dir: PathBuf,

    /// Directory to write generated images into
    #[arg(long, env = "OUTPUT_DIR", default_value = "generated-images")]
    output_dir: PathBuf,

    /// Seconds to wait between requests, to respect API rate limits
    #[arg(long, default_value_t = 2)]
    delay: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    config.prompts_dir = args.prompts_dir;
    config.output_dir = args.output_dir;

    println!("Model: {}", config.model);
    println!("Prompts directory: {}", config.prompts_dir.display());
    println!("Output directory: {}", config.output_dir.display());

    let client = OpenRouterClient::new(&config)?;
    let batch_config = BatchConfig {
        prompts_dir: config.prompts_dir.clone(),
        request_delay: Duration::from_secs(args.delay),
    };

    match BatchRunner::new(client, batch_config).run().await {
        Ok(summary) => {
            println!(
                "Complete! Success: {}, Failed: {}",
                summary.succeeded, summary.failed
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
