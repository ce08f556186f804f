// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch driver: one generation request per prompt file, strictly sequential

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::openrouter::OpenRouterClient;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for `*.txt` prompt files
    pub prompts_dir: PathBuf,
    /// Pause between consecutive generation requests, to respect rate limits
    pub request_delay: Duration,
}

impl BatchConfig {
    pub fn new(prompts_dir: PathBuf) -> Self {
        Self {
            prompts_dir,
            request_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs every prompt file through the image requester, accumulating a tally
/// instead of aborting on individual failures.
pub struct BatchRunner {
    client: OpenRouterClient,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(client: OpenRouterClient, config: BatchConfig) -> Self {
        Self { client, config }
    }

    /// Process the whole prompts directory.
    ///
    /// The auth probe runs once up front; if it fails the batch aborts
    /// before any generation call is spent. After that, a failed prompt only
    /// increments the failure tally.
    pub async fn run(&self) -> Result<BatchSummary> {
        if let Err(e) = self.client.check_auth().await {
            bail!("auth check failed, aborting batch: {e}");
        }

        let prompt_files = self.discover_prompts()?;
        if prompt_files.is_empty() {
            info!(
                "no prompt files found in {}",
                self.config.prompts_dir.display()
            );
            return Ok(BatchSummary::default());
        }

        info!("found {} prompt files", prompt_files.len());

        let mut summary = BatchSummary::default();
        for path in &prompt_files {
            let base_name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("image");

            let prompt = match fs::read_to_string(path) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!("failed to read {}: {}", path.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            match self.client.generate(&prompt, base_name).await {
                Ok(files) => {
                    info!("{}: saved {}", base_name, files.join(", "));
                    summary.succeeded += 1;
                }
                Err(e) => {
                    warn!("{}: {}", base_name, e);
                    summary.failed += 1;
                }
            }

            // Rate limiting: wait between requests to avoid API limits
            sleep(self.config.request_delay).await;
        }

        info!(
            "complete! success: {}, failed: {}",
            summary.succeeded, summary.failed
        );
        Ok(summary)
    }

    /// `*.txt` files in the prompts directory, sorted for deterministic order.
    fn discover_prompts(&self) -> Result<Vec<PathBuf>> {
        let mut prompt_files: Vec<PathBuf> = fs::read_dir(&self.config.prompts_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
            .collect();
        prompt_files.sort();
        Ok(prompt_files)
    }
}
