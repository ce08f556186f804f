// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation response types

use serde::{Deserialize, Serialize};

/// Response from POST /api/generate: the filenames written plus the URLs
/// they are served under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub images: Vec<String>,
    pub urls: Vec<String>,
}

impl GenerateResponse {
    /// Build the response for a set of saved filenames.
    pub fn from_filenames(images: Vec<String>) -> Self {
        let urls = images
            .iter()
            .map(|name| format!("/generated-images/{name}"))
            .collect();
        Self { images, urls }
    }
}
