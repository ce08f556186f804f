// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inline base64 image payload decoding
//!
//! OpenRouter transports generated images as data URLs inside the JSON
//! response, e.g. `data:image/png;base64,iVBOR...`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("not an inline image data URL")]
    NotAnImage,

    #[error("data URL has no payload after the media-type header")]
    MissingPayload,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded image together with the file extension its declared media type
/// maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Decode a `data:image/...;base64,` URL into raw bytes.
///
/// Unrecognized media types still decode; they just fall back to the `png`
/// extension.
pub fn decode_image_data_url(url: &str) -> Result<DecodedImage, DataUrlError> {
    if !url.starts_with("data:image") {
        return Err(DataUrlError::NotAnImage);
    }
    let (header, payload) = url.split_once(',').ok_or(DataUrlError::MissingPayload)?;
    let bytes = BASE64.decode(payload.trim())?;
    Ok(DecodedImage {
        extension: extension_for(header),
        bytes,
    })
}

fn extension_for(header: &str) -> &'static str {
    if header.contains("image/png") {
        "png"
    } else if header.contains("image/jpeg") || header.contains("image/jpg") {
        "jpg"
    } else {
        "png"
    }
}
