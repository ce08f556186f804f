// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for inline base64 data URL decoding

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image_gen_node::openrouter::{decode_image_data_url, DataUrlError};

fn encode(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, BASE64.encode(bytes))
}

#[test]
fn test_png_media_type_maps_to_png_extension() {
    let decoded = decode_image_data_url(&encode("image/png", b"png-bytes")).unwrap();
    assert_eq!(decoded.extension, "png");
    assert_eq!(decoded.bytes, b"png-bytes");
}

#[test]
fn test_jpeg_media_type_maps_to_jpg_extension() {
    let decoded = decode_image_data_url(&encode("image/jpeg", b"jpeg-bytes")).unwrap();
    assert_eq!(decoded.extension, "jpg");
}

#[test]
fn test_jpg_media_type_maps_to_jpg_extension() {
    let decoded = decode_image_data_url(&encode("image/jpg", b"jpg-bytes")).unwrap();
    assert_eq!(decoded.extension, "jpg");
}

#[test]
fn test_unrecognized_media_type_defaults_to_png() {
    let decoded = decode_image_data_url(&encode("image/webp", b"webp-bytes")).unwrap();
    assert_eq!(decoded.extension, "png");
    assert_eq!(decoded.bytes, b"webp-bytes");
}

#[test]
fn test_non_image_url_is_rejected() {
    assert_eq!(
        decode_image_data_url("https://example.com/cat.png"),
        Err(DataUrlError::NotAnImage)
    );
}

#[test]
fn test_non_image_data_url_is_rejected() {
    assert_eq!(
        decode_image_data_url("data:text/plain;base64,aGVsbG8="),
        Err(DataUrlError::NotAnImage)
    );
}

#[test]
fn test_missing_payload_separator() {
    assert_eq!(
        decode_image_data_url("data:image/png;base64"),
        Err(DataUrlError::MissingPayload)
    );
}

#[test]
fn test_malformed_base64_payload() {
    let result = decode_image_data_url("data:image/png;base64,!!!not-base64!!!");
    assert!(matches!(result, Err(DataUrlError::Base64(_))));
}

#[test]
fn test_payload_with_trailing_whitespace_decodes() {
    let url = format!("data:image/png;base64,{}\n", BASE64.encode(b"bytes"));
    let decoded = decode_image_data_url(&url).unwrap();
    assert_eq!(decoded.bytes, b"bytes");
}
