// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for POST /api/generate (JSON and multipart forms)

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use image_gen_node::api::{router, AppState};
use image_gen_node::config::AppConfig;
use image_gen_node::openrouter::OpenRouterClient;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::support::{
    chat_body_with_content, chat_body_with_images, data_url, spawn_upstream, test_config,
    TEST_KEY,
};

fn app_for(config: AppConfig) -> Router {
    let config = Arc::new(config);
    let client = Arc::new(OpenRouterClient::new(&config).unwrap());
    router(AppState { config, client })
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

async fn post_multipart(app: Router, content_type: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

/// Build a multipart body by hand; `filename` turns a part into a file
/// upload.
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> (String, String) {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body = String::new();
    for (name, filename, value) in parts {
        body.push_str(&format!("--{boundary}\r\n"));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

#[tokio::test]
async fn test_json_generate_success() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(
        200,
        200,
        chat_body_with_images(&[data_url("image/png", b"hero-bytes")]),
    )
    .await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "prompt": "a hooded assassin", "name": "hero" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"], json!(["hero.png"]));
    assert_eq!(body["urls"], json!(["/generated-images/hero.png"]));
    assert!(output.path().join("hero.png").exists());
    assert_eq!(upstream.chat_calls(), 1);
}

#[tokio::test]
async fn test_json_generate_defaults_base_name() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(
        200,
        200,
        chat_body_with_images(&[data_url("image/png", b"bytes")]),
    )
    .await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "prompt": "a castle" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"], json!(["image.png"]));
}

#[tokio::test]
async fn test_json_without_prompt_is_400_and_no_upstream_call() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(200, 200, chat_body_with_content("unused")).await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "name": "hero" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No prompt"));
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test]
async fn test_json_with_blank_prompt_is_400() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(200, 200, chat_body_with_content("unused")).await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, _) = post_json(app, json!({ "prompt": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test]
async fn test_invalid_credential_is_400_before_any_network_call() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(200, 200, chat_body_with_content("unused")).await;
    let app = app_for(test_config(
        &upstream.base_url,
        "sk-proj-wrong-provider",
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "prompt": "a valid prompt" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("OPENROUTER_API_KEY"));
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test]
async fn test_upstream_without_images_is_502() {
    let output = TempDir::new().unwrap();
    let upstream =
        spawn_upstream(200, 200, chat_body_with_content("sorry, text only today")).await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "prompt": "a castle" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "No images returned from model.");
}

#[tokio::test]
async fn test_upstream_rejection_is_502() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(200, 429, json!({ "error": "rate limited" })).await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (status, body) = post_json(app, json!({ "prompt": "a castle" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("429"));
}

#[tokio::test]
async fn test_multipart_file_upload_uses_stem_as_base_name() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(
        200,
        200,
        chat_body_with_images(&[data_url("image/png", b"bytes")]),
    )
    .await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (content_type, body) = multipart_body(&[(
        "prompt_file",
        Some("midnight_keep.txt"),
        "A keep under a blood moon",
    )]);
    let (status, response) = post_multipart(app, &content_type, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["images"], json!(["midnight_keep.png"]));
    assert_eq!(upstream.chat_calls(), 1);
}

#[tokio::test]
async fn test_multipart_fields_override_uploaded_file() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(
        200,
        200,
        chat_body_with_images(&[data_url("image/png", b"bytes")]),
    )
    .await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (content_type, body) = multipart_body(&[
        ("prompt_file", Some("original.txt"), "file prompt"),
        ("prompt", None, "field prompt wins"),
        ("name", None, "override"),
    ]);
    let (status, response) = post_multipart(app, &content_type, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["images"], json!(["override.png"]));
}

#[tokio::test]
async fn test_multipart_without_any_prompt_is_400() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(200, 200, chat_body_with_content("unused")).await;
    let app = app_for(test_config(
        &upstream.base_url,
        TEST_KEY,
        Path::new("unused"),
        output.path(),
    ));

    let (content_type, body) = multipart_body(&[("name", None, "lonely-name")]);
    let (status, response) = post_multipart(app, &content_type, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("No prompt"));
    assert_eq!(upstream.chat_calls(), 0);
}

#[tokio::test]
async fn test_generated_file_round_trips_through_static_route() {
    let output = TempDir::new().unwrap();
    let upstream = spawn_upstream(
        200,
        200,
        chat_body_with_images(&[data_url("image/png", b"served-bytes")]),
    )
    .await;
    let config = test_config(&upstream.base_url, TEST_KEY, Path::new("unused"), output.path());
    let app = app_for(config.clone());

    let (status, body) = post_json(app, json!({ "prompt": "a castle", "name": "served" })).await;
    assert_eq!(status, StatusCode::OK);
    let url = body["urls"][0].as_str().unwrap().to_string();

    let app = app_for(config);
    let response = app
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"served-bytes");
    assert_eq!(fs::read(output.path().join("served.png")).unwrap(), b"served-bytes");
}
