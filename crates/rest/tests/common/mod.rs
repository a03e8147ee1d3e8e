//! Common test utilities for REST API testing.
//!
//! Builds a [`TestServer`] over in-memory SQLite stores and seeds entities
//! through the API itself.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use bon_content_persistence::ContentIndex;
use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
use bon_content_rest::{ServerConfig, create_app_with_config};
use serde_json::{Value, json};

/// Lower-cased application name, as it appears in header names.
pub const APP: &str = "boncontentserviceapp";

pub fn alert_header() -> String {
    format!("x-{}-alert", APP)
}

pub fn params_header() -> String {
    format!("x-{}-params", APP)
}

pub fn error_header() -> String {
    format!("x-{}-error", APP)
}

pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to init schema");
    backend
}

pub fn create_index() -> SqliteSearchIndex {
    let index = SqliteSearchIndex::in_memory().expect("Failed to create search index");
    index.init_schema().expect("Failed to init index schema");
    index
}

/// Creates a test server over a fresh store and index.
pub fn create_test_server() -> TestServer {
    create_test_server_with_index(create_index())
}

/// Creates a test server over a fresh store and the given index.
pub fn create_test_server_with_index<I: ContentIndex>(index: I) -> TestServer {
    let config = ServerConfig {
        base_url: "http://localhost:8080".to_string(),
        ..ServerConfig::for_testing()
    };
    let app = create_app_with_config(Arc::new(create_backend()), Arc::new(index), config);
    TestServer::new(app).expect("Failed to create test server")
}

/// Posts `body` and returns the assigned id.
pub async fn create(server: &TestServer, plural: &str, body: Value) -> i64 {
    let response = server.post(&format!("/api/{}", plural)).json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"]
        .as_i64()
        .expect("created entity has an id")
}

pub async fn create_story(server: &TestServer, name: &str) -> i64 {
    create(server, "stories", json!({"category": "NEWS", "name": name})).await
}

pub async fn create_tag(server: &TestServer, name: &str) -> i64 {
    create(server, "tags", json!({"name": name})).await
}

pub async fn create_fragment(
    server: &TestServer,
    story: i64,
    name: &str,
    width: Option<i32>,
    tags: &[i64],
) -> i64 {
    let tags: Vec<Value> = tags.iter().map(|id| json!({"id": id})).collect();
    create(
        server,
        "fragments",
        json!({
            "template": "V1",
            "name": name,
            "orderNo": 1,
            "width": width,
            "story": {"id": story},
            "tags": tags
        }),
    )
    .await
}

/// Ids of a JSON array of entities, in order.
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .filter_map(|entity| entity["id"].as_i64())
        .collect()
}
