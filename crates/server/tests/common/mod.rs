//! Common test utilities for in-process server tests.
//!
//! `TestFixture` builds the real router over a temporary videos directory,
//! so requests go through routing, extractors and layers without binding a
//! socket.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use netflox_core::Config;
use netflox_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use netflox_core::testing::fixtures;

/// Test fixture with a router and its videos directory.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list() {
///     let fixture = TestFixture::new();
///     fixture.add_video("550.mkv", b"data");
///
///     let response = fixture.get("/api/videos").await;
///     assert_eq!(response.json(), serde_json::json!(["550.mkv"]));
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    pub videos_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a fixture, letting the caller adjust the configuration. The
    /// videos directory always points at the fixture's temp dir.
    pub fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let videos_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        customize(&mut config);
        config.library.videos_dir = videos_dir.path().to_path_buf();

        let state = Arc::new(AppState::new(config));
        let router = create_router(state);

        Self { router, videos_dir }
    }

    pub fn videos_path(&self) -> &Path {
        self.videos_dir.path()
    }

    /// Write a file into the videos directory.
    pub fn add_video(&self, name: &str, content: &[u8]) {
        std::fs::write(self.videos_dir.path().join(name), content)
            .expect("Failed to write video fixture");
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, &[]).await
    }

    /// Send a GET request with a `Range` header.
    pub async fn get_range(&self, path: &str, range: &str) -> TestResponse {
        self.request("GET", path, &[("range", range)]).await
    }

    /// Send a HEAD request.
    pub async fn head(&self, path: &str) -> TestResponse {
        self.request("HEAD", path, &[]).await
    }

    pub async fn request(&self, method: &str, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
