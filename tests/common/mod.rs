//! Shared helpers for integration tests
//!
//! Provides a throwaway Web Services Proxy serving JSON fixtures and a few helpers to
//! inspect rendered Prometheus text.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use eseries_exporter::eseries::Target;
use reqwest::Url;
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage system name used by every test target
pub const SYSTEM: &str = "test";

/// `Authorization` header for `test:test`
const BASIC_AUTH: &str = "Basic dGVzdDp0ZXN0";

/// Full proxy path of a storage system resource, e.g. `/hardware-inventory`
pub fn system_path(resource: &str) -> String {
    format!("/devmgr/v2/storage-systems/{}{}", SYSTEM, resource)
}

pub fn fixture(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Every resource of the storage system mapped to its default fixture
pub fn full_proxy() -> Vec<(&'static str, &'static str)> {
    vec![
        ("", "storage-system.json"),
        ("/hardware-inventory", "hardware-inventory.json"),
        ("/storage-pools", "storage-pools.json"),
        ("/volumes", "volumes.json"),
        (
            "/analysed-controller-statistics",
            "analysed-controller-statistics.json",
        ),
        ("/analysed-drive-statistics", "analysed-drive-statistics.json"),
        (
            "/analysed-system-statistics",
            "analysed-system-statistics.json",
        ),
    ]
}

#[derive(Clone)]
struct ProxyState {
    bodies: Arc<HashMap<String, String>>,
}

async fn serve_fixture(State(state): State<ProxyState>, uri: Uri, headers: HeaderMap) -> Response {
    let header_is = |name: header::HeaderName, expected: &str| {
        headers.get(name).and_then(|v| v.to_str().ok()) == Some(expected)
    };

    if !header_is(header::AUTHORIZATION, BASIC_AUTH) {
        return (StatusCode::UNAUTHORIZED, "missing credentials\n").into_response();
    }
    if !header_is(header::ACCEPT, "application/json") {
        return (StatusCode::NOT_ACCEPTABLE, "json only\n").into_response();
    }

    match state.bodies.get(uri.path()) {
        Some(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "error\n").into_response(),
    }
}

/// Start a proxy serving `resources` as `(resource, fixture file)` pairs
///
/// Unknown paths answer 404. Requests without the test credentials or the JSON
/// `Accept` header are rejected.
pub async fn spawn_proxy(resources: &[(&str, &str)]) -> Url {
    let bodies = resources
        .iter()
        .map(|(resource, file)| (system_path(resource), fixture(file)))
        .collect();

    let app = Router::new().fallback(serve_fixture).with_state(ProxyState {
        bodies: Arc::new(bodies),
    });
    serve(app).await
}

/// Start a proxy that answers 500 to every request
pub async fn spawn_failing_proxy() -> Url {
    let app = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error\n")
    });
    serve(app).await
}

/// Bind `app` on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr).parse().expect("Invalid test URL")
}

pub fn target(base_url: Url, collectors: &[&str]) -> Target {
    Target::new(
        SYSTEM,
        "test",
        SecretString::from("test"),
        base_url,
        Some(collectors.iter().map(|c| c.to_string()).collect()),
        reqwest::Client::new(),
    )
}

/// Sample lines of a text exposition (no comments, no blank lines)
pub fn series(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Number of samples of metric `name`
pub fn count(text: &str, name: &str) -> usize {
    series(text)
        .into_iter()
        .filter(|line| metric_name(line) == name)
        .count()
}

/// Value of the sample of `name` carrying every `(label, value)` pair, in any order
pub fn sample(text: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    series(text).into_iter().find_map(|line| {
        if metric_name(line) != name {
            return None;
        }
        let (head, value) = line.rsplit_once(' ')?;
        let matches = labels.iter().all(|(k, v)| {
            let pair = format!("{}=\"{}\"", k, v);
            head.contains(&format!("{{{}", pair)) || head.contains(&format!(",{}", pair))
        });
        if matches {
            value.parse().ok()
        } else {
            None
        }
    })
}

fn metric_name(line: &str) -> &str {
    line.split(['{', ' ']).next().unwrap_or_default()
}
