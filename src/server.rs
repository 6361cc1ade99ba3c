//! HTTP Server
//!
//! This module implements the multi-target exporter endpoint and the exporter's own
//! endpoints.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server; every `/eseries` request is one scrape
//! - **Per-request collection**: the handler resolves the requested module into a
//!   [`Target`], builds a fresh [`EseriesCollector`] and renders it. Nothing is cached
//!   between requests.
//! - **State Management**: configuration and process metrics shared through `Arc`
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page
//! - `GET /eseries?target=<system>&module=<module>` - scrape one storage system
//! - `GET /metrics` - exporter process metrics
//! - `GET /health` - liveness probe
//!
//! # Error Handling
//!
//! Only request-level problems change the status code: a missing `target` or a root CA
//! that cannot be loaded is a 400, an unknown module or an unusable `proxy_url` is a 404.
//! Collector failures are reported inside the exposition and the scrape stays 200.

use crate::collectors::EseriesCollector;
use crate::config::{Config, DEFAULT_MODULE};
use crate::error::ExporterError;
use crate::eseries::Target;
use crate::metrics::{ExporterMetrics, UNKNOWN};
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    metrics: ExporterMetrics,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            metrics: ExporterMetrics::new()?,
        })
    }
}

/// Query parameters of a scrape request
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeParams {
    pub target: Option<String>,
    pub module: Option<String>,
}

/// Build the exporter router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/eseries", get(eseries_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let state = AppState::new(config)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Exporter listening on {}", addr);
    info!("Scrape endpoint available at http://{}/eseries", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Html(
        r#"<html>
<head><title>E-Series Exporter</title></head>
<body>
<h1>NetApp E-Series Prometheus Exporter</h1>
<p><a href="/eseries?target=array01&module=default">Example scrape</a></p>
<p><a href="/metrics">Exporter metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn eseries_handler(
    State(state): State<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Response {
    let module = params
        .module
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());

    let response = scrape(&state.config, &module, params.target.as_deref()).await;

    // Only configured module names become label values
    let label = if state.config.module(&module).is_some() {
        module.as_str()
    } else {
        UNKNOWN
    };
    state
        .metrics
        .observe_scrape(label, response.status().as_u16());

    response
}

async fn scrape(config: &Config, module_name: &str, target: Option<&str>) -> Response {
    let Some(target_name) = target.filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            "'target' parameter must be specified",
        )
            .into_response();
    };

    let Some(module) = config.module(module_name) else {
        error!("Unknown module {}", module_name);
        return (
            StatusCode::NOT_FOUND,
            format!("Unknown module {}", module_name),
        )
            .into_response();
    };

    let target = match Target::from_module(target_name, module).await {
        Ok(target) => target,
        Err(e) => {
            error!("Unable to prepare target {}: {}", target_name, e);
            return (target_error_status(&e), e.to_string()).into_response();
        }
    };

    debug!("Scraping {} with module {}", target_name, module_name);

    let collector = match EseriesCollector::new(target) {
        Ok(collector) => collector,
        Err(e) => {
            error!("Failed to build collectors for {}: {}", target_name, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match collector.scrape().await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to render metrics for {}: {}", target_name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Status code for a target that could not be prepared
pub fn target_error_status(err: &ExporterError) -> StatusCode {
    match err {
        ExporterError::InvalidUrl(_) => StatusCode::NOT_FOUND,
        ExporterError::Tls(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], metrics).into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_error_status() {
        assert_eq!(
            target_error_status(&ExporterError::InvalidUrl("::".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            target_error_status(&ExporterError::Tls("bad pem".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            target_error_status(&ExporterError::EmptyResult("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
