use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    /// Backend answered with a non-200 status; carries the drained body.
    #[error("Web Services Proxy returned HTTP {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Duplicate drive entry at tray {tray} slot {slot}")]
    DuplicateEntity { tray: String, slot: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
