//! NetApp E-Series Prometheus Exporter
//!
//! A multi-target Prometheus exporter for NetApp E-Series arrays managed through the
//! SANtricity Web Services Proxy.
//!
//! # Overview
//!
//! Every scrape of `/eseries?target=<system>&module=<module>` resolves the module's
//! credentials and proxy address, builds a fresh set of collectors for the storage system
//! and queries the proxy REST API. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   REST / basic auth  ┌──────────────────┐
//! │  Web        │ ◄─────────────────►  │    Exporter      │
//! │  Services   │   JSON over GET      │                  │
//! │  Proxy      │                      │  ┌────────────┐  │     HTTP      ┌────────────┐
//! └─────────────┘                      │  │ Collectors │  │ ◄───────────► │ Prometheus │
//!                                      │  └────────────┘  │   /eseries    └────────────┘
//!                                      │  ┌────────────┐  │
//!                                      │  │  Registry  │  │
//!                                      │  └────────────┘  │
//!                                      └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`eseries`] - proxy client, scrape target and API type definitions
//! - [`collectors`] - collector registry, per-scrape orchestrator and collectors
//! - [`metrics`] - metric encoding conventions and exporter metrics
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use eseries_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod eseries;
pub mod metrics;
pub mod server;
