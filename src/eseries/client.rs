//! Web Services Proxy REST Client
//!
//! This module resolves a scrape request into a [`Target`] and performs the authenticated
//! GET requests every collector relies on.
//!
//! # Architecture
//!
//! - **Transport**: `reqwest` client built per scrape, carrying the module timeout and,
//!   for `https` proxies, the module's TLS options
//! - **Authentication**: HTTP basic auth with the module credentials
//! - **Protocol**: plain JSON over `GET`, one request per resource
//!
//! # Example
//!
//! ```no_run
//! use eseries_exporter::eseries::{fetch_json, Target};
//! use eseries_exporter::eseries::types::StorageSystem;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let target = Target::new(
//!     "array01",
//!     "monitor",
//!     SecretString::from("secret"),
//!     "http://proxy.local:8080".parse()?,
//!     None,
//!     reqwest::Client::new(),
//! );
//! let system: StorageSystem = fetch_json(&target, &target.system_path("")).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ModuleConfig;
use crate::error::{ExporterError, Result};
use reqwest::{header, Certificate, Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, error};

/// Resolved backend for one scrape request
///
/// Owned by the request that built it; collectors hold it behind an `Arc` and it is
/// dropped with them once the response is written.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub user: String,
    pub password: SecretString,
    pub base_url: Url,
    pub collectors: Option<Vec<String>>,
    pub client: Client,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        user: impl Into<String>,
        password: SecretString,
        base_url: Url,
        collectors: Option<Vec<String>>,
        client: Client,
    ) -> Self {
        Self {
            name: name.into(),
            user: user.into(),
            password,
            base_url,
            collectors,
            client,
        }
    }

    /// Build the target for storage system `name` from a configured module
    ///
    /// # Errors
    ///
    /// * [`ExporterError::InvalidUrl`] - `proxy_url` does not parse
    /// * [`ExporterError::Tls`] - the root CA cannot be read or is not valid PEM
    pub async fn from_module(name: &str, module: &ModuleConfig) -> Result<Self> {
        let base_url = Url::parse(&module.proxy_url)
            .map_err(|e| ExporterError::InvalidUrl(format!("{}: {}", module.proxy_url, e)))?;

        let mut builder = Client::builder().timeout(Duration::from_secs(module.timeout_seconds));

        if base_url.scheme() == "https" {
            debug!("Setting up TLS transport for {}", module.proxy_url);
            builder = builder.danger_accept_invalid_certs(module.insecure_ssl);
            if let Some(root_ca) = &module.root_ca {
                let pem = tokio::fs::read(root_ca).await.map_err(|e| {
                    error!("Error loading root CA {}: {}", root_ca, e);
                    ExporterError::Tls(format!("unable to read root CA {}: {}", root_ca, e))
                })?;
                let cert = Certificate::from_pem(&pem).map_err(|e| {
                    error!("Error parsing root CA {}: {}", root_ca, e);
                    ExporterError::Tls(format!("invalid root CA {}: {}", root_ca, e))
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }

        let client = builder
            .build()
            .map_err(|e| ExporterError::Tls(format!("unable to build HTTP client: {}", e)))?;

        Ok(Self::new(
            name,
            module.user.clone(),
            module.password.clone(),
            base_url,
            module.collectors.clone(),
            client,
        ))
    }

    /// Path of a resource below this storage system, e.g. `/hardware-inventory`
    ///
    /// The system name is percent-encoded so `?`, `#` or `/` in a target cannot
    /// redirect the request to another resource.
    pub fn system_path(&self, resource: &str) -> String {
        format!(
            "/devmgr/v2/storage-systems/{}{}",
            urlencoding::encode(&self.name),
            resource
        )
    }
}

/// Perform one authenticated GET against the proxy and return the raw body
///
/// The body is always read to the end before the status is inspected, so the
/// connection goes back to the pool on every path.
///
/// # Errors
///
/// * [`ExporterError::InvalidUrl`] - `path` cannot be joined to the base URL
/// * [`ExporterError::Http`] - transport failure, timeout or body read failure
/// * [`ExporterError::Fetch`] - any status other than 200, carrying the body
pub async fn fetch(target: &Target, path: &str) -> Result<Vec<u8>> {
    let url = target
        .base_url
        .join(path)
        .map_err(|e| ExporterError::InvalidUrl(format!("{}: {}", path, e)))?;

    debug!("Performing GET request to {}", readable_url(&url));

    let response = target
        .client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .basic_auth(&target.user, Some(target.password.expose_secret()))
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if status != StatusCode::OK {
        let body = String::from_utf8_lossy(&body).into_owned();
        error!("Response error: code={} body={}", status.as_u16(), body);
        return Err(ExporterError::Fetch {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body.to_vec())
}

/// [`fetch`] followed by JSON decoding into `T`
pub async fn fetch_json<T>(target: &Target, path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = fetch(target, path).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Percent-decoded form of `url` for log lines, falling back to the escaped form
pub fn readable_url(url: &Url) -> Cow<'_, str> {
    match urlencoding::decode(url.as_str()) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("Failed to unescape URL {}: {}", url, e);
            Cow::Borrowed(url.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(base: &str) -> Target {
        Target::new(
            "array 01",
            "monitor",
            SecretString::from("secret"),
            base.parse().expect("valid url"),
            None,
            Client::new(),
        )
    }

    #[test]
    fn test_system_path_includes_target_name() {
        let t = target("http://proxy:8080");
        assert_eq!(
            t.system_path("/volumes"),
            "/devmgr/v2/storage-systems/array%2001/volumes"
        );
        assert_eq!(t.system_path(""), "/devmgr/v2/storage-systems/array%2001");
    }

    #[test]
    fn test_system_path_keeps_resource_after_reserved_characters() {
        // Given: A target name containing URL delimiters
        let mut t = target("http://proxy:8080");
        t.name = "array#1?x=/y".to_string();

        // When: Joining a resource path to the base URL
        let url = t.base_url.join(&t.system_path("/volumes")).unwrap();

        // Then: The resource is still the last path segment and nothing leaks into query or fragment
        assert_eq!(
            url.path(),
            "/devmgr/v2/storage-systems/array%231%3Fx%3D%2Fy/volumes"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_readable_url_unescapes_path() {
        let t = target("http://proxy:8080/base/");
        let url = t.base_url.join(&t.system_path("")).unwrap();
        assert_eq!(
            readable_url(&url),
            "http://proxy:8080/devmgr/v2/storage-systems/array 01"
        );
    }

    #[test]
    fn test_readable_url_falls_back_on_invalid_utf8() {
        let url: Url = "http://proxy:8080/%FF%FE".parse().unwrap();
        assert_eq!(readable_url(&url), "http://proxy:8080/%FF%FE");
    }
}
