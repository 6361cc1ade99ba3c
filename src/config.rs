use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

/// Module used when a scrape request carries no `module` parameter.
pub const DEFAULT_MODULE: &str = "default";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub modules: HashMap<String, ModuleConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Credentials, proxy address and collector selection for one group of arrays.
#[derive(Debug, Deserialize, Clone)]
pub struct ModuleConfig {
    pub user: String,
    pub password: SecretString,
    pub proxy_url: String,
    /// Collectors to run; `None` or an empty list selects the default-enabled set.
    #[serde(default)]
    pub collectors: Option<Vec<String>>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Extra PEM root certificate trusted for `https` proxies.
    #[serde(default)]
    pub root_ca: Option<String>,
    #[serde(default)]
    pub insecure_ssl: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9313
}

fn default_timeout() -> u64 {
    10
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ESERIES_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject modules that could never produce a scrape
    pub fn validate(&self) -> std::result::Result<(), ExporterError> {
        for (name, module) in &self.modules {
            if module.proxy_url.trim().is_empty() {
                return Err(ExporterError::Config(format!(
                    "module {} has an empty proxy_url",
                    name
                )));
            }
            if module.timeout_seconds == 0 {
                return Err(ExporterError::Config(format!(
                    "module {} has a zero timeout_seconds",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.get(name)
    }
}
