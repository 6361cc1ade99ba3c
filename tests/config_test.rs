//! Configuration loading tests
//!
//! Tests that verify TOML loading, defaults and module lookup.

use eseries_exporter::config::{Config, ServerConfig, DEFAULT_MODULE};
use secrecy::ExposeSecret;
use std::path::PathBuf;

/// Write `contents` to a unique TOML file under the system temp dir
fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "eseries-exporter-{}-{}.toml",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("Failed to write config");
    path
}

fn load(path: &PathBuf) -> anyhow::Result<Config> {
    Config::load(path.to_str().expect("Non UTF-8 temp path"))
}

#[test]
fn test_default_server_config() {
    // Given: ServerConfig defaults
    let config = ServerConfig::default();

    // Then: Should listen on all interfaces on the exporter port
    assert_eq!(config.addr, "0.0.0.0");
    assert_eq!(config.port, 9313);
}

#[test]
fn test_load_modules_with_defaults() {
    // Given: A config file with one minimal and one fully specified module
    let path = write_config(
        "modules",
        r#"
[server]
port = 9400

[modules.default]
user = "monitor"
password = "secret"
proxy_url = "http://proxy:8080"

[modules.secure]
user = "admin"
password = "hunter2"
proxy_url = "https://proxy:8443"
collectors = ["drives", "volumes"]
timeout_seconds = 30
root_ca = "/etc/ssl/proxy-ca.pem"
insecure_ssl = true
"#,
    );

    // When: Loading it
    let config = load(&path).expect("Failed to load config");
    std::fs::remove_file(&path).ok();

    // Then: Server overrides apply and missing module fields take defaults
    assert_eq!(config.server.port, 9400);
    assert_eq!(config.server.addr, "0.0.0.0");

    let default = config.module(DEFAULT_MODULE).expect("default module");
    assert_eq!(default.user, "monitor");
    assert_eq!(default.password.expose_secret(), "secret");
    assert_eq!(default.timeout_seconds, 10);
    assert!(default.collectors.is_none());
    assert!(default.root_ca.is_none());
    assert!(!default.insecure_ssl);

    let secure = config.module("secure").expect("secure module");
    assert_eq!(
        secure.collectors.as_deref(),
        Some(&["drives".to_string(), "volumes".to_string()][..])
    );
    assert_eq!(secure.timeout_seconds, 30);
    assert_eq!(secure.root_ca.as_deref(), Some("/etc/ssl/proxy-ca.pem"));
    assert!(secure.insecure_ssl);

    assert!(config.module("missing").is_none());
}

#[test]
fn test_missing_file_yields_empty_config() {
    // Given: A path that does not exist
    let path = std::env::temp_dir().join("eseries-exporter-does-not-exist.toml");

    // When: Loading it
    let config = load(&path).expect("Missing file should not be an error");

    // Then: Defaults and no modules
    assert_eq!(config.server.port, 9313);
    assert!(config.modules.is_empty());
}

#[test]
fn test_module_missing_credentials_is_rejected() {
    // Given: A module without a password
    let path = write_config(
        "invalid",
        r#"
[modules.default]
user = "monitor"
proxy_url = "http://proxy:8080"
"#,
    );

    // When: Loading it
    let result = load(&path);
    std::fs::remove_file(&path).ok();

    // Then: Deserialization fails with context
    let err = result.expect_err("password is required");
    assert!(format!("{:#}", err).contains("Failed to deserialize configuration"));
}

#[test]
fn test_debug_output_redacts_password() {
    let path = write_config(
        "redact",
        r#"
[modules.default]
user = "monitor"
password = "super-secret-password"
proxy_url = "http://proxy:8080"
"#,
    );
    let config = load(&path).expect("Failed to load config");
    std::fs::remove_file(&path).ok();

    let debug = format!("{:?}", config);
    assert!(!debug.contains("super-secret-password"));
}

#[test]
fn test_shipped_default_config_loads() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "config", "Default.toml"]
        .iter()
        .collect();

    let config = load(&path).expect("Shipped config must load");
    assert!(config.module(DEFAULT_MODULE).is_some());
}

#[test]
fn test_zero_timeout_is_rejected() {
    // Given: A module that would time out immediately
    let path = write_config(
        "zero-timeout",
        r#"
[modules.default]
user = "monitor"
password = "secret"
proxy_url = "http://proxy:8080"
timeout_seconds = 0
"#,
    );

    // When: Loading it
    let result = load(&path);
    std::fs::remove_file(&path).ok();

    // Then: Validation names the module
    let err = result.expect_err("zero timeout must be rejected");
    assert!(err.to_string().contains("module default"));
}
