//! Environment override test
//!
//! Kept in its own test binary so the process environment is not shared with other
//! configuration tests.

use eseries_exporter::config::Config;

#[test]
fn test_environment_overrides_file() {
    // Given: A config file and an environment override for the port
    let path = std::env::temp_dir().join(format!(
        "eseries-exporter-env-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[server]\nport = 9400\n").expect("Failed to write config");
    std::env::set_var("ESERIES_EXPORTER__SERVER__PORT", "9555");

    // When: Loading the configuration
    let config = Config::load(path.to_str().expect("Non UTF-8 temp path"));
    std::env::remove_var("ESERIES_EXPORTER__SERVER__PORT");
    std::fs::remove_file(&path).ok();

    // Then: The environment wins
    assert_eq!(config.expect("Failed to load config").server.port, 9555);
}
