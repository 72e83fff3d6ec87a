use emotion_chat::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    // SAFETY: tests in this file run serially, no concurrent env access.
    unsafe {
        env::remove_var("CHAT_SERVER__PORT");
        env::remove_var("CHAT_ANALYZER__BASE_URL");
        env::remove_var("CONFIG_FILE");
        env::remove_var("ANALYZER_URL");
        env::remove_var("PORT");
        env::remove_var("TIMEOUT_DISABLED");
    }
}

fn load_with_no_args() -> Result<AppConfig, config::ConfigError> {
    AppConfig::load_from_args(["emotion-chat"])
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load_with_no_args().expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.analyzer.base_url, "http://127.0.0.1:5000");
    assert!(config.resilience.timeout_disabled);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    // SAFETY: serial test, no concurrent env access.
    unsafe {
        env::set_var("CHAT_SERVER__PORT", "9090");
        env::set_var("CHAT_ANALYZER__BASE_URL", "http://analyzer:8000");
    }

    let config = load_with_no_args().expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.analyzer.base_url, "http://analyzer:8000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env_vars();
    // SAFETY: serial test, no concurrent env access.
    unsafe {
        env::set_var("CHAT_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["emotion-chat", "--port", "7000"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 7000);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let config_content = r"
server:
  port: 7070
analyzer:
  base_url: http://localhost:6000
    ";

    let file_path = "test_config.yaml";
    fs::write(file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args(["emotion-chat", "--config", file_path])
        .expect("Failed to load config from file");

    fs::remove_file(file_path).unwrap();

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.analyzer.base_url, "http://localhost:6000");
}

#[test]
#[serial]
fn test_analyzer_url_flag() {
    clear_env_vars();

    let config =
        AppConfig::load_from_args(["emotion-chat", "--analyzer-url", "http://10.0.0.5:5000"])
            .expect("Failed to load config");
    assert_eq!(config.analyzer.base_url, "http://10.0.0.5:5000");
}
