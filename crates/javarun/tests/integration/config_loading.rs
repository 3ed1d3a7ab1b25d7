use std::path::Path;

use javarun::{Config, ConfigError};

use super::FIXTURES_PATH;

#[test]
fn test_load_valid_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.max_concurrent_runs, 2);
    assert!(!config.workspace.isolate_requests);
    assert_eq!(config.default_limits.wall_time_limit, Some(5.0));
    assert_eq!(config.run_limits().max_output, Some(256));
    assert_eq!(config.server.path, "/run");
    assert_eq!(config.server.bind.port(), 9090);
    assert_eq!(config.cors.preflight.max_age, Some(600));
    assert_eq!(
        config.cors.preflight.origin_for(Some("https://other.example")),
        "https://app.example"
    );
    assert_eq!(
        config.toolchain.run.env.get("JAVA_TOOL_OPTIONS").map(String::as_str),
        Some("-Dfile.encoding=UTF-8")
    );
}

#[test]
fn test_load_minimal_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.server.path, "/");
    assert_eq!(config.toolchain.compile.command, vec!["javac", "{source}"]);
    assert!(config.workspace.isolate_requests);
}

#[test]
fn test_load_invalid_empty_run_command() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_empty_run_command.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_invalid_server_path() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_server_path.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_invalid_wall_time() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_wall_time.toml");
    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_layered_load_keeps_defaults() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let config = Config::load(Some(Path::new(&path))).expect("Failed to load config");

    assert_eq!(config.server.bind.port(), 0);
    assert_eq!(config.cors.response.allow_methods, "GET, POST, PUT, DELETE, OPTIONS");
}
