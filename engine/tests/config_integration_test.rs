//! Integration tests for configuration management
//!
//! These tests verify that a Config can be loaded from a TOML file, merged with
//! environment overrides, and validated.

use haven_engine::config::Config;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_toml_parsing() {
    let file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 8080
cors = false

[log]
level = "DEBUG"

[memory]
mood_capacity = 10
chat_capacity = 5

[completion]
base_url = "http://localhost:9000/v1"
model = "meta/llama-3.1-8b-instruct"
temperature = 0.2
top_p = 0.5
max_tokens = 256
timeout_secs = 5
api_key_env = "MY_KEY"
"#,
    );

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert!(!config.server.cors);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.memory.mood_capacity, 10);
    assert_eq!(config.memory.chat_capacity, 5);
    assert_eq!(config.completion.model, "meta/llama-3.1-8b-instruct");
    assert_eq!(config.completion.max_tokens, 256);
    assert_eq!(
        config.completion.endpoint(),
        "http://localhost:9000/v1/chat/completions"
    );
    assert!(config.completion.api_key.is_none());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[server]
port = 3000
"#,
    );

    let config = Config::load(Some(file.path())).unwrap();
    let defaults = Config::default();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.memory, defaults.memory);
    assert_eq!(config.completion.model, "nvidia/llama-3.1-nemotron-nano-4b-v1.1");
    assert_eq!(config.completion.temperature, 0.6);
    assert_eq!(config.completion.top_p, 0.95);
    assert_eq!(config.completion.max_tokens, 1024);
}

#[test]
fn test_api_key_is_never_read_from_file() {
    let file = write_config(
        r#"
[completion]
api_key = "leaked"
"#,
    );

    let config = Config::load(Some(file.path())).unwrap();
    assert!(config.completion.api_key.is_none());
}

#[test]
fn test_env_overrides_file() {
    let file = write_config(
        r#"
[server]
port = 3000

[completion]
api_key_env = "MY_KEY"
"#,
    );

    let mut config = Config::load(Some(file.path())).unwrap();
    let env: HashMap<&str, &str> = [("PORT", "7000"), ("MY_KEY", "secret")].into();
    config
        .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.server.port, 7000);
    assert_eq!(config.completion.api_key.as_deref(), Some("secret"));
    assert!(!format!("{:?}", config).contains("secret"));
}

#[test]
fn test_invalid_files_are_rejected() {
    let zero_capacity = write_config(
        r#"
[memory]
chat_capacity = 0
"#,
    );
    assert!(Config::load(Some(zero_capacity.path())).is_err());

    let bad_level = write_config(
        r#"
[log]
level = "loud"
"#,
    );
    assert!(Config::load(Some(bad_level.path())).is_err());

    let not_toml = write_config("this is = = not toml");
    assert!(Config::load(Some(not_toml.path())).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("haven.toml");

    assert!(Config::load(Some(missing.as_path())).is_err());
}
