use std::fs;

use aula::config::Config;
use aula::error::{ConfigError, Error};
use tempfile::tempdir;

const VALID_CONFIG: &str = r#"
[store]
url = "http://localhost:54321"
anon_key = "anon-key"

[webhook]
chat_url = "http://localhost:5678/webhook/chat"
ingest_url = "http://localhost:5678/webhook/upload-document"

[logging]
level = "info"
format = "pretty"
"#;

fn load(toml: &str) -> aula::error::Result<Config> {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("aula.toml");
    fs::write(&path, toml).expect("write config");
    Config::load(&path)
}

#[test]
fn valid_config_loads_with_defaults() {
    let config = load(VALID_CONFIG).expect("valid config");

    assert_eq!(config.store.anon_key, "anon-key");
    assert_eq!(config.storage.forum_bucket, "forum-images");
    assert_eq!(config.storage.cover_bucket, "module-covers");
    assert_eq!(config.webhook.max_retries, 3);
    assert_eq!(config.webhook.retry_delay_ms, 1000);
    assert_eq!(config.forum.max_image_bytes, 5 * 1024 * 1024);
    assert!(config.actor.user_id.is_none());
}

#[test]
fn missing_store_section_is_a_parse_error() {
    let toml = r#"
[logging]
level = "info"
format = "pretty"
"#;
    assert!(matches!(
        load(toml),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn invalid_webhook_url_is_rejected() {
    let toml = VALID_CONFIG.replace(
        "http://localhost:5678/webhook/chat",
        "not a url at all",
    );
    match load(&toml) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, "webhook.chat_url");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn zero_retries_is_rejected() {
    let toml = VALID_CONFIG.replace(
        "ingest_url = \"http://localhost:5678/webhook/upload-document\"",
        "ingest_url = \"http://localhost:5678/webhook/upload-document\"\nmax_retries = 0",
    );
    match load(&toml) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, "webhook.max_retries");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_file_is_a_read_error() {
    assert!(matches!(
        Config::load("/nonexistent/aula.toml"),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}
