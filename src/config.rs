//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values like `AULA_SERVICE_KEY`. The backing
//! store URL, bucket names, and webhook endpoints all live here so no
//! endpoint is ever hardcoded in library code.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub forum: ForumConfig,
    #[serde(default)]
    pub actor: ActorConfig,
    pub logging: LoggingConfig,
}

/// Backing store (PostgREST-style REST) connection settings.
///
/// The anon key is a publishable credential by the store's security model;
/// the service key is not and is only ever read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
    /// Loaded from `AULA_SERVICE_KEY` at runtime, never from the config file.
    #[serde(skip)]
    pub service_key: Option<String>,
}

impl StoreConfig {
    /// The key actually sent on requests: service key when present.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}

/// Object storage bucket names.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_forum_bucket")]
    pub forum_bucket: String,
    #[serde(default = "default_cover_bucket")]
    pub cover_bucket: String,
}

fn default_forum_bucket() -> String {
    "forum-images".into()
}

fn default_cover_bucket() -> String {
    "module-covers".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            forum_bucket: default_forum_bucket(),
            cover_bucket: default_cover_bucket(),
        }
    }
}

/// External workflow webhook endpoints and retry policy.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Chat-message endpoint for the virtual tutor.
    pub chat_url: String,
    /// Document-ingestion endpoint for the knowledge base.
    pub ingest_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl WebhookConfig {
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Forum limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Maximum attachment size in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

const fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

/// Identity the CLI acts as. Authorization is still enforced server-side
/// by row-level policies; this only fills the author columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorConfig {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Service key comes from the environment only (never from the config file)
        config.store.service_key = std::env::var("AULA_SERVICE_KEY").ok();

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.url.is_empty() {
            return Err(ConfigError::MissingField { field: "store.url" }.into());
        }
        if self.store.anon_key.is_empty() {
            return Err(ConfigError::MissingField {
                field: "store.anon_key",
            }
            .into());
        }
        for (field, value) in [
            ("store.url", &self.store.url),
            ("webhook.chat_url", &self.webhook.chat_url),
            ("webhook.ingest_url", &self.webhook.ingest_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }
        if self.webhook.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "webhook.max_retries",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                url: "http://localhost:54321".into(),
                anon_key: String::new(),
                service_key: None,
            },
            storage: StorageConfig::default(),
            webhook: WebhookConfig {
                chat_url: "http://localhost:5678/webhook/chat".into(),
                ingest_url: "http://localhost:5678/webhook/upload-document".into(),
                max_retries: default_max_retries(),
                retry_delay_ms: default_retry_delay_ms(),
            },
            forum: ForumConfig::default(),
            actor: ActorConfig::default(),
            logging: LoggingConfig {
                level: "info".into(),
                format: "pretty".into(),
            },
        }
    }
}
