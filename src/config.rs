//! Application configuration.
//!
//! Settings come from an optional `airdrop-relay.{toml,yaml,json,...}` file and
//! are then overridden by `AIRDROP__*` environment variables, e.g.
//!
//! ```text
//! AIRDROP__EMAIL__SERVICE_ID=service_abc123
//! AIRDROP__STORE__URL=https://abcd.supabase.co
//! AIRDROP__RATE_LIMIT__MIN_INTERVAL=30000
//! ```
//!
//! A `.env` file in the working directory is read first when present.
//! Missing credentials are not an error: the affected collaborator warns and
//! degrades instead.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use notify::EmailConfig;
use store::StoreConfig;
use suggest::{RateLimitConfig, is_valid_email};

pub const DEFAULT_CONFIG_FILE: &str = "airdrop-relay";
pub const ENV_PREFIX: &str = "AIRDROP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings that load fine but leave part of the pipeline degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("rate_limit_disabled: min_interval is zero")]
    RateLimitDisabled,

    #[error("email_not_configured: admin notifications will fail")]
    EmailNotConfigured,

    #[error("store_not_configured: suggestions cannot be saved")]
    StoreNotConfigured,
}

/// Behaviour switches of the submission pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Also send the submitter a confirmation when they left an address.
    pub confirm_submitter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub email: EmailConfig,
    pub store: StoreConfig,
    pub rate_limit: RateLimitConfig,
    pub pipeline: PipelineConfig,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            email: EmailConfig::default(),
            store: StoreConfig::default(),
            rate_limit: RateLimitConfig::default(),
            pipeline: PipelineConfig::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the optional `airdrop-relay` file, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Like [`AppConfig::load`] with an explicit file stem, without `.env`.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::with_name(file).required(false));
        Self::finish(with_env(builder))
    }

    /// Parses configuration held in memory, e.g. an embedded TOML document.
    pub fn parse(content: &str, format: FileFormat) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(content, format));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let admin = self.email.admin_email.trim();
        if !admin.is_empty() && !is_valid_email(admin) {
            return Err(ConfigError::Invalid(format!(
                "email.admin_email is not an address: {admin}"
            )));
        }
        Ok(())
    }

    /// Degraded settings, for the caller to log once tracing is installed.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.rate_limit.min_interval.is_zero() {
            warnings.push(ConfigWarning::RateLimitDisabled);
        }
        if !self.email.is_configured() {
            warnings.push(ConfigWarning::EmailNotConfigured);
        }
        if !self.store.is_configured() {
            warnings.push(ConfigWarning::StoreNotConfigured);
        }
        warnings
    }
}

fn with_env(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    )
}
