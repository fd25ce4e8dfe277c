//! Settings loaded from environment variables through the `config` crate.
//!
//! Recognised variables: `TEST_ENV`, `GOREST_TOKEN`, `REQUEST_TIMEOUT`
//! (seconds), `RETRY_COUNT`, `PARALLEL_WORKERS`, `LOG_LEVEL` and
//! `LOG_REQUESTS`. Anything unset falls back to its default.

use std::collections::HashMap;
use std::time::Duration;

use apiprobe_domain::{Environment, Settings};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is out of range.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_environment")]
    test_env: String,
    #[serde(default)]
    gorest_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    request_timeout: u64,
    #[serde(default = "default_retry_count")]
    retry_count: u32,
    #[serde(default = "default_parallel_workers")]
    parallel_workers: usize,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_log_requests")]
    log_requests: String,
}

fn default_environment() -> String {
    "dev".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_parallel_workers() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_requests() -> String {
    "true".to_string()
}

/// Settings plus the fallbacks applied while reading them.
///
/// Loading happens before tracing is installed, so fallbacks are
/// reported through [`LoadedSettings::log_fallbacks`] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    /// The effective settings.
    pub settings: Settings,
    /// `TEST_ENV` value that named no known environment.
    pub unknown_environment: Option<String>,
}

impl LoadedSettings {
    /// Emits a warning for every fallback taken.
    pub fn log_fallbacks(&self) {
        if let Some(test_env) = &self.unknown_environment {
            tracing::warn!(%test_env, "Unknown environment, falling back to dev");
        }
    }
}

/// Loads settings from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError`] if a variable cannot be parsed.
pub fn load_settings() -> Result<LoadedSettings, ConfigError> {
    load(config::Environment::default())
}

/// Loads settings from an explicit variable map instead of the process
/// environment.
///
/// # Errors
///
/// Returns [`ConfigError`] if a variable cannot be parsed.
pub fn load_settings_from(
    vars: HashMap<String, String>,
) -> Result<LoadedSettings, ConfigError> {
    load(config::Environment::default().source(Some(vars)))
}

fn load(source: config::Environment) -> Result<LoadedSettings, ConfigError> {
    let raw: RawSettings = config::Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()?;

    if raw.request_timeout == 0 {
        return Err(ConfigError::Invalid {
            key: "REQUEST_TIMEOUT",
            message: "must be at least one second".to_string(),
        });
    }
    if raw.parallel_workers == 0 {
        return Err(ConfigError::Invalid {
            key: "PARALLEL_WORKERS",
            message: "must be at least 1".to_string(),
        });
    }

    let (environment, unknown_environment) = match raw.test_env.parse::<Environment>() {
        Ok(environment) => (environment, None),
        Err(_) => (Environment::Dev, Some(raw.test_env)),
    };

    Ok(LoadedSettings {
        settings: Settings {
            environment,
            user_management_token: raw.gorest_token.filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(raw.request_timeout),
            retry_count: raw.retry_count,
            parallel_workers: raw.parallel_workers,
            log_level: raw.log_level.to_lowercase(),
            log_requests: raw.log_requests.eq_ignore_ascii_case("true"),
        },
        unknown_environment,
    })
}
