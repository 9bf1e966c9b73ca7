//! Runtime configuration for the giftgate compliance core.
//!
//! Settings load from the environment (prefix `GIFTGATE_`) or deserialize
//! from a config file; both paths end in [`GiftgateConfig::validate`].

#![warn(missing_docs, clippy::pedantic)]

use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the audit log file.
pub const AUDIT_LOG_ENV: &str = "GIFTGATE_AUDIT_LOG";
/// Environment variable capping the pending review queue page.
pub const PENDING_PAGE_LIMIT_ENV: &str = "GIFTGATE_PENDING_PAGE_LIMIT";
/// Environment variable carrying the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "GIFTGATE_LOG_FILTER";

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

fn default_pending_page_limit() -> NonZeroUsize {
    NonZeroUsize::new(50).expect("non-zero")
}

fn default_log_filter() -> String {
    "info".to_owned()
}

/// Runtime settings for a giftgate deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GiftgateConfig {
    audit_log_path: Option<PathBuf>,
    pending_page_limit: NonZeroUsize,
    log_filter: String,
}

impl Default for GiftgateConfig {
    fn default() -> Self {
        Self {
            audit_log_path: None,
            pending_page_limit: default_pending_page_limit(),
            log_filter: default_log_filter(),
        }
    }
}

impl GiftgateConfig {
    /// Loads settings from the environment, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] when a variable is set but
    /// does not parse, or when validation fails.
    pub fn from_env() -> ConfigResult<Self> {
        let mut cfg = Self::default();
        if let Ok(path) = env::var(AUDIT_LOG_ENV) {
            cfg.audit_log_path = Some(PathBuf::from(path));
        }
        if let Ok(limit) = env::var(PENDING_PAGE_LIMIT_ENV) {
            cfg.pending_page_limit = limit.parse().map_err(|_| {
                ConfigError::InvalidConfig("pending page limit must be a positive integer")
            })?;
        }
        if let Ok(filter) = env::var(LOG_FILTER_ENV) {
            cfg.log_filter = filter;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the audit log path.
    #[must_use]
    pub fn with_audit_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log_path = Some(path.into());
        self
    }

    /// Sets the pending review page limit.
    #[must_use]
    pub fn with_pending_page_limit(mut self, limit: NonZeroUsize) -> Self {
        self.pending_page_limit = limit;
        self
    }

    /// Sets the tracing filter directives.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Returns the audit log path, when audit logging is enabled.
    #[must_use]
    pub fn audit_log_path(&self) -> Option<&PathBuf> {
        self.audit_log_path.as_ref()
    }

    /// Returns the pending review page limit.
    #[must_use]
    pub const fn pending_page_limit(&self) -> NonZeroUsize {
        self.pending_page_limit
    }

    /// Returns the tracing filter directives.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] when the audit log path or the
    /// log filter is blank.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.audit_log_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "audit log path must not be empty",
                ));
            }
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "log filter must not be empty",
            ));
        }
        Ok(())
    }
}
