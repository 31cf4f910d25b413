//! Pipeline configuration.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::web::{DEFAULT_REDIRECT_STATUS, REDIRECT_STATUSES};

/// Environment variable naming the canonical reference route parameter.
pub const REFERENCE_PARAM_VAR: &str = "CASE_PIPELINE_REFERENCE_PARAM";

/// Environment variable holding the canonical-path redirect status.
pub const CANONICAL_STATUS_VAR: &str = "CASE_PIPELINE_CANONICAL_STATUS";

/// Settings for the interception layer.
///
/// # Examples
///
/// ```
/// use case_pipeline::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{ "reference_param": "clientRef" }"#)?;
/// assert_eq!(config.reference_param, "clientRef");
/// assert_eq!(config.canonical_redirect_status, 302);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Route parameter holding the case reference (`crn` by default).
    pub reference_param: String,
    /// Status used when redirecting to the canonical path.
    pub canonical_redirect_status: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_param: "crn".to_string(),
            canonical_redirect_status: DEFAULT_REDIRECT_STATUS,
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from the environment, reading `.env` first if present.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::debug!(error = %e, "ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(param) = lookup(REFERENCE_PARAM_VAR) {
            config.reference_param = param.trim().to_string();
        }
        if let Some(status) = lookup(CANONICAL_STATUS_VAR) {
            config.canonical_redirect_status = status
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar {
                    name: CANONICAL_STATUS_VAR,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the configured values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reference_param.is_empty() {
            return Err(ConfigError::EmptyReferenceParam);
        }
        if !REDIRECT_STATUSES.contains(&self.canonical_redirect_status) {
            return Err(ConfigError::InvalidRedirectStatus(self.canonical_redirect_status));
        }
        Ok(())
    }
}
