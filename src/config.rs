//! Kernel configuration parsing and validation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::connection::Credentials;
use crate::models::language::SessionLanguage;
use crate::{KernelError, Result};

/// Placeholder replaced by the error message in the fatal advisory template.
pub const MESSAGE_PLACEHOLDER: &str = "{}";

fn default_client_name() -> String {
    "remote-spark-kernel".into()
}

fn default_magics_extension() -> String {
    "remotespark".into()
}

fn default_host_ipc_name() -> String {
    "remote-spark-host".into()
}

fn default_fatal_error_suggestion() -> String {
    "The code failed because of a fatal error:\n\t{}.\n\n\
     Some things to try:\n\
     a) Make sure Spark has enough available resources for the kernel to create a Spark context.\n\
     b) Make sure the Spark magics library is configured correctly.\n\
     c) Restart the kernel."
        .into()
}

/// Kernel configuration parsed from `kernel.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct KernelConfig {
    /// Client identity sent with every session-creation request.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Language of the remote session.
    pub session_language: SessionLanguage,
    /// Credential profile resolved at initialization.
    pub credential_profile: String,
    /// Magics library loaded into the host at initialization.
    #[serde(default = "default_magics_extension")]
    pub magics_extension: String,
    /// Advisory template shown when the kernel hits a fatal error.
    #[serde(default = "default_fatal_error_suggestion")]
    pub fatal_error_suggestion: String,
    /// Named pipe / Unix socket identifier of the host runtime.
    #[serde(default = "default_host_ipc_name")]
    pub host_ipc_name: String,
    /// Inline credential tables keyed by profile name.
    #[serde(default)]
    pub credentials: HashMap<String, Credentials>,
}

impl KernelConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| KernelError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Construction-time settings handed to the kernel core.
    #[must_use]
    pub fn settings(&self) -> KernelSettings {
        KernelSettings {
            client_name: self.client_name.clone(),
            session_language: self.session_language,
            credential_profile: self.credential_profile.clone(),
            magics_extension: self.magics_extension.clone(),
            fatal_error_suggestion: self.fatal_error_suggestion.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(KernelError::Config("client_name must not be empty".into()));
        }

        if self.credential_profile.trim().is_empty() {
            return Err(KernelError::Config(
                "credential_profile must not be empty".into(),
            ));
        }

        if self.magics_extension.trim().is_empty() {
            return Err(KernelError::Config(
                "magics_extension must not be empty".into(),
            ));
        }

        if !self.fatal_error_suggestion.contains(MESSAGE_PLACEHOLDER) {
            return Err(KernelError::Config(format!(
                "fatal_error_suggestion must contain the '{MESSAGE_PLACEHOLDER}' placeholder"
            )));
        }

        Ok(())
    }
}

/// Already-resolved inputs the kernel is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSettings {
    /// Client identity sent with every session-creation request.
    pub client_name: String,
    /// Language of the remote session.
    pub session_language: SessionLanguage,
    /// Credential profile resolved at initialization.
    pub credential_profile: String,
    /// Magics library loaded into the host at initialization.
    pub magics_extension: String,
    /// Advisory template shown when the kernel hits a fatal error.
    pub fatal_error_suggestion: String,
}

impl KernelSettings {
    /// Settings with default client identity, extension, and advisory.
    #[must_use]
    pub fn new(session_language: SessionLanguage, credential_profile: impl Into<String>) -> Self {
        Self {
            client_name: default_client_name(),
            session_language,
            credential_profile: credential_profile.into(),
            magics_extension: default_magics_extension(),
            fatal_error_suggestion: default_fatal_error_suggestion(),
        }
    }
}
