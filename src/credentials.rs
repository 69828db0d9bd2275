//! Credential providers resolving a profile name into cluster credentials.

use std::collections::HashMap;
use std::env;
use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::models::connection::Credentials;
use crate::{KernelError, Result};

/// Keychain service name used by [`KeyringCredentialProvider`].
pub const KEYRING_SERVICE: &str = "remote-spark-kernel";

/// Source of credentials for a named profile.
pub trait CredentialProvider: Send + Sync {
    /// Resolve the credentials stored under `profile`.
    ///
    /// Implementations may return credentials with empty fields; the kernel
    /// treats an empty field the same as a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Config`] if the profile or one of its keys
    /// cannot be found.
    fn credentials(
        &self,
        profile: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials>> + Send + '_>>;
}

/// Provider backed by the `[credentials.<profile>]` tables of the config file.
#[derive(Debug, Clone, Default)]
pub struct TableCredentialProvider {
    profiles: HashMap<String, Credentials>,
}

impl TableCredentialProvider {
    /// Wrap a profile map.
    #[must_use]
    pub fn new(profiles: HashMap<String, Credentials>) -> Self {
        Self { profiles }
    }

    /// Whether a table exists for `profile`.
    #[must_use]
    pub fn contains(&self, profile: &str) -> bool {
        self.profiles.contains_key(profile)
    }
}

impl CredentialProvider for TableCredentialProvider {
    fn credentials(
        &self,
        profile: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials>> + Send + '_>> {
        let result = self.profiles.get(profile).cloned().ok_or_else(|| {
            KernelError::Config(format!("no [credentials.{profile}] table in config"))
        });
        Box::pin(async move { result })
    }
}

/// Provider reading the OS keychain with an environment-variable fallback.
///
/// Keychain entries live under the [`KEYRING_SERVICE`] service as
/// `<profile>_username`, `<profile>_password`, and `<profile>_url`. The
/// fallback variables are `SPARK_<PROFILE>_USERNAME` and so on, with the
/// profile upper-cased and `-` replaced by `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringCredentialProvider;

impl KeyringCredentialProvider {
    /// Environment variable consulted for `field` of `profile`.
    #[must_use]
    pub fn env_key(profile: &str, field: &str) -> String {
        format!(
            "SPARK_{}_{}",
            profile.to_uppercase().replace('-', "_"),
            field.to_uppercase()
        )
    }
}

impl CredentialProvider for KeyringCredentialProvider {
    fn credentials(
        &self,
        profile: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Credentials>> + Send + '_>> {
        let profile = profile.to_owned();
        Box::pin(async move {
            let username = load_credential(&profile, "username").await?;
            let password = load_credential(&profile, "password").await?;
            let url = load_credential(&profile, "url").await?;
            Ok(Credentials::new(username, password, url))
        })
    }
}

/// Load a single credential field from OS keychain with env-var fallback.
async fn load_credential(profile: &str, field: &str) -> Result<String> {
    let keyring_key = format!("{profile}_{field}");
    let env_key = KeyringCredentialProvider::env_key(profile, field);
    let key = keyring_key.clone();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| KernelError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = %keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(key = %keyring_key, ?err, "keychain lookup failed, trying env var");
        }
    }

    match env::var(&env_key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(KernelError::Config(format!(
            "credential {keyring_key} not found in keychain service {KEYRING_SERVICE} or {env_key} env var"
        ))),
    }
}
