//! Credentials and the connection descriptor built from them.

use std::fmt::{Debug, Display, Formatter};

use serde::Deserialize;

/// Username, password, and endpoint for one credential profile.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Cluster user name.
    #[serde(default)]
    pub username: String,
    /// Cluster password.
    #[serde(default)]
    pub password: String,
    /// Livy endpoint URL.
    #[serde(default)]
    pub url: String,
}

impl Credentials {
    /// Construct credentials from their parts.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            url: url.into(),
        }
    }

    /// Name of the first empty field, if any.
    #[must_use]
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            ("username", &self.username),
            ("password", &self.password),
            ("url", &self.url),
        ]
        .into_iter()
        .find_map(|(name, value)| value.is_empty().then_some(name))
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// Opaque connection string handed to the session-creation payload.
///
/// Assembled once from [`Credentials`] and never modified afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    value: String,
    password_len: usize,
}

impl ConnectionDescriptor {
    /// Assemble the descriptor from credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            value: format!(
                "url={};username={};password={}",
                credentials.url, credentials.username, credentials.password
            ),
            password_len: credentials.password.len(),
        }
    }

    /// Full descriptor text, including the password.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The password is always the final segment.
        let visible = &self.value[..self.value.len() - self.password_len];
        write!(f, "ConnectionDescriptor({visible}<redacted>)")
    }
}
