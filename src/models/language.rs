//! Target language of the remote session.

use std::fmt::{Display, Formatter};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Language the remote Spark session is created for.
///
/// Rendered in lower case inside the session-creation payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLanguage {
    /// `PySpark` session.
    Python,
    /// Scala Spark session.
    Scala,
    /// `SparkR` session.
    R,
}

impl SessionLanguage {
    /// Lower-case wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Scala => "scala",
            Self::R => "r",
        }
    }
}

impl Display for SessionLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
