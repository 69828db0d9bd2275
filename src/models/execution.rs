//! Messages exchanged with the cell executor and the error channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-cell execution options supplied by the host.
///
/// Missing fields deserialize to the [`Default`] user-cell values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecuteOptions {
    /// Suppress output and execution counting.
    pub silent: bool,
    /// Record the cell in the host's input history.
    pub store_history: bool,
    /// Expressions evaluated after the cell, keyed by name.
    pub user_expressions: BTreeMap<String, String>,
    /// Whether the cell may prompt for stdin.
    pub allow_stdin: bool,
}

impl ExecuteOptions {
    /// Options used for the kernel's own bookkeeping cells.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            silent: true,
            store_history: false,
            user_expressions: BTreeMap::new(),
            allow_stdin: false,
        }
    }
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            silent: false,
            store_history: true,
            user_expressions: BTreeMap::new(),
            allow_stdin: false,
        }
    }
}

/// One payload submitted to the cell executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteRequest {
    /// Payload text.
    pub code: String,
    /// Execution options.
    #[serde(flatten)]
    pub options: ExecuteOptions,
}

impl ExecuteRequest {
    /// Build a request from a payload and options.
    #[must_use]
    pub fn new(code: impl Into<String>, options: ExecuteOptions) -> Self {
        Self {
            code: code.into(),
            options,
        }
    }
}

/// Outcome reported by the host for a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// Request completed.
    Ok,
    /// Request failed; see `evalue`.
    Error,
}

/// Reply content returned by the cell executor.
///
/// Only `status` and `evalue` are interpreted; any other fields the host
/// sends are carried through untouched in `content`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecuteReply {
    /// Completion status.
    pub status: ReplyStatus,
    /// Error value when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evalue: Option<String>,
    /// Remaining host-specific reply fields.
    #[serde(default, flatten)]
    pub content: serde_json::Map<String, serde_json::Value>,
}

impl ExecuteReply {
    /// Successful reply with no extra content.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: ReplyStatus::Ok,
            evalue: None,
            content: serde_json::Map::new(),
        }
    }

    /// Error reply carrying `evalue`.
    #[must_use]
    pub fn error(evalue: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            evalue: Some(evalue.into()),
            content: serde_json::Map::new(),
        }
    }

    /// Whether the host reported an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ReplyStatus::Error
    }
}

/// Reply returned by the host's own shutdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShutdownReply {
    /// Completion status.
    pub status: ReplyStatus,
    /// Whether the host will restart after shutting down.
    pub restart: bool,
}

/// Output stream targeted by a [`StreamContent`] message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamName {
    /// Standard error.
    Stderr,
}

/// Text pushed to the host's error-reporting channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamContent {
    /// Target stream.
    pub name: StreamName,
    /// Text to display.
    pub text: String,
}

impl StreamContent {
    /// Stderr message with the given text.
    #[must_use]
    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            name: StreamName::Stderr,
            text: text.into(),
        }
    }
}
