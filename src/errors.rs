//! Error types shared across the kernel.

use std::fmt::{Display, Formatter};

/// Shared kernel result type.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Kernel error enumeration covering all command and lifecycle failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Configuration parsing, validation, or credential lookup failure.
    Config(String),
    /// Latched failure; the kernel instance is unusable from now on.
    Fatal(String),
    /// Input could not be split into a subcommand and a body.
    MalformedCommand(String),
    /// Subcommand is not one of the supported magics.
    UnrecognizedCommand(String),
    /// Reconfiguration attempted on a live session without the force flag.
    SessionAlreadyStarted(String),
    /// Session creation failed; the kernel converts this into [`KernelError::Fatal`].
    SessionStart(String),
    /// Cell executor transport or protocol failure.
    Executor(String),
    /// File-system or socket I/O failure.
    Io(String),
}

impl KernelError {
    /// Message carried by the error, without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Fatal(msg)
            | Self::MalformedCommand(msg)
            | Self::UnrecognizedCommand(msg)
            | Self::SessionAlreadyStarted(msg)
            | Self::SessionStart(msg)
            | Self::Executor(msg)
            | Self::Io(msg) => msg,
        }
    }

    /// Whether the error leaves the kernel permanently unusable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Fatal(msg) => write!(f, "fatal: {msg}"),
            Self::MalformedCommand(msg) => write!(f, "malformed command: {msg}"),
            Self::UnrecognizedCommand(name) => write!(f, "magic '{name}' not supported"),
            Self::SessionAlreadyStarted(msg) => write!(f, "session already started: {msg}"),
            Self::SessionStart(msg) => write!(f, "session start: {msg}"),
            Self::Executor(msg) => write!(f, "executor: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for KernelError {}

impl From<toml::de::Error> for KernelError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Executor(format!("invalid host message: {err}"))
    }
}

impl From<std::io::Error> for KernelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
