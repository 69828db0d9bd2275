//! Mapping from parsed magics to Spark payloads and lifecycle plans.

use std::str::FromStr;

use crate::kernel::parser::ParsedCommand;
use crate::kernel::session::SessionState;
use crate::{KernelError, Result};

/// Flag authorizing a session restart on `%config`.
pub const FORCE_FLAG: &str = "f";

const FORCE_REQUIRED_GUIDANCE: &str = "A session has already been started. In order to modify \
the Spark configuration, please provide the '-f' flag at the beginning of the config magic:\n\t\
e.g. `%config -f {\"driverMemory\": \"1000M\"}`\n\nNote that this will kill the current session \
and will create a new one with the configuration provided. All previously run commands in the \
session will be lost.";

/// Supported magic subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// Run code in the session language.
    Run,
    /// Run a Spark SQL query.
    Sql,
    /// Run a Hive query.
    Hive,
    /// Reconfigure the session.
    Config,
}

impl Magic {
    /// Lower-case subcommand name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Sql => "sql",
            Self::Hive => "hive",
            Self::Config => "config",
        }
    }

    /// Payload understood by the Spark magics library.
    #[must_use]
    pub fn payload(self, body: &str) -> String {
        match self {
            Self::Run => format!("%%spark\n{body}"),
            Self::Sql => format!("%%spark -c sql\n{body}"),
            Self::Hive => format!("%%spark -c hive\n{body}"),
            Self::Config => format!("%%spark config {body}"),
        }
    }
}

impl FromStr for Magic {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "run" => Ok(Self::Run),
            "sql" => Ok(Self::Sql),
            "hive" => Ok(Self::Hive),
            "config" => Ok(Self::Config),
            other => Err(KernelError::UnrecognizedCommand(other.to_owned())),
        }
    }
}

/// What the kernel must do to execute a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Make sure a session exists, then execute the payload.
    StartingSession {
        /// Payload to execute.
        payload: String,
    },
    /// Execute the payload, optionally wrapped in stop and start.
    RestartingSession {
        /// Payload to execute.
        payload: String,
        /// Whether to stop before and start after the payload.
        restart: bool,
    },
}

impl Plan {
    /// Payload the plan executes on the user's behalf.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::StartingSession { payload } | Self::RestartingSession { payload, .. } => payload,
        }
    }
}

/// Decide how to execute `command` given the current session state.
///
/// # Errors
///
/// Returns [`KernelError::UnrecognizedCommand`] for unknown subcommands and
/// [`KernelError::SessionAlreadyStarted`] for `%config` on a live session
/// without the force flag.
pub fn plan(command: &ParsedCommand, state: SessionState) -> Result<Plan> {
    let magic: Magic = command.subcommand.parse()?;
    let payload = magic.payload(&command.body);

    match magic {
        Magic::Run | Magic::Sql | Magic::Hive => Ok(Plan::StartingSession { payload }),
        Magic::Config => {
            let restart = match state {
                SessionState::NotStarted => false,
                SessionState::Started if command.has_flag(FORCE_FLAG) => true,
                SessionState::Started => {
                    return Err(KernelError::SessionAlreadyStarted(
                        FORCE_REQUIRED_GUIDANCE.into(),
                    ));
                }
            };
            Ok(Plan::RestartingSession { payload, restart })
        }
    }
}
