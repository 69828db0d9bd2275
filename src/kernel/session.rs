//! Remote session lifecycle: create on demand, clean up best-effort.

use tracing::{debug, info, warn};

use crate::executor::CellExecutor;
use crate::models::connection::ConnectionDescriptor;
use crate::models::execution::{ExecuteOptions, ExecuteRequest};
use crate::models::language::SessionLanguage;
use crate::{KernelError, Result};

/// Payload tearing down the current session.
pub const CLEANUP_PAYLOAD: &str = "%spark cleanup";

/// Whether a remote session is currently live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session exists.
    #[default]
    NotStarted,
    /// A session was created and not yet cleaned up.
    Started,
}

/// Owns the session state and sequences start and stop against the executor.
#[derive(Debug, Clone)]
pub struct SessionManager {
    state: SessionState,
    client_name: String,
    session_language: SessionLanguage,
}

impl SessionManager {
    /// Create a manager with no live session.
    #[must_use]
    pub fn new(client_name: impl Into<String>, session_language: SessionLanguage) -> Self {
        Self {
            state: SessionState::NotStarted,
            client_name: client_name.into(),
            session_language,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Payload creating a session for `connection`.
    #[must_use]
    pub fn create_payload(&self, connection: &ConnectionDescriptor) -> String {
        format!(
            "%spark add {} {} {} skip",
            self.client_name, self.session_language, connection
        )
    }

    /// Create a session unless one is already live.
    ///
    /// The state only becomes [`SessionState::Started`] once the host
    /// reports success.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::SessionStart`] if the host reports an error or
    /// cannot be reached. The caller must treat this as fatal.
    pub async fn ensure_started(
        &mut self,
        executor: &dyn CellExecutor,
        connection: &ConnectionDescriptor,
    ) -> Result<()> {
        if self.state == SessionState::Started {
            return Ok(());
        }

        let request =
            ExecuteRequest::new(self.create_payload(connection), ExecuteOptions::internal());
        let detail = match executor.execute(request).await {
            Ok(reply) if !reply.is_error() => {
                self.state = SessionState::Started;
                debug!(
                    client = %self.client_name,
                    language = %self.session_language,
                    "added session"
                );
                return Ok(());
            }
            Ok(reply) => reply.evalue.unwrap_or_default(),
            Err(err) => err.to_string(),
        };

        Err(KernelError::SessionStart(format!(
            "Failed to create a Livy session.\nException details:\n\t\"{detail}\""
        )))
    }

    /// Clean up the live session, if any.
    ///
    /// The state is reset whatever the host reports; failures are only logged.
    pub async fn stop(&mut self, executor: &dyn CellExecutor) {
        if self.state == SessionState::NotStarted {
            return;
        }

        let request = ExecuteRequest::new(CLEANUP_PAYLOAD, ExecuteOptions::internal());
        match executor.execute(request).await {
            Ok(reply) if reply.is_error() => {
                warn!(evalue = ?reply.evalue, "session cleanup reported an error");
            }
            Ok(_) => info!("session cleaned up"),
            Err(err) => warn!(%err, "session cleanup failed"),
        }

        self.state = SessionState::NotStarted;
    }
}
