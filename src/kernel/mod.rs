//! Kernel command layer.
//!
//! A [`Kernel`] accepts raw cells, routes them through the magic parser and
//! dispatcher, and keeps a single remote Spark session alive on the host.
//! Every entry point first consults the [`FatalErrorGate`]: once a fatal
//! error has been latched the instance must be discarded.

pub mod dispatch;
pub mod gate;
pub mod parser;
pub mod session;

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::KernelSettings;
use crate::credentials::CredentialProvider;
use crate::executor::{CellExecutor, ErrorChannel};
use crate::models::connection::ConnectionDescriptor;
use crate::models::execution::{ExecuteOptions, ExecuteReply, ExecuteRequest, ShutdownReply};
use crate::{KernelError, Result};

use self::dispatch::Plan;
use self::gate::FatalErrorGate;
use self::session::{SessionManager, SessionState};

/// One kernel instance bound to one host and at most one remote session.
pub struct Kernel {
    settings: KernelSettings,
    executor: Arc<dyn CellExecutor>,
    errors: Arc<dyn ErrorChannel>,
    session: SessionManager,
    gate: FatalErrorGate,
    connection: Option<ConnectionDescriptor>,
}

impl Kernel {
    /// Create an uninitialized kernel.
    ///
    /// Call [`Kernel::initialize`] before handling cells that need a session.
    #[must_use]
    pub fn new(
        settings: KernelSettings,
        executor: Arc<dyn CellExecutor>,
        errors: Arc<dyn ErrorChannel>,
    ) -> Self {
        let session = SessionManager::new(settings.client_name.clone(), settings.session_language);
        let gate = FatalErrorGate::new(settings.fatal_error_suggestion.clone());
        Self {
            settings,
            executor,
            errors,
            session,
            gate,
            connection: None,
        }
    }

    /// Create a kernel from an already-resolved connection descriptor.
    ///
    /// Skips credential lookup and magics loading; the host is expected to
    /// have loaded the magics library itself.
    #[must_use]
    pub fn with_connection(
        settings: KernelSettings,
        connection: ConnectionDescriptor,
        executor: Arc<dyn CellExecutor>,
        errors: Arc<dyn ErrorChannel>,
    ) -> Self {
        let mut kernel = Self::new(settings, executor, errors);
        kernel.connection = Some(connection);
        kernel
    }

    /// Resolve credentials, build the connection descriptor, and load the
    /// magics library into the host.
    ///
    /// Calling this on an initialized kernel is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Fatal`] if the credentials are missing or
    /// empty, or if the host fails to load the magics library. The kernel
    /// is unusable afterwards.
    pub async fn initialize(&mut self, provider: &dyn CredentialProvider) -> Result<()> {
        self.gate.check(&*self.errors)?;

        if self.connection.is_some() {
            debug!("kernel already initialized");
            return Ok(());
        }

        let profile = self.settings.credential_profile.clone();
        let missing =
            format!("Please set credentials for profile '{profile}' to initialize the kernel.");
        let credentials = match provider.credentials(&profile).await {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!(%profile, %err, "credential lookup failed");
                return Err(self.gate.trip(missing, &*self.errors));
            }
        };
        if let Some(field) = credentials.first_missing() {
            warn!(%profile, field, "credential is empty");
            return Err(self.gate.trip(missing, &*self.errors));
        }

        self.connection = Some(ConnectionDescriptor::new(&credentials));
        self.load_magics_extension().await
    }

    /// Handle one raw cell.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Fatal`] if the gate has tripped or the session
    /// cannot be created; [`KernelError::MalformedCommand`],
    /// [`KernelError::UnrecognizedCommand`], or
    /// [`KernelError::SessionAlreadyStarted`] for rejected input; and
    /// [`KernelError::Executor`] if the host cannot be reached.
    pub async fn handle(&mut self, code: &str, options: ExecuteOptions) -> Result<ExecuteReply> {
        let span = info_span!("kernel", client = %self.settings.client_name);
        self.dispatch(code, options).instrument(span).await
    }

    /// Clean up the session, then run the host's own shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Executor`] if the host shutdown cannot be
    /// delivered. Session cleanup failures are never returned.
    pub async fn shutdown(&mut self, restart: bool) -> Result<ShutdownReply> {
        info!(restart, "kernel shutting down");
        self.session.stop(&*self.executor).await;
        self.executor.shutdown(restart).await
    }

    /// Current session state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Latched fatal error, if any.
    #[must_use]
    pub fn fatal_error(&self) -> Option<&str> {
        self.gate.latched()
    }

    /// Connection descriptor, once initialized.
    #[must_use]
    pub fn connection(&self) -> Option<&ConnectionDescriptor> {
        self.connection.as_ref()
    }

    async fn dispatch(&mut self, code: &str, options: ExecuteOptions) -> Result<ExecuteReply> {
        self.gate.check(&*self.errors)?;

        let command = parser::parse(code)?;
        debug!(subcommand = %command.subcommand, flags = ?command.flags, "parsed command");

        match dispatch::plan(&command, self.session.state())? {
            Plan::StartingSession { payload } => {
                self.start_session().await?;
                self.execute_for_user(payload, options).await
            }
            Plan::RestartingSession { payload, restart } => {
                if restart {
                    info!("restarting session with new configuration");
                    self.session.stop(&*self.executor).await;
                }

                let reply = self.execute_for_user(payload, options).await?;

                if restart {
                    self.start_session().await?;
                }

                Ok(reply)
            }
        }
    }

    async fn start_session(&mut self) -> Result<()> {
        let Some(connection) = self.connection.as_ref() else {
            return Err(KernelError::Config(
                "kernel is not initialized: no connection descriptor".into(),
            ));
        };

        match self
            .session
            .ensure_started(&*self.executor, connection)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => Err(self.gate.trip(err.message(), &*self.errors)),
        }
    }

    async fn load_magics_extension(&mut self) -> Result<()> {
        let code = format!("%load_ext {}", self.settings.magics_extension);
        let detail = match self
            .executor
            .execute(ExecuteRequest::new(code, ExecuteOptions::internal()))
            .await
        {
            Ok(reply) if !reply.is_error() => {
                debug!(extension = %self.settings.magics_extension, "loaded magics");
                return Ok(());
            }
            Ok(reply) => reply.evalue.unwrap_or_default(),
            Err(err) => err.to_string(),
        };

        let message =
            format!("Failed to load the Spark magics library.\nException details:\n\t\"{detail}\"");
        Err(self.gate.trip(message, &*self.errors))
    }

    async fn execute_for_user(
        &self,
        payload: String,
        options: ExecuteOptions,
    ) -> Result<ExecuteReply> {
        self.executor
            .execute(ExecuteRequest::new(payload, options))
            .await
    }
}
