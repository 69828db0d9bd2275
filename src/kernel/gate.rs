//! Fatal-error latch.
//!
//! Once tripped the latch is never cleared: every later command replays the
//! same advisory and fails with the same message.

use tracing::error;

use crate::config::MESSAGE_PLACEHOLDER;
use crate::executor::ErrorChannel;
use crate::models::execution::StreamContent;
use crate::{KernelError, Result};

/// Latch holding the first unrecoverable error of a kernel instance.
#[derive(Debug, Clone)]
pub struct FatalErrorGate {
    latched: Option<String>,
    suggestion_template: String,
}

impl FatalErrorGate {
    /// Create an open gate rendering advisories from `suggestion_template`.
    ///
    /// The first `{}` in the template is replaced by the error message.
    #[must_use]
    pub fn new(suggestion_template: impl Into<String>) -> Self {
        Self {
            latched: None,
            suggestion_template: suggestion_template.into(),
        }
    }

    /// Latched message, if the gate has tripped.
    #[must_use]
    pub fn latched(&self) -> Option<&str> {
        self.latched.as_deref()
    }

    /// User-facing advisory for `message`.
    #[must_use]
    pub fn advisory(&self, message: &str) -> String {
        self.suggestion_template.replacen(MESSAGE_PLACEHOLDER, message, 1)
    }

    /// Latch `message`, report it, and return the error to propagate.
    #[must_use = "the returned error must be propagated to the caller"]
    pub fn trip(&mut self, message: impl Into<String>, channel: &dyn ErrorChannel) -> KernelError {
        let message = message.into();
        self.report(&message, channel);
        self.latched = Some(message.clone());
        KernelError::Fatal(message)
    }

    /// Fail with the latched message if the gate has tripped.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Fatal`] carrying the latched message, after
    /// reporting the advisory again.
    pub fn check(&self, channel: &dyn ErrorChannel) -> Result<()> {
        match &self.latched {
            Some(message) => {
                self.report(message, channel);
                Err(KernelError::Fatal(message.clone()))
            }
            None => Ok(()),
        }
    }

    fn report(&self, message: &str, channel: &dyn ErrorChannel) {
        let advisory = self.advisory(message);
        error!("{advisory}");
        channel.emit(&StreamContent::stderr(advisory));
    }
}
