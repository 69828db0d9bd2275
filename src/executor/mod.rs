//! Collaborator interfaces the kernel core is written against.
//!
//! The [`CellExecutor`] trait decouples command handling from the host
//! runtime that actually evaluates payloads, and [`ErrorChannel`] is the
//! one-way sink for advisories shown to the user. The core never depends
//! on a concrete implementation of either.

pub mod channel;
pub mod ipc;

use std::future::Future;
use std::pin::Pin;

use crate::models::execution::{ExecuteReply, ExecuteRequest, ShutdownReply, StreamContent};
use crate::Result;

/// Host runtime that evaluates payloads and owns process shutdown.
///
/// Implementations may be asynchronous internally; the kernel awaits every
/// call to completion before issuing the next one.
pub trait CellExecutor: Send + Sync {
    /// Evaluate a payload and return the host's reply.
    ///
    /// A reply with `status: error` is a normal return value. `Err` is
    /// reserved for failures reaching the host at all.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Executor`](crate::KernelError::Executor) if the
    /// request cannot be delivered or the reply cannot be decoded.
    fn execute(
        &self,
        request: ExecuteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecuteReply>> + Send + '_>>;

    /// Run the host's own shutdown sequence.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Executor`](crate::KernelError::Executor) if the
    /// host cannot be reached.
    fn shutdown(
        &self,
        restart: bool,
    ) -> Pin<Box<dyn Future<Output = Result<ShutdownReply>> + Send + '_>>;
}

/// Fire-and-forget sink for user-facing error text.
pub trait ErrorChannel: Send + Sync {
    /// Deliver a stream message to the user.
    fn emit(&self, content: &StreamContent);
}
