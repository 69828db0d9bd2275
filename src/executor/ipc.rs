//! Host bridge that forwards payloads to a notebook runtime over local IPC.
//!
//! Connects to a named pipe (Windows) or Unix domain socket (Linux/macOS)
//! using the `interprocess` crate and exchanges one JSON object per line.
//!
//! ## Protocol
//!
//! Request:
//! ```json
//! {"op": "execute", "code": "%%spark\n1 + 1", "silent": false, "store_history": true, "user_expressions": {}, "allow_stdin": false}
//! {"op": "shutdown", "restart": false}
//! ```
//!
//! Response:
//! ```json
//! {"status": "ok", "execution_count": 3}
//! {"status": "error", "evalue": "session not found"}
//! {"status": "ok", "restart": false}
//! ```

use std::future::Future;
use std::pin::Pin;

use interprocess::local_socket::tokio::{prelude::*, Stream};
use interprocess::local_socket::GenericNamespaced;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info_span, Instrument};

use crate::executor::CellExecutor;
use crate::models::execution::{ExecuteReply, ExecuteRequest, ShutdownReply};
use crate::{KernelError, Result};

/// Envelope sent to the host runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostRequest {
    /// Evaluate a payload.
    Execute(ExecuteRequest),
    /// Shut the host down.
    Shutdown {
        /// Whether the host should restart afterwards.
        restart: bool,
    },
}

/// [`CellExecutor`] talking to the host over a local socket.
///
/// Each request opens a fresh connection, so a host restart between cells
/// is picked up transparently.
#[derive(Debug, Clone)]
pub struct IpcCellExecutor {
    name: String,
}

impl IpcCellExecutor {
    /// Create an executor for the given namespaced socket name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Socket name this executor connects to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn round_trip<T: DeserializeOwned>(&self, request: HostRequest) -> Result<T> {
        let name = self
            .name
            .as_str()
            .to_ns_name::<GenericNamespaced>()
            .map_err(|err| {
                KernelError::Executor(format!("invalid host socket name '{}': {err}", self.name))
            })?;

        let stream = Stream::connect(name).await.map_err(|err| {
            KernelError::Executor(format!("failed to connect to host '{}': {err}", self.name))
        })?;
        let (reader, mut writer) = stream.split();

        let mut request_line = serde_json::to_string(&request)?;
        request_line.push('\n');
        writer
            .write_all(request_line.as_bytes())
            .await
            .map_err(|err| KernelError::Executor(format!("failed to send request: {err}")))?;
        writer
            .flush()
            .await
            .map_err(|err| KernelError::Executor(format!("failed to send request: {err}")))?;

        let mut reader = BufReader::new(reader);
        let mut response_line = String::new();
        let read = reader
            .read_line(&mut response_line)
            .await
            .map_err(|err| KernelError::Executor(format!("failed to read reply: {err}")))?;
        if read == 0 {
            return Err(KernelError::Executor(
                "host closed the connection without replying".into(),
            ));
        }

        Ok(serde_json::from_str(response_line.trim())?)
    }
}

impl CellExecutor for IpcCellExecutor {
    fn execute(
        &self,
        request: ExecuteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecuteReply>> + Send + '_>> {
        let span = info_span!("host_execute", host = %self.name);
        Box::pin(
            async move {
                let reply: ExecuteReply = self.round_trip(HostRequest::Execute(request)).await?;
                debug!(status = ?reply.status, "host replied");
                Ok(reply)
            }
            .instrument(span),
        )
    }

    fn shutdown(
        &self,
        restart: bool,
    ) -> Pin<Box<dyn Future<Output = Result<ShutdownReply>> + Send + '_>> {
        let span = info_span!("host_shutdown", host = %self.name, restart);
        let reply = self.round_trip(HostRequest::Shutdown { restart });
        Box::pin(reply.instrument(span))
    }
}
