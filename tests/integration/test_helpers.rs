//! Shared test doubles for kernel-level integration tests.
//!
//! Provides a recording [`CellExecutor`] with scripted replies, a recording
//! [`ErrorChannel`], and kernel builders so individual test modules can
//! focus on behaviour rather than boilerplate.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use remote_spark_kernel::config::KernelSettings;
use remote_spark_kernel::executor::{CellExecutor, ErrorChannel};
use remote_spark_kernel::kernel::session::CLEANUP_PAYLOAD;
use remote_spark_kernel::models::connection::{ConnectionDescriptor, Credentials};
use remote_spark_kernel::models::execution::{
    ExecuteReply, ExecuteRequest, ReplyStatus, ShutdownReply, StreamContent,
};
use remote_spark_kernel::models::language::SessionLanguage;
use remote_spark_kernel::{Kernel, KernelError, Result};

/// Payload the kernel sends to create a session for [`test_credentials`].
pub const CREATE_PAYLOAD: &str =
    "%spark add test-client python url=http://livy:8998;username=user;password=pass skip";

/// Scripted outcome for one executor call.
pub enum Scripted {
    Reply(ExecuteReply),
    Fail(String),
}

/// Executor recording every request; replies `ok` unless scripted otherwise.
#[derive(Default)]
pub struct RecordingExecutor {
    requests: Mutex<Vec<ExecuteRequest>>,
    script: Mutex<VecDeque<Scripted>>,
    shutdowns: Mutex<Vec<bool>>,
}

impl RecordingExecutor {
    /// Queue the outcome of the next unscripted call.
    pub fn push(&self, outcome: Scripted) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Queue an error reply.
    pub fn push_error(&self, evalue: &str) {
        self.push(Scripted::Reply(ExecuteReply::error(evalue)));
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Payload codes seen so far.
    pub fn codes(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.code).collect()
    }

    /// Forget recorded requests.
    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Restart flags of every shutdown call.
    pub fn shutdowns(&self) -> Vec<bool> {
        self.shutdowns.lock().unwrap().clone()
    }

    /// Number of cleanup payloads seen so far.
    pub fn cleanup_count(&self) -> usize {
        self.codes()
            .iter()
            .filter(|c| *c == CLEANUP_PAYLOAD)
            .count()
    }
}

impl CellExecutor for RecordingExecutor {
    fn execute(
        &self,
        request: ExecuteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecuteReply>> + Send + '_>> {
        self.requests.lock().unwrap().push(request);
        let outcome = self.script.lock().unwrap().pop_front();
        Box::pin(async move {
            match outcome {
                None => Ok(ExecuteReply::ok()),
                Some(Scripted::Reply(reply)) => Ok(reply),
                Some(Scripted::Fail(msg)) => Err(KernelError::Executor(msg)),
            }
        })
    }

    fn shutdown(
        &self,
        restart: bool,
    ) -> Pin<Box<dyn Future<Output = Result<ShutdownReply>> + Send + '_>> {
        self.shutdowns.lock().unwrap().push(restart);
        Box::pin(async move {
            Ok(ShutdownReply {
                status: ReplyStatus::Ok,
                restart,
            })
        })
    }
}

/// Error channel recording every emitted message.
#[derive(Default)]
pub struct RecordingChannel {
    emitted: Mutex<Vec<StreamContent>>,
}

impl RecordingChannel {
    /// Texts emitted so far.
    pub fn texts(&self) -> Vec<String> {
        self.emitted
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.text.clone())
            .collect()
    }
}

impl ErrorChannel for RecordingChannel {
    fn emit(&self, content: &StreamContent) {
        self.emitted.lock().unwrap().push(content.clone());
    }
}

/// Settings with a fixed client name and a recognizable advisory template.
pub fn test_settings() -> KernelSettings {
    let mut settings = KernelSettings::new(SessionLanguage::Python, "python");
    settings.client_name = "test-client".into();
    settings.fatal_error_suggestion = "FATAL: {}".into();
    settings
}

/// Credentials matching [`CREATE_PAYLOAD`].
pub fn test_credentials() -> Credentials {
    Credentials::new("user", "pass", "http://livy:8998")
}

/// Kernel with a resolved connection plus handles to its collaborators.
pub fn connected_kernel() -> (Kernel, Arc<RecordingExecutor>, Arc<RecordingChannel>) {
    let executor = Arc::new(RecordingExecutor::default());
    let channel = Arc::new(RecordingChannel::default());
    let kernel = Kernel::with_connection(
        test_settings(),
        ConnectionDescriptor::new(&test_credentials()),
        Arc::clone(&executor) as Arc<dyn CellExecutor>,
        Arc::clone(&channel) as Arc<dyn ErrorChannel>,
    );
    (kernel, executor, channel)
}

/// Uninitialized kernel plus handles to its collaborators.
pub fn bare_kernel() -> (Kernel, Arc<RecordingExecutor>, Arc<RecordingChannel>) {
    let executor = Arc::new(RecordingExecutor::default());
    let channel = Arc::new(RecordingChannel::default());
    let kernel = Kernel::new(
        test_settings(),
        Arc::clone(&executor) as Arc<dyn CellExecutor>,
        Arc::clone(&channel) as Arc<dyn ErrorChannel>,
    );
    (kernel, executor, channel)
}
