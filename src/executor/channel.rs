//! Error channel writing to the process's own stderr.

use std::io::Write;

use tracing::warn;

use crate::executor::ErrorChannel;
use crate::models::execution::StreamContent;

/// [`ErrorChannel`] that prints stream text to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrChannel;

impl ErrorChannel for StderrChannel {
    fn emit(&self, content: &StreamContent) {
        let mut stderr = std::io::stderr().lock();
        if let Err(err) = writeln!(stderr, "{}", content.text) {
            warn!(%err, "failed to write to stderr");
        }
    }
}
