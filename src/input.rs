//! Cell framing for the binary's standard input.
//!
//! Notebook cells routinely span several lines (`%%sql` followed by a
//! query), so a plain line reader cannot carry them. Two framings are
//! offered:
//!
//! | Format  | One stdin line is                                          |
//! |---------|------------------------------------------------------------|
//! | `lines` | the raw cell text                                          |
//! | `json`  | `{"code": "...", "silent": false, "store_history": true}`  |
//!
//! In `json` mode every option field is optional; missing fields take the
//! user-cell defaults of [`ExecuteOptions`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::execution::{ExecuteOptions, ExecuteRequest};
use crate::{KernelError, Result};

/// How stdin is split into cells.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Every non-blank line is one single-line cell.
    #[default]
    Lines,
    /// Every non-blank line is a JSON object carrying the cell and its options.
    Json,
}

impl InputFormat {
    /// Decode one stdin line into a cell request.
    ///
    /// Blank lines carry no cell and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::MalformedCommand`] if a `json` line is not a
    /// cell object.
    pub fn decode(self, line: &str) -> Result<Option<ExecuteRequest>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        match self {
            Self::Lines => Ok(Some(ExecuteRequest::new(line, ExecuteOptions::default()))),
            Self::Json => serde_json::from_str(line)
                .map(Some)
                .map_err(|err| KernelError::MalformedCommand(format!("invalid cell line: {err}"))),
        }
    }
}
