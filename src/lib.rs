#![forbid(unsafe_code)]

//! Command layer of a remote Spark kernel.
//!
//! Classifies raw cells into `%run`, `%sql`, `%hive`, and `%config` magics,
//! translates them into Spark magics payloads, and manages the lifecycle of
//! a single remote session through a host-provided [`executor::CellExecutor`].

pub mod config;
pub mod credentials;
pub mod errors;
pub mod executor;
pub mod input;
pub mod kernel;
pub mod models;

pub use config::{KernelConfig, KernelSettings};
pub use errors::{KernelError, Result};
pub use kernel::Kernel;
