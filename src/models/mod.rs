//! Domain models for kernel sessions and host messages.

pub mod connection;
pub mod execution;
pub mod language;
