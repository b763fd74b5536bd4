//! Logging utilities.
//!
//! Centralizes logger initialization. The engine and viewer log through the
//! standard `log` facade; nothing else in the crate touches the backend.

mod init;

pub use init::{LoggingConfig, init_logging};
