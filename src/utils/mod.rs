//! Utility modules for install-cert
//!
//! This module contains error types and status-line helpers.

pub mod error;
pub mod progress;

pub use error::{ConfigError, ConnectionError, Result, SslError, StoreError, ToolkitError};
