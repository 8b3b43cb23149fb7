//! Custom error types for install-cert
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of loading a trust store, connecting to a server and
//! writing the enrolled store back to disk.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the install-cert application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Trust store error: {0}")]
    Store(#[from] StoreError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("SSL/TLS error: {0}")]
    Ssl(#[from] SslError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Enrollment cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Trust store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No trust store found (searched: {searched})")]
    NotFound { searched: String },

    #[error("Cannot read trust store {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Failed to write trust store {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("Certificate cannot be stored: {message}")]
    InvalidCertificate { message: String },
}

/// TCP-level failures that happen before any trust decision runs
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to resolve {host}: {message}")]
    Resolve { host: String, message: String },

    #[error("Connection refused to {host}:{port}")]
    Refused { host: String, port: u16 },

    #[error("Host unreachable: {host}:{port}")]
    Unreachable { host: String, port: u16 },

    #[error("Connection timed out to {host}:{port} ({stage})")]
    Timeout {
        host: String,
        port: u16,
        stage: &'static str,
    },

    #[error("Connection failed to {host}:{port}: {message}")]
    Failed {
        host: String,
        port: u16,
        message: String,
    },

    #[error("Invalid server name: {host}")]
    InvalidHost { host: String },
}

/// SSL/TLS protocol errors
#[derive(Error, Debug)]
pub enum SslError {
    #[error("Server certificate chain is not trusted: {message}")]
    ChainNotTrusted { message: String },

    #[error("SSL handshake failed: {message}")]
    HandshakeFailed { message: String },

    #[error("TLS configuration error: {message}")]
    Configuration { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_wraps_into_toolkit_error() {
        let err: ToolkitError = StoreError::Unreadable {
            path: PathBuf::from("jssecacerts"),
            message: "MAC verification failed".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Trust store error: Cannot read trust store jssecacerts: MAC verification failed"
        );
    }

    #[test]
    fn test_timeout_names_stage() {
        let err = ConnectionError::Timeout {
            host: "example.com".to_string(),
            port: 443,
            stage: "handshake",
        };
        assert!(err.to_string().contains("example.com:443"));
        assert!(err.to_string().contains("handshake"));
    }
}
