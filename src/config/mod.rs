//! Configuration module for install-cert
//!
//! Handles loading settings from TOML files.

pub mod settings;

pub use settings::{
    FingerprintSettings, Settings, StoreSettings, TlsSettings, DEFAULT_PASSPHRASE, DEFAULT_PORT,
};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from an explicit file, or from the default path when none is given
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from_file(path),
        None => Settings::load_default(),
    }
}
