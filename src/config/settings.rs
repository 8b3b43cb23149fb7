//! Application settings configuration
//!
//! Defines trust store locations, TLS timeouts and fingerprint algorithms.
//! Every field has a default, so an empty or missing settings file behaves
//! like the classic `InstallCert` invocation.

use crate::certificate::DigestAlgorithm;
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default TLS port
pub const DEFAULT_PORT: u16 = 443;

/// Default trust store passphrase used by the JDK
pub const DEFAULT_PASSPHRASE: &str = "changeit";

/// Trust store locations and passphrase
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Explicit input store; disables the fallback search when set
    pub path: Option<PathBuf>,
    /// Store searched for in the working directory and the security directory
    pub store_file_name: String,
    /// Read-only system store, last fallback in the security directory
    pub system_store_file_name: String,
    /// Platform security directory, `$JAVA_HOME/lib/security` when unset
    pub security_dir: Option<PathBuf>,
    /// Where the updated store is written
    pub output: PathBuf,
    pub passphrase: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: None,
            store_file_name: "jssecacerts".to_string(),
            system_store_file_name: "cacerts".to_string(),
            security_dir: None,
            output: PathBuf::from("jssecacerts"),
            passphrase: DEFAULT_PASSPHRASE.to_string(),
        }
    }
}

impl StoreSettings {
    /// Resolve the platform security directory
    pub fn security_dir(&self) -> Option<PathBuf> {
        self.security_dir.clone().or_else(|| {
            std::env::var_os("JAVA_HOME")
                .map(|home| PathBuf::from(home).join("lib").join("security"))
        })
    }
}

/// SSL/TLS settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    pub default_port: u16,
    pub connect_timeout_secs: u64,
    pub handshake_timeout_secs: u64,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            connect_timeout_secs: 10,
            handshake_timeout_secs: 10,
        }
    }
}

impl TlsSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }
}

/// Fingerprints shown for each certificate in the captured chain
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FingerprintSettings {
    pub algorithms: Vec<DigestAlgorithm>,
}

impl Default for FingerprintSettings {
    fn default() -> Self {
        Self {
            algorithms: vec![DigestAlgorithm::Sha1, DigestAlgorithm::Md5],
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub tls: TlsSettings,
    pub fingerprint: FingerprintSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fingerprint.algorithms.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "fingerprint.algorithms".to_string(),
                message: "at least one algorithm is required".to_string(),
            });
        }
        if self.tls.connect_timeout_secs == 0 || self.tls.handshake_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tls".to_string(),
                message: "timeouts must be at least one second".to_string(),
            });
        }
        if self.store.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "store.output".to_string(),
                message: "output path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
