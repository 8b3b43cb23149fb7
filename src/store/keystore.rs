//! PKCS#12 trust store access
//!
//! Reads and writes password-protected PKCS#12 files, the default keystore
//! type of current JDKs, using p12-keystore. Only certificate entries are
//! treated as trust anchors; key entries are carried through untouched.

use crate::models::Certificate;
use crate::utils::StoreError;
use p12_keystore::{KeyStore, KeyStoreEntry};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A trust store loaded into memory
pub struct TrustStore {
    keystore: KeyStore,
    source: Option<PathBuf>,
}

impl TrustStore {
    /// Create a store with no entries
    pub fn new_empty() -> Self {
        Self {
            keystore: KeyStore::new(),
            source: None,
        }
    }

    /// Load a store from `path`, verifying it with `passphrase`
    pub fn load(path: &Path, passphrase: &str) -> Result<Self, StoreError> {
        let data = std::fs::read(path).map_err(|e| StoreError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let keystore =
            KeyStore::from_pkcs12(&data, passphrase).map_err(|e| StoreError::Unreadable {
                path: path.to_path_buf(),
                message: format!("Failed to parse PKCS#12 (wrong passphrase?): {}", e),
            })?;

        let store = Self {
            keystore,
            source: Some(path.to_path_buf()),
        };
        tracing::debug!(
            "Loaded {} entries from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// File the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.keystore.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All aliases in the store, sorted
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .keystore
            .entries()
            .map(|(alias, _)| alias.to_string())
            .collect();
        aliases.sort();
        aliases
    }

    /// DER of the certificate entry stored under `alias`
    pub fn certificate(&self, alias: &str) -> Option<Vec<u8>> {
        self.keystore.entries().find_map(|(name, entry)| {
            let name: &str = name.as_ref();
            match entry {
                KeyStoreEntry::Certificate(cert) if name == alias => Some(cert.as_der().to_vec()),
                _ => None,
            }
        })
    }

    /// DER of every certificate entry, the anchors for strict verification
    pub fn trust_anchors(&self) -> Vec<Vec<u8>> {
        self.keystore
            .entries()
            .filter_map(|(_, entry)| match entry {
                KeyStoreEntry::Certificate(cert) => Some(cert.as_der().to_vec()),
                _ => None,
            })
            .collect()
    }

    /// Add or replace the certificate entry at `alias`.
    ///
    /// Returns the DER previously stored under that alias. No disk IO.
    pub fn insert(
        &mut self,
        alias: &str,
        certificate: &Certificate,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let entry = p12_keystore::Certificate::from_der(certificate.der()).map_err(|e| {
            StoreError::InvalidCertificate {
                message: e.to_string(),
            }
        })?;

        let previous = self.certificate(alias);
        self.keystore.add_entry(alias, KeyStoreEntry::Certificate(entry));
        tracing::debug!("Inserted certificate entry '{}'", alias);
        Ok(previous)
    }

    /// Write the store to `path`, protected with `passphrase`.
    ///
    /// The data goes to a temporary file next to `path` which then replaces
    /// the target, so a failure never leaves a truncated store behind.
    pub fn persist(&self, path: &Path, passphrase: &str) -> Result<(), StoreError> {
        let write_failed = |message: String| StoreError::WriteFailed {
            path: path.to_path_buf(),
            message,
        };

        let data = self
            .keystore
            .writer(passphrase)
            .write()
            .map_err(|e| write_failed(format!("Failed to serialize PKCS#12: {}", e)))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
        tmp.write_all(&data)
            .map_err(|e| write_failed(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| write_failed(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("source", &self.source)
            .field("aliases", &self.aliases())
            .finish()
    }
}
