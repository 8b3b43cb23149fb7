//! Trust store discovery
//!
//! Without an explicit store the search order is: the store file in the
//! working directory, the same file name in the platform security directory,
//! then the read-only system store in that directory.

use crate::config::StoreSettings;
use crate::utils::StoreError;
use std::path::{Path, PathBuf};

/// Candidate store paths in search order
pub fn candidates(settings: &StoreSettings, security_dir: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = &settings.path {
        return vec![path.clone()];
    }

    let mut paths = vec![PathBuf::from(&settings.store_file_name)];
    if let Some(dir) = security_dir {
        paths.push(dir.join(&settings.store_file_name));
        paths.push(dir.join(&settings.system_store_file_name));
    }
    paths
}

/// First candidate that is an existing regular file
pub fn locate(settings: &StoreSettings) -> Result<PathBuf, StoreError> {
    let security_dir = settings.security_dir();
    let candidates = candidates(settings, security_dir.as_deref());

    for path in &candidates {
        if path.is_file() {
            tracing::debug!("Using trust store {}", path.display());
            return Ok(path.clone());
        }
        tracing::debug!("Trust store candidate {} not found", path.display());
    }

    Err(StoreError::NotFound {
        searched: candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
