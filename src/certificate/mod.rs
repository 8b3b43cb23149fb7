//! Certificate handling module
//!
//! This module provides functionality for:
//! - Parsing display attributes out of DER certificates
//! - Fingerprinting certificates for out-of-band comparison

pub mod fingerprint;
pub mod info;

pub use fingerprint::{fingerprint, DigestAlgorithm, FingerprintSet};
pub use info::parse_certificate;
