//! Certificate fingerprints
//!
//! Digests of the DER encoding, shown to the operator so a certificate can be
//! compared against fingerprints published out of band. They are a display
//! aid only and never take part in a trust decision.

use md5::Md5;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Digest algorithm used for a fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DigestAlgorithm {
    Sha1,
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Short lowercase label used in the chain listing
    pub fn label(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Md5 => Md5::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            other => Err(format!("unsupported fingerprint algorithm '{}'", other)),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fingerprint of DER bytes as lowercase hex pairs separated by spaces
pub fn fingerprint(der: &[u8], algorithm: DigestAlgorithm) -> String {
    algorithm
        .digest(der)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One fingerprint per configured algorithm, in configuration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintSet {
    pub entries: Vec<(DigestAlgorithm, String)>,
}

impl FingerprintSet {
    pub fn compute(der: &[u8], algorithms: &[DigestAlgorithm]) -> Self {
        Self {
            entries: algorithms
                .iter()
                .map(|&alg| (alg, fingerprint(der, alg)))
                .collect(),
        }
    }

    pub fn get(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        self.entries
            .iter()
            .find(|(alg, _)| *alg == algorithm)
            .map(|(_, value)| value.as_str())
    }
}
