//! Certificate and chain types

use crate::certificate::info::parse_certificate;
use chrono::{DateTime, Utc};
use rustls::pki_types::CertificateDer;
use std::fmt;

const UNPARSEABLE: &str = "<unparseable>";

/// A DER certificate presented by a peer, with its display attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    pub subject: String,
    pub issuer: String,
    pub serial: String,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Wrap DER bytes. Certificates that fail to parse keep their bytes so
    /// they can still be fingerprinted and stored.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        let der = der.into();
        match parse_certificate(&der) {
            Ok(attrs) => Self {
                der,
                subject: attrs.subject,
                issuer: attrs.issuer,
                serial: attrs.serial,
                not_before: attrs.not_before,
                not_after: attrs.not_after,
            },
            Err(message) => {
                tracing::warn!("{}", message);
                Self {
                    der,
                    subject: UNPARSEABLE.to_string(),
                    issuer: UNPARSEABLE.to_string(),
                    serial: UNPARSEABLE.to_string(),
                    not_before: None,
                    not_after: None,
                }
            }
        }
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn is_self_signed(&self) -> bool {
        self.subject != UNPARSEABLE && self.subject == self.issuer
    }
}

impl From<&CertificateDer<'_>> for Certificate {
    fn from(der: &CertificateDer<'_>) -> Self {
        Certificate::from_der(der.as_ref())
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subject)
    }
}

/// Certificates in the order the peer sent them, leaf first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateChain {
    pub certificates: Vec<Certificate>,
}

impl CertificateChain {
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    /// Build a chain from the end-entity and intermediates of a handshake
    pub fn from_presented(end_entity: &CertificateDer<'_>, intermediates: &[CertificateDer<'_>]) -> Self {
        let certificates = std::iter::once(end_entity)
            .chain(intermediates.iter())
            .map(Certificate::from)
            .collect();
        Self { certificates }
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Certificate> {
        self.certificates.get(index)
    }

    pub fn leaf(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_certificate_keeps_bytes() {
        let cert = Certificate::from_der(vec![0x30, 0x03, 0x02, 0x01, 0x00]);
        assert_eq!(cert.der(), &[0x30, 0x03, 0x02, 0x01, 0x00]);
        assert_eq!(cert.subject, "<unparseable>");
        assert!(!cert.is_self_signed());
    }

    #[test]
    fn test_chain_from_presented_is_leaf_first() {
        let leaf = CertificateDer::from(vec![0x01]);
        let intermediate = CertificateDer::from(vec![0x02]);
        let chain = CertificateChain::from_presented(&leaf, &[intermediate]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.leaf().unwrap().der(), &[0x01]);
        assert_eq!(chain.get(1).unwrap().der(), &[0x02]);
        assert!(chain.get(2).is_none());
    }
}
