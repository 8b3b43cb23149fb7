//! Display attributes of X.509 certificates
//!
//! Analyzes DER certificates using x509-parser.

use chrono::{DateTime, TimeZone, Utc};
use x509_parser::prelude::*;

/// Human-readable attributes of a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAttributes {
    pub subject: String,
    pub issuer: String,
    pub serial: String,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
}

/// Parse the display attributes of a single DER-encoded certificate
pub fn parse_certificate(der: &[u8]) -> Result<CertificateAttributes, String> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| format!("Failed to parse certificate: {:?}", e))?;

    let serial = cert
        .serial
        .to_bytes_be()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":");

    Ok(CertificateAttributes {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial,
        not_before: asn1_time_to_datetime(cert.validity().not_before),
        not_after: asn1_time_to_datetime(cert.validity().not_after),
    })
}

fn asn1_time_to_datetime(time: ASN1Time) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.timestamp(), 0).single()
}
