//! Certificate chain listing shown before the selection prompt

use crate::certificate::{fingerprint, DigestAlgorithm, FingerprintSet};
use crate::models::{Certificate, CertificateChain};
use console::style;

/// Lines describing every certificate of the chain, numbered from 1
pub fn format_chain_listing(chain: &CertificateChain, algorithms: &[DigestAlgorithm]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, cert) in chain.iter().enumerate() {
        lines.push(format!(
            " {} {} {}",
            style(i + 1).bold(),
            style("Subject").cyan(),
            cert.subject
        ));
        lines.push(format!("   {} {}", style("Issuer ").cyan(), cert.issuer));

        let fingerprints = FingerprintSet::compute(cert.der(), algorithms);
        for (alg, value) in &fingerprints.entries {
            lines.push(format!(
                "   {} {}",
                style(format!("{:<7}", alg.label())).cyan(),
                value
            ));
        }
        lines.push(String::new());
    }
    lines
}

/// Details of the certificate that was added to the store
pub fn format_certificate_details(cert: &Certificate) -> Vec<String> {
    let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    };

    let mut lines = vec![
        format!("  Subject:      {}", cert.subject),
        format!("  Issuer:       {}", cert.issuer),
        format!("  Serial:       {}", cert.serial),
        format!("  Valid from:   {}", date(cert.not_before)),
        format!("  Valid until:  {}", date(cert.not_after)),
        format!(
            "  SHA-256:      {}",
            fingerprint(cert.der(), DigestAlgorithm::Sha256)
        ),
    ];
    if cert.is_self_signed() {
        lines.push("  Self-signed:  yes".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_has_block_per_certificate() {
        console::set_colors_enabled(false);
        let chain = CertificateChain::new(vec![
            Certificate::from_der(vec![0x01]),
            Certificate::from_der(vec![0x02]),
        ]);
        let lines = format_chain_listing(&chain, &[DigestAlgorithm::Sha1, DigestAlgorithm::Md5]);

        // subject, issuer, two fingerprints, blank separator
        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with(" 1 Subject"));
        assert!(lines[5].starts_with(" 2 Subject"));
        assert!(lines[2].starts_with("   sha1    "));
        assert!(lines[3].starts_with("   md5     "));
        assert_eq!(
            lines[2].trim_start_matches("   sha1    "),
            fingerprint(&[0x01], DigestAlgorithm::Sha1)
        );
    }

    #[test]
    fn test_details_of_unparseable_certificate() {
        let lines = format_certificate_details(&Certificate::from_der(vec![0x05]));
        assert!(lines.iter().any(|l| l.contains("Valid until:  unknown")));
        assert!(lines.iter().any(|l| l.starts_with("  SHA-256:")));
    }
}
