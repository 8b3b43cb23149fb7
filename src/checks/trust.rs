//! Strict server certificate verification
//!
//! A server is trusted when its end-entity certificate is itself stored in
//! the trust store, byte for byte. Otherwise the decision is rustls' WebPKI
//! verifier anchored on the store's certificate entries, which does chain
//! building, name matching and validity periods.

use crate::store::TrustStore;
use crate::utils::SslError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError, DigitallySignedStruct, Error as RustlsError, RootCertStore, SignatureScheme,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Crypto provider used for every TLS operation of the tool
pub fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Build the strict verifier for the anchors in `store`
pub fn strict_verifier(
    store: &TrustStore,
    provider: Arc<CryptoProvider>,
) -> Result<Arc<dyn ServerCertVerifier>, SslError> {
    let anchors = store.trust_anchors();

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(
        anchors.iter().cloned().map(CertificateDer::from),
    );
    if ignored > 0 {
        tracing::warn!("Ignored {} trust store certificate(s) that are not valid anchors", ignored);
    }
    tracing::debug!("Strict verifier uses {} trust anchor(s)", added);

    let webpki: Arc<dyn ServerCertVerifier> = if roots.is_empty() {
        Arc::new(NoAnchorsVerifier { provider })
    } else {
        WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
            .build()
            .map_err(|e| SslError::Configuration {
                message: format!("Failed to build verifier: {}", e),
            })?
    };

    Ok(Arc::new(StoredCertVerifier {
        stored: anchors.into_iter().collect(),
        webpki,
    }))
}

/// Accepts a server whose end-entity certificate is stored as-is, and hands
/// every other chain to `webpki`.
///
/// A stored leaf is trusted without a path to an anchor and without a name
/// check, so enrolling a CA-issued leaf, or connecting by an address its SANs
/// do not list, still makes the next handshake succeed.
#[derive(Debug)]
struct StoredCertVerifier {
    stored: HashSet<Vec<u8>>,
    webpki: Arc<dyn ServerCertVerifier>,
}

impl ServerCertVerifier for StoredCertVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        if self.stored.contains(end_entity.as_ref()) {
            tracing::debug!("Server certificate is stored in the trust store");
            return Ok(ServerCertVerified::assertion());
        }
        self.webpki
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.webpki.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.webpki.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.webpki.supported_verify_schemes()
    }
}

/// Verifier for a store without trust anchors: no chain is trusted.
///
/// WebPKI refuses to build a verifier from an empty root set, but an empty
/// store is still a valid starting point for enrollment.
#[derive(Debug)]
struct NoAnchorsVerifier {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for NoAnchorsVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        Err(RustlsError::InvalidCertificate(CertificateError::UnknownIssuer))
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
