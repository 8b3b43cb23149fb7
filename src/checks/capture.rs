//! Chain-capturing certificate verification
//!
//! Wraps a strict `ServerCertVerifier` and records the chain the server
//! presented before the strict verifier runs. A rejected handshake therefore
//! still leaves the chain available for enrollment, while the trust decision
//! itself is exactly the wrapped verifier's.
//!
//! Only server certificates are handled; client certificate verification
//! lives on rustls' separate `ClientCertVerifier` trait.

use crate::models::CertificateChain;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, Error as RustlsError, SignatureScheme};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared slot holding the last chain seen by a `CapturingVerifier`
#[derive(Debug, Clone, Default)]
pub struct ChainCapture {
    slot: Arc<Mutex<Option<CertificateChain>>>,
}

impl ChainCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CertificateChain>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the captured chain
    pub fn record(&self, chain: CertificateChain) {
        *self.lock() = Some(chain);
    }

    /// Copy of the captured chain, if any
    pub fn get(&self) -> Option<CertificateChain> {
        self.lock().clone()
    }

    /// Move the captured chain out, leaving the slot empty
    pub fn take(&self) -> Option<CertificateChain> {
        self.lock().take()
    }
}

/// A verifier wrapper that captures the presented certificate chain
/// before delegating to an inner verifier.
#[derive(Debug)]
pub struct CapturingVerifier {
    inner: Arc<dyn ServerCertVerifier>,
    capture: ChainCapture,
}

impl CapturingVerifier {
    pub fn new(inner: Arc<dyn ServerCertVerifier>, capture: ChainCapture) -> Self {
        Self { inner, capture }
    }

    pub fn capture(&self) -> &ChainCapture {
        &self.capture
    }
}

impl ServerCertVerifier for CapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        let chain = CertificateChain::from_presented(end_entity, intermediates);
        tracing::debug!("Captured {} certificate(s) from server", chain.len());
        self.capture.record(chain);

        let result =
            self.inner
                .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now);
        if let Err(e) = &result {
            tracing::debug!("Strict verification rejected chain: {}", e);
        }
        result
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
