//! TLS handshake with chain capture
//!
//! Connects to the target, negotiates TLS through a `CapturingVerifier` and
//! reports whether the strict verifier accepted the server. A rejected chain
//! is an expected outcome here, not an error: the captured certificates are
//! returned for enrollment.

use crate::checks::capture::{CapturingVerifier, ChainCapture};
use crate::checks::trust::crypto_provider;
use crate::config::TlsSettings;
use crate::models::{CertificateChain, ConnectionTarget};
use crate::utils::{ConnectionError, Result, SslError};
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// How the handshake ended
#[derive(Debug)]
pub enum HandshakeStatus {
    /// The strict verifier accepted the chain
    AlreadyTrusted,
    /// The handshake failed at the TLS layer; the chain may need enrolling
    NeedsEnrollment { error: SslError },
}

/// Result of one handshake attempt
#[derive(Debug)]
pub struct HandshakeReport {
    pub status: HandshakeStatus,
    /// Chain captured during the handshake, empty if none was presented
    pub chain: CertificateChain,
    pub peer: SocketAddr,
    pub protocol: Option<String>,
}

impl HandshakeReport {
    pub fn is_trusted(&self) -> bool {
        matches!(self.status, HandshakeStatus::AlreadyTrusted)
    }
}

/// TLS handshake checker
pub struct HandshakeChecker {
    settings: TlsSettings,
    provider: Arc<CryptoProvider>,
}

impl HandshakeChecker {
    /// Create a new handshake checker with the given settings
    pub fn new(settings: TlsSettings) -> Self {
        Self {
            settings,
            provider: crypto_provider(),
        }
    }

    pub fn provider(&self) -> Arc<CryptoProvider> {
        Arc::clone(&self.provider)
    }

    /// Perform one handshake against `target`, trusting exactly what `strict` trusts.
    ///
    /// Fails only for problems below TLS: name resolution, TCP connect and
    /// timeouts, plus an unusable server name or TLS configuration.
    pub async fn check(
        &self,
        target: &ConnectionTarget,
        strict: Arc<dyn ServerCertVerifier>,
    ) -> Result<HandshakeReport> {
        let capture = ChainCapture::new();
        let verifier = CapturingVerifier::new(strict, capture.clone());

        let config = ClientConfig::builder_with_provider(Arc::clone(&self.provider))
            .with_safe_default_protocol_versions()
            .map_err(|e| SslError::Configuration {
                message: e.to_string(),
            })?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();

        let server_name = ServerName::try_from(target.host.clone()).map_err(|_| {
            ConnectionError::InvalidHost {
                host: target.host.clone(),
            }
        })?;

        let stream = self.connect(target).await?;
        let peer = stream.peer_addr()?;

        let connector = TlsConnector::from(Arc::new(config));
        let handshake = tokio::time::timeout(
            self.settings.handshake_timeout(),
            connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| ConnectionError::Timeout {
            host: target.host.clone(),
            port: target.port,
            stage: "handshake",
        })?;

        match handshake {
            Ok(mut tls_stream) => {
                let protocol = tls_stream
                    .get_ref()
                    .1
                    .protocol_version()
                    .map(|v| format!("{:?}", v));
                if let Err(e) = tls_stream.shutdown().await {
                    tracing::debug!("TLS shutdown failed: {}", e);
                }
                tracing::info!("Handshake with {} succeeded ({:?})", peer, protocol);

                Ok(HandshakeReport {
                    status: HandshakeStatus::AlreadyTrusted,
                    chain: capture.take().unwrap_or_default(),
                    peer,
                    protocol,
                })
            }
            Err(e) => {
                let error = classify_handshake_error(&e);
                tracing::warn!("Handshake with {} failed: {}", peer, error);

                Ok(HandshakeReport {
                    status: HandshakeStatus::NeedsEnrollment { error },
                    chain: capture.take().unwrap_or_default(),
                    peer,
                    protocol: None,
                })
            }
        }
    }

    /// Resolve the target and connect to the first address that accepts
    async fn connect(&self, target: &ConnectionTarget) -> Result<TcpStream> {
        let timeout = self.settings.connect_timeout();

        let addrs: Vec<SocketAddr> = tokio::time::timeout(
            timeout,
            tokio::net::lookup_host((target.host.as_str(), target.port)),
        )
        .await
        .map_err(|_| ConnectionError::Timeout {
            host: target.host.clone(),
            port: target.port,
            stage: "resolve",
        })?
        .map_err(|e| ConnectionError::Resolve {
            host: target.host.clone(),
            message: e.to_string(),
        })?
        .collect();

        let mut last_error = ConnectionError::Resolve {
            host: target.host.clone(),
            message: "no addresses found".to_string(),
        };

        for addr in addrs {
            tracing::debug!("Connecting to {}", addr);
            match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => return Ok(stream),
                Ok(Err(e)) => last_error = classify_connect_error(target, e),
                Err(_) => {
                    last_error = ConnectionError::Timeout {
                        host: target.host.clone(),
                        port: target.port,
                        stage: "connect",
                    }
                }
            }
        }

        Err(last_error.into())
    }
}

fn classify_connect_error(target: &ConnectionTarget, e: std::io::Error) -> ConnectionError {
    let host = target.host.clone();
    let port = target.port;

    if e.kind() == std::io::ErrorKind::ConnectionRefused {
        return ConnectionError::Refused { host, port };
    }

    let error_str = e.to_string().to_lowercase();
    if error_str.contains("unreachable") {
        ConnectionError::Unreachable { host, port }
    } else {
        ConnectionError::Failed {
            host,
            port,
            message: e.to_string(),
        }
    }
}

/// Map a failed handshake to the TLS-level reason
pub fn classify_handshake_error(e: &std::io::Error) -> SslError {
    match e
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        Some(err @ rustls::Error::InvalidCertificate(_)) => SslError::ChainNotTrusted {
            message: err.to_string(),
        },
        Some(err) => SslError::HandshakeFailed {
            message: err.to_string(),
        },
        None => SslError::HandshakeFailed {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ToolkitError;
    use rustls::CertificateError;
    use std::io;

    #[test]
    fn test_invalid_certificate_is_chain_not_trusted() {
        let e = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(CertificateError::UnknownIssuer),
        );
        assert!(matches!(
            classify_handshake_error(&e),
            SslError::ChainNotTrusted { .. }
        ));
    }

    #[test]
    fn test_other_failures_are_handshake_failures() {
        let e = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::AlertReceived(rustls::AlertDescription::HandshakeFailure),
        );
        assert!(matches!(
            classify_handshake_error(&e),
            SslError::HandshakeFailed { .. }
        ));

        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "tls handshake eof");
        assert!(matches!(
            classify_handshake_error(&eof),
            SslError::HandshakeFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_is_fatal() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let checker = HandshakeChecker::new(TlsSettings::default());
        let strict = crate::checks::trust::strict_verifier(
            &crate::store::TrustStore::new_empty(),
            checker.provider(),
        )
        .unwrap();
        let result = checker
            .check(&ConnectionTarget::new("127.0.0.1", port), strict)
            .await;

        assert!(matches!(
            result,
            Err(ToolkitError::Connection(
                ConnectionError::Refused { .. } | ConnectionError::Failed { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_invalid_server_name() {
        let checker = HandshakeChecker::new(TlsSettings::default());
        let strict = crate::checks::trust::strict_verifier(
            &crate::store::TrustStore::new_empty(),
            checker.provider(),
        )
        .unwrap();
        let result = checker
            .check(&ConnectionTarget::new("bad host name", 443), strict)
            .await;

        assert!(matches!(
            result,
            Err(ToolkitError::Connection(ConnectionError::InvalidHost { .. }))
        ));
    }
}
