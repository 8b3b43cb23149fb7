//! Shared helpers for integration tests: a local TLS server with a generated
//! certificate and an operator that answers from a script.

#![allow(dead_code)]

use install_cert::config::Settings;
use install_cert::models::ConnectionTarget;
use install_cert::output::Operator;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::ServerConfig;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

/// Self-signed certificate valid for 127.0.0.1 and localhost
pub fn self_signed() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    self_signed_for(&["127.0.0.1", "localhost"])
}

/// Leaf issued by a freshly generated CA, returned as `[leaf, ca]` plus the leaf key
pub fn ca_signed_chain(
    sans: &[&str],
) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
    let mut ca_params = rcgen::CertificateParams::new(Vec::<String>::new()).expect("ca params");
    ca_params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
    let mut ca_dn = rcgen::DistinguishedName::new();
    ca_dn.push(rcgen::DnType::CommonName, "Install Cert Test CA");
    ca_params.distinguished_name = ca_dn;
    let ca_key = rcgen::KeyPair::generate().expect("ca key");
    let ca = ca_params.self_signed(&ca_key).expect("ca certificate");

    let sans: Vec<String> = sans.iter().map(|s| s.to_string()).collect();
    let mut leaf_params = rcgen::CertificateParams::new(sans).expect("leaf params");
    let mut leaf_dn = rcgen::DistinguishedName::new();
    leaf_dn.push(rcgen::DnType::CommonName, "install-cert test server");
    leaf_params.distinguished_name = leaf_dn;
    let leaf_key = rcgen::KeyPair::generate().expect("leaf key");
    let leaf = leaf_params
        .signed_by(&leaf_key, &ca, &ca_key)
        .expect("leaf certificate");

    (
        vec![leaf.der().clone(), ca.der().clone()],
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    )
}

/// Self-signed certificate valid only for the given names
pub fn self_signed_for(sans: &[&str]) -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let sans: Vec<String> = sans.iter().map(|s| s.to_string()).collect();
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(sans).expect("generate certificate");
    (
        cert.der().clone(),
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der())),
    )
}

/// TLS server on an ephemeral loopback port, stopped on drop
pub struct TestServer {
    pub addr: SocketAddr,
    /// Leaf certificate the server presents
    pub cert_der: Vec<u8>,
    /// Every certificate the server presents, leaf first
    pub chain_der: Vec<Vec<u8>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new("127.0.0.1", self.addr.port())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_tls_server() -> TestServer {
    let (cert, key) = self_signed();
    spawn_tls_server_with(vec![cert], key).await
}

/// TLS server presenting `chain` (leaf first) with the leaf's `key`
pub async fn spawn_tls_server_with(
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> TestServer {
    let chain_der: Vec<Vec<u8>> = chain.iter().map(|c| c.as_ref().to_vec()).collect();
    let cert_der = chain_der.first().cloned().unwrap_or_default();

    let config = ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .expect("server certificate");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 1];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });

    TestServer {
        addr,
        cert_der,
        chain_der,
        handle,
    }
}

/// Server that accepts TCP connections and closes them without speaking TLS
pub async fn spawn_silent_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    TestServer {
        addr,
        cert_der: Vec::new(),
        chain_der: Vec::new(),
        handle,
    }
}

/// Settings writing the output store into `dir`
pub fn settings_in(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.store.output = dir.join("jssecacerts");
    settings.store.store_file_name = dir.join("jssecacerts").display().to_string();
    settings.store.security_dir = Some(dir.join("security"));
    settings.tls.connect_timeout_secs = 5;
    settings.tls.handshake_timeout_secs = 5;
    settings
}

/// Operator answering prompts from a fixed script and recording everything shown
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
    pub prompts: usize,
}

impl ScriptedOperator {
    pub fn answering<const N: usize>(answers: [&str; N]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Operator for ScriptedOperator {
    fn progress(&mut self, message: &str) {
        self.transcript.push(format!("progress: {}", message));
    }

    fn success(&mut self, message: &str) {
        self.transcript.push(format!("success: {}", message));
    }

    fn warning(&mut self, message: &str) {
        self.transcript.push(format!("warning: {}", message));
    }

    fn failure(&mut self, message: &str) {
        self.transcript.push(format!("failure: {}", message));
    }

    fn line(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str, _default: &str) -> std::io::Result<Option<String>> {
        self.prompts += 1;
        self.transcript.push(format!("prompt: {}", prompt));
        Ok(self.answers.pop_front())
    }
}
