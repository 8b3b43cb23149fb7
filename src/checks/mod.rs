//! Check modules for install-cert
//!
//! The handshake that captures the server chain and the trust decisions it
//! runs through.

pub mod capture;
pub mod handshake;
pub mod trust;

pub use capture::{CapturingVerifier, ChainCapture};
pub use handshake::{HandshakeChecker, HandshakeReport, HandshakeStatus};
pub use trust::{crypto_provider, strict_verifier};
