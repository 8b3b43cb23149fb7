//! Data models for install-cert
//!
//! This module contains the data structures passed between the handshake,
//! the enrollment flow and the trust store.

pub mod certificate;
pub mod target;

pub use certificate::{Certificate, CertificateChain};
pub use target::ConnectionTarget;
