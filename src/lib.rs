//! install-cert library
//!
//! Bootstraps trust in a TLS server whose certificate is not yet in a local
//! trust store:
//! - Captures the chain the server presents, even when verification fails
//! - Shows subject, issuer and fingerprints of each certificate
//! - Adds the selected certificate to a PKCS#12 trust store
//!
//! # Usage
//!
//! ```rust,ignore
//! use install_cert::config::Settings;
//! use install_cert::enroll::EnrollmentFlow;
//! use install_cert::models::ConnectionTarget;
//! use install_cert::output::TerminalOperator;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let target = ConnectionTarget::new("internal.example.com", 443);
//!     let mut flow = EnrollmentFlow::new(Settings::default(), target, TerminalOperator::stdin());
//!     let outcome = flow.run().await;
//!     // Inspect outcome...
//! }
//! ```

pub mod certificate;
pub mod checks;
pub mod cli;
pub mod config;
pub mod enroll;
pub mod models;
pub mod output;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use enroll::{EnrollmentFlow, EnrollmentOutcome};
pub use utils::{Result, ToolkitError};
