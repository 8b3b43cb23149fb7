//! Output module
//!
//! Operator console and the text shown for captured certificates.

pub mod cert_listing;
pub mod operator;

pub use cert_listing::{format_certificate_details, format_chain_listing};
pub use operator::{Operator, TerminalOperator};
