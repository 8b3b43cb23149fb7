//! Trust store module
//!
//! Locating, loading, updating and persisting the trust store that receives
//! enrolled certificates.

pub mod keystore;
pub mod locate;

pub use keystore::TrustStore;
pub use locate::{candidates, locate};
