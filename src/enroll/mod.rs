//! Enrollment of a captured server certificate into the trust store

pub mod flow;
pub mod selection;

pub use flow::{EnrollmentFlow, EnrollmentOutcome, Stage};
pub use selection::{parse_selection, Selection};
