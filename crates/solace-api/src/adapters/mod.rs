//! Implementations of the screening ports on top of AWS and HTTP clients.

pub mod oracle;
pub mod reports;
pub mod sessions;
pub mod speech;
pub mod transcription;
