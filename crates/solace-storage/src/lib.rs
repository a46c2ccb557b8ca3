//! solace-storage
//!
//! S3 operations. Thin wrapper around the AWS S3 SDK, used for persisted
//! session records and for staging audio for transcription.

pub mod client;
pub mod error;
pub mod objects;
pub mod state;
