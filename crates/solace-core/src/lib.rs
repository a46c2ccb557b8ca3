//! solace-core
//!
//! Pure domain types and storage key conventions. No AWS SDK dependency;
//! this is the shared vocabulary of the Solace system.

pub mod error;
pub mod models;
pub mod storage_keys;
