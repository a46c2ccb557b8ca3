//! Object key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! the Solace bucket.

use uuid::Uuid;

pub const SESSIONS_PREFIX: &str = "sessions/";

pub fn session(id: Uuid) -> String {
    format!("{SESSIONS_PREFIX}{id}.json")
}

pub fn transcribe_input(job_name: &str, extension: &str) -> String {
    format!("_transcribe/input/{job_name}.{extension}")
}

pub fn transcribe_output(job_name: &str) -> String {
    format!("_transcribe/output/{job_name}.json")
}
