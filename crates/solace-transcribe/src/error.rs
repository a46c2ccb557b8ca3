use solace_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("transcription job failed: {0}")]
    JobFailed(String),

    #[error("transcription job {job_name} did not finish within {waited_secs}s")]
    TimedOut { job_name: String, waited_secs: u64 },

    #[error("transcription API error: {0}")]
    Api(String),

    #[error("failed to parse transcript: {0}")]
    Parse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
