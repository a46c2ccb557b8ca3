use thiserror::Error;

/// Failure of an external collaborator behind one of the ports.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("language model call failed: {0}")]
    Oracle(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("report delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
#[error("session store error: {0}")]
pub struct StoreError(pub String);

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("session expired or invalid; start a new session")]
    NoSession,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("corrupt session state: {0}")]
    CorruptState(String),
}
