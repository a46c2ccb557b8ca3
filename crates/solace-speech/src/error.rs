use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to synthesize")]
    EmptyInput,

    #[error("speech request failed: {0}")]
    Http(String),

    #[error("speech endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}
