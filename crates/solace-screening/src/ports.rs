//! Interfaces to the external capabilities the flow depends on.
//!
//! Each port is a single opaque remote call. Implementations live in the
//! service binary, where they wrap the model, transcription, speech, and
//! HTTP clients.

use async_trait::async_trait;
use solace_core::models::chat_history::HistoryMessage;
use solace_core::models::language::Language;
use solace_core::models::report::SessionReport;

use crate::error::ServiceError;

/// Language-model operations used by the flow.
#[async_trait]
pub trait LanguageOracle: Send + Sync {
    /// Rate how strongly `answer` affirms `question`.
    ///
    /// Returns the integer the model produced; range enforcement is the
    /// caller's job.
    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        language: Language,
    ) -> Result<i64, ServiceError>;

    /// Reply to `message` in free conversation. `history` holds the turns
    /// that came before it.
    async fn chat_reply(
        &self,
        message: &str,
        history: &[HistoryMessage],
        language: Language,
    ) -> Result<String, ServiceError>;

    /// Overall assessment of a whole session. `screening` carries the
    /// structured questionnaire results when any question was answered.
    async fn evaluate_session(
        &self,
        history: &[HistoryMessage],
        screening: Option<&str>,
    ) -> Result<String, ServiceError>;

    /// Condense a free-text depression analysis into a short summary.
    async fn summarize_analysis(&self, text: &str) -> Result<String, ServiceError>;

    /// Fix grammar and recognition errors in a speech transcript.
    async fn correct_transcript(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, ServiceError>;
}

/// Uploaded audio, as received from the client.
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: &AudioInput,
        language: Language,
    ) -> Result<String, ServiceError>;
}

/// Encoded audio ready to be sent back to the client.
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SynthesizedSpeech, ServiceError>;
}

/// Destination for the results payload of a finished session.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver the report. Returns the receiver's JSON reply, or `None`
    /// when forwarding is disabled.
    async fn deliver(
        &self,
        report: &SessionReport,
    ) -> Result<Option<serde_json::Value>, ServiceError>;
}
