use async_trait::async_trait;
use solace_core::models::language::Language;
use solace_screening::error::ServiceError;
use solace_screening::ports::{SpeechSynthesizer, SynthesizedSpeech};
use solace_speech::SpeechClient;

pub struct SpeechAdapter {
    client: SpeechClient,
}

impl SpeechAdapter {
    pub fn new(client: SpeechClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechAdapter {
    /// The configured voice is multilingual, so `language` only shows up
    /// in the logs.
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SynthesizedSpeech, ServiceError> {
        tracing::debug!(language = %language, "synthesizing reply");
        let audio = self
            .client
            .synthesize(text)
            .await
            .map_err(|e| ServiceError::Synthesis(e.to_string()))?;
        Ok(SynthesizedSpeech {
            bytes: audio.bytes,
            content_type: audio.content_type,
        })
    }
}
