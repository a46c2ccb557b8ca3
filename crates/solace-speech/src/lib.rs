//! solace-speech
//!
//! Text-to-speech over an OpenAI-compatible `/v1/audio/speech` endpoint.

pub mod error;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::info;

use crate::error::SpeechError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";
pub const DEFAULT_MODEL: &str = "tts-1";
pub const DEFAULT_VOICE: &str = "alloy";

const MP3: &str = "audio/mpeg";

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub model: String,
    pub voice: String,
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Encoded audio returned by the endpoint.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Clone)]
pub struct SpeechClient {
    http: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Speak `text` as MP3.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let body = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            response_format: "mp3",
        };

        let mut request = self.http.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SpeechError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(MP3)
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SpeechError::Http(e.to_string()))?
            .to_vec();

        info!(
            model = %self.config.model,
            voice = %self.config.voice,
            chars = text.chars().count(),
            audio_bytes = bytes.len(),
            "speech synthesized"
        );

        Ok(SynthesizedAudio {
            bytes,
            content_type,
        })
    }
}
