use async_trait::async_trait;
use aws_config::SdkConfig;
use solace_core::models::language::Language;
use solace_screening::error::ServiceError;
use solace_screening::ports::{AudioInput, Transcriber};
use solace_storage::objects::Bucket;
use solace_transcribe::{AudioUpload, PollSettings, resolve_media_format, transcribe_audio};

/// Transcriber backed by Amazon Transcribe, staging audio in `bucket`.
pub struct TranscribeAdapter {
    sdk_config: SdkConfig,
    bucket: Bucket,
    poll: PollSettings,
}

impl TranscribeAdapter {
    pub fn new(sdk_config: SdkConfig, bucket: Bucket) -> Self {
        Self {
            sdk_config,
            bucket,
            poll: PollSettings::default(),
        }
    }
}

#[async_trait]
impl Transcriber for TranscribeAdapter {
    async fn transcribe(
        &self,
        audio: &AudioInput,
        language: Language,
    ) -> Result<String, ServiceError> {
        let (media_format, extension) =
            resolve_media_format(audio.filename.as_deref(), audio.content_type.as_deref())
                .map_err(|e| ServiceError::Transcription(e.to_string()))?;

        let upload = AudioUpload {
            bytes: &audio.bytes,
            media_format,
            extension: &extension,
            language,
        };
        transcribe_audio(&self.sdk_config, &self.bucket, upload, self.poll)
            .await
            .map_err(|e| ServiceError::Transcription(e.to_string()))
    }
}
