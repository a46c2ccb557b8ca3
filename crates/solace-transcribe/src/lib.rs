//! solace-transcribe
//!
//! Speech-to-text via Amazon Transcribe. Audio is staged in the session
//! bucket, transcribed by a batch job, and every temporary object is
//! removed afterwards.

pub mod error;

pub use aws_sdk_transcribe::types::MediaFormat;

use std::time::Duration;

use aws_sdk_transcribe::types::{LanguageCode, Media, TranscriptionJobStatus};
use solace_core::models::language::Language;
use solace_core::storage_keys;
use solace_storage::objects::Bucket;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::TranscribeError;

/// How long to wait for a job, and how often to ask.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Audio to transcribe, as received from the client.
pub struct AudioUpload<'a> {
    pub bytes: &'a [u8],
    pub media_format: MediaFormat,
    pub extension: &'a str,
    pub language: Language,
}

/// Transcribe `upload` and return the plain transcript.
///
/// The audio is uploaded under `_transcribe/input/`, the job writes its
/// result under `_transcribe/output/`, and both objects plus the job itself
/// are deleted before returning, whether or not the job succeeded.
pub async fn transcribe_audio(
    config: &aws_config::SdkConfig,
    bucket: &Bucket,
    upload: AudioUpload<'_>,
    poll: PollSettings,
) -> Result<String, TranscribeError> {
    let transcribe = aws_sdk_transcribe::Client::new(config);

    let job_name = format!("solace-{}", Uuid::new_v4());
    let input_key = storage_keys::transcribe_input(&job_name, upload.extension);
    let output_key = storage_keys::transcribe_output(&job_name);

    bucket.put(&input_key, upload.bytes.to_vec(), None).await?;

    let result = run_job(
        &transcribe,
        bucket,
        &job_name,
        &input_key,
        &output_key,
        &upload,
        poll,
    )
    .await;

    if let Err(e) = bucket.delete(&input_key).await {
        warn!(job_name, error = %e, "failed to delete staged audio");
    }
    if let Err(e) = bucket.delete(&output_key).await {
        warn!(job_name, error = %e, "failed to delete transcript output");
    }
    if let Err(e) = transcribe
        .delete_transcription_job()
        .transcription_job_name(&job_name)
        .send()
        .await
    {
        warn!(job_name, error = %e.into_service_error(), "failed to delete transcription job");
    }

    result
}

async fn run_job(
    transcribe: &aws_sdk_transcribe::Client,
    bucket: &Bucket,
    job_name: &str,
    input_key: &str,
    output_key: &str,
    upload: &AudioUpload<'_>,
    poll: PollSettings,
) -> Result<String, TranscribeError> {
    let media_uri = bucket.uri(input_key);
    info!(job_name, media_uri, language = %upload.language, "starting transcription job");

    transcribe
        .start_transcription_job()
        .transcription_job_name(job_name)
        .media(Media::builder().media_file_uri(&media_uri).build())
        .media_format(upload.media_format.clone())
        .language_code(language_code(upload.language))
        .output_bucket_name(bucket.name())
        .output_key(output_key)
        .send()
        .await
        .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

    let started = tokio::time::Instant::now();
    loop {
        tokio::time::sleep(poll.interval).await;

        let resp = transcribe
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

        let job = resp
            .transcription_job()
            .ok_or_else(|| TranscribeError::Api("no job in response".into()))?;

        match job.transcription_job_status() {
            Some(TranscriptionJobStatus::Completed) => break,
            Some(TranscriptionJobStatus::Failed) => {
                let reason = job.failure_reason().unwrap_or("unknown").to_string();
                return Err(TranscribeError::JobFailed(reason));
            }
            _ if started.elapsed() >= poll.timeout => {
                return Err(TranscribeError::TimedOut {
                    job_name: job_name.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            _ => continue,
        }
    }

    info!(job_name, "transcription complete, reading result");

    let object = bucket.get(output_key).await?;
    let json =
        String::from_utf8(object.body).map_err(|e| TranscribeError::Parse(e.to_string()))?;
    extract_transcript_text(&json)
}

/// Extract plain text from the Transcribe JSON result.
///
/// ```json
/// { "results": { "transcripts": [{ "transcript": "the text..." }] } }
/// ```
pub fn extract_transcript_text(json: &str) -> Result<String, TranscribeError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| TranscribeError::Parse(e.to_string()))?;

    let text = value
        .get("results")
        .and_then(|r| r.get("transcripts"))
        .and_then(|t| t.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.get("transcript").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Ok(text.trim().to_string())
}

pub fn language_code(language: Language) -> LanguageCode {
    match language {
        Language::Korean => LanguageCode::KoKr,
        Language::English => LanguageCode::EnUs,
    }
}

/// Map a file extension to an Amazon Transcribe `MediaFormat`.
///
/// Returns `None` for extensions that aren't supported audio formats.
pub fn media_format_for_extension(ext: &str) -> Option<MediaFormat> {
    match ext.trim_start_matches('.').to_lowercase().as_str() {
        "mp3" => Some(MediaFormat::Mp3),
        "mp4" | "m4a" => Some(MediaFormat::Mp4),
        "wav" => Some(MediaFormat::Wav),
        "flac" => Some(MediaFormat::Flac),
        "ogg" => Some(MediaFormat::Ogg),
        "amr" => Some(MediaFormat::Amr),
        "webm" => Some(MediaFormat::Webm),
        _ => None,
    }
}

/// Map a MIME type to a format and the extension used when staging it.
pub fn media_format_for_content_type(content_type: &str) -> Option<(MediaFormat, &'static str)> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => Some((MediaFormat::Mp3, "mp3")),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "video/mp4" => Some((MediaFormat::Mp4, "mp4")),
        "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => {
            Some((MediaFormat::Wav, "wav"))
        }
        "audio/flac" | "audio/x-flac" => Some((MediaFormat::Flac, "flac")),
        "audio/ogg" | "application/ogg" => Some((MediaFormat::Ogg, "ogg")),
        "audio/amr" => Some((MediaFormat::Amr, "amr")),
        "audio/webm" | "video/webm" => Some((MediaFormat::Webm, "webm")),
        _ => None,
    }
}

/// Resolve the format of an upload from its filename, then its MIME type.
pub fn resolve_media_format(
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<(MediaFormat, String), TranscribeError> {
    let extension = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    if let Some(ext) = &extension
        && let Some(format) = media_format_for_extension(ext)
    {
        return Ok((format, ext.clone()));
    }
    if let Some((format, ext)) = content_type.and_then(media_format_for_content_type) {
        return Ok((format, ext.to_string()));
    }

    Err(TranscribeError::UnsupportedFormat(
        extension
            .or_else(|| content_type.map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string()),
    ))
}
