//! Chatbot session endpoints. Every handler here runs behind the session
//! cookie middleware and finds its [`SessionId`] in the request extensions.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Multipart, State};
use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use solace_core::models::language::Language;
use solace_screening::flow::{StartOutcome, TurnOutcome};
use solace_screening::ports::AudioInput;

use crate::error::ApiError;
use crate::middleware::session::SessionId;
use crate::state::AppState;

/// Name of the multipart field carrying the recording.
pub const AUDIO_FIELD: &str = "file";

/// Response header naming which kind of turn a voice reply answers.
pub const TURN_KIND_HEADER: &str = "x-solace-turn";

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    user_id: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    text: Option<String>,
}

#[derive(Serialize)]
pub struct EndResponse {
    response: String,
    server_response: Option<Value>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    summary: String,
}

/// Missing or unparseable bodies are treated as empty so the handler can
/// report which field is required.
fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "request body rejected");
            T::default()
        }
    }
}

pub async fn start(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartOutcome>, ApiError> {
    let body = body_or_default(body);
    let language = match body.language.as_deref().map(str::trim) {
        None | Some("") => Language::default(),
        Some(code) => code.parse::<Language>()?,
    };
    let user_id = body.user_id.unwrap_or_default();

    let outcome = state.flow.start(session_id, &user_id, language).await?;
    Ok(Json(outcome))
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let message = body_or_default(body).message.unwrap_or_default();
    let outcome = state.flow.handle_message(session_id, &message).await?;
    Ok(Json(outcome))
}

pub async fn voice(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let audio = match multipart {
        Ok(multipart) => read_audio(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "voice upload rejected");
            None
        }
    }
    .ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    if let Err(e) =
        solace_transcribe::resolve_media_format(audio.filename.as_deref(), audio.content_type.as_deref())
    {
        return Err(ApiError::BadRequest(e.to_string()));
    }

    let outcome = state.flow.voice_turn(session_id, audio).await?;

    let content_type = HeaderValue::from_str(&outcome.speech.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("audio/mpeg"));
    let mut response = outcome.speech.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(TURN_KIND_HEADER, HeaderValue::from_static(turn_kind(&outcome.turn)));
    Ok(response)
}

fn turn_kind(turn: &TurnOutcome) -> &'static str {
    match turn {
        TurnOutcome::Question { .. } => "question",
        TurnOutcome::Completed { .. } => "completed",
        TurnOutcome::Chat { .. } => "chat",
    }
}

/// Pull the audio field out of a multipart body. `None` when absent or empty.
async fn read_audio(mut multipart: Multipart) -> Result<Option<AudioInput>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(AudioInput {
            bytes: bytes.to_vec(),
            filename,
            content_type,
        }));
    }
    Ok(None)
}

pub async fn end(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
) -> Result<Json<EndResponse>, ApiError> {
    let outcome = state.flow.end(session_id).await?;
    Ok(Json(EndResponse {
        response: outcome.response,
        server_response: outcome.server_response,
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let text = body_or_default(body).text.unwrap_or_default();
    let summary = state.flow.analyze(&text).await?;
    Ok(Json(AnalyzeResponse { summary }))
}
