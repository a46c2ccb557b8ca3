use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use solace_core::error::CoreError;
use solace_instruments::error::InstrumentError;
use solace_screening::error::{FlowError, ServiceError};

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    /// A downstream service (model, transcription, speech, report receiver)
    /// failed. The detail is logged, not returned.
    Upstream(ServiceError),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Upstream(err) => {
                tracing::error!(error = %err, "upstream failure");
                (StatusCode::BAD_GATEWAY, upstream_message(&err).to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn upstream_message(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Oracle(_) => "language model unavailable",
        ServiceError::Transcription(_) => "transcription failed",
        ServiceError::Synthesis(_) => "speech synthesis failed",
        ServiceError::Delivery(_) => "report delivery failed; the session was kept, retry later",
    }
}

impl From<FlowError> for ApiError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::NoSession => ApiError::Forbidden(e.to_string()),
            FlowError::InvalidInput(msg) => ApiError::BadRequest(msg),
            FlowError::Service(err) => ApiError::Upstream(err),
            FlowError::Store(_) | FlowError::CorruptState(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<InstrumentError> for ApiError {
    fn from(e: InstrumentError) -> Self {
        match e {
            InstrumentError::UnknownQuestionnaire(_) => ApiError::NotFound(e.to_string()),
            InstrumentError::Validation(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}
