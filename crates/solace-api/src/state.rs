use std::sync::Arc;

use axum::http::HeaderValue;
use jiff::SignedDuration;
use solace_screening::flow::ScreeningFlow;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<ScreeningFlow>,
    /// Idle lifetime of a session; also the session cookie's Max-Age.
    pub session_ttl: SignedDuration,
    /// Browser origins allowed to call the API with the session cookie.
    pub allowed_origins: Vec<HeaderValue>,
}
