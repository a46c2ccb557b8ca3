use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::middleware::audit::audit_log;
use crate::middleware::session::session_cookie;
use crate::routes::{chatbot, health, questionnaires};
use crate::state::AppState;

/// Largest accepted voice upload.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let chatbot = Router::new()
        .route("/start", post(chatbot::start))
        .route("/chat", post(chatbot::chat))
        .route(
            "/voice",
            post(chatbot::voice).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .route("/end", post(chatbot::end))
        .route("/analyze", post(chatbot::analyze))
        .route_layer(axum_mw::from_fn_with_state(state.clone(), session_cookie));

    // Credentials are only granted to configured origins. The cookie is
    // SameSite=Lax, so cross-site fetches also need a same-site frontend.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/questionnaires",
            get(questionnaires::list_questionnaires),
        )
        .route(
            "/api/questionnaires/{id}",
            get(questionnaires::get_questionnaire_detail),
        )
        .nest("/api/chatbot", chatbot)
        .layer(axum_mw::from_fn(audit_log))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use axum::body::{Body, Bytes, to_bytes};
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, COOKIE, ORIGIN, SET_COOKIE,
    };
    use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
    use jiff::SignedDuration;
    use serde_json::{Value, json};
    use solace_core::models::chat_history::HistoryMessage;
    use solace_core::models::language::Language;
    use solace_core::models::report::SessionReport;
    use solace_instruments::instruments::phq9::Phq9;
    use solace_screening::error::ServiceError;
    use solace_screening::flow::{Collaborators, ScreeningFlow};
    use solace_screening::ports::{
        AudioInput, LanguageOracle, ReportSink, SpeechSynthesizer, SynthesizedSpeech, Transcriber,
    };
    use solace_screening::store::MemorySessionStore;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::chatbot::TURN_KIND_HEADER;

    const FRONTEND: &str = "https://screening.example.org";

    struct EchoOracle;

    #[async_trait]
    impl LanguageOracle for EchoOracle {
        async fn score_answer(&self, _: &str, answer: &str, _: Language) -> Result<i64, ServiceError> {
            Ok(answer.trim().parse().unwrap_or(0))
        }

        async fn chat_reply(
            &self,
            message: &str,
            _: &[HistoryMessage],
            _: Language,
        ) -> Result<String, ServiceError> {
            if message == "fail" {
                return Err(ServiceError::Oracle("model throttled".into()));
            }
            Ok(format!("you said: {message}"))
        }

        async fn evaluate_session(
            &self,
            _: &[HistoryMessage],
            _: Option<&str>,
        ) -> Result<String, ServiceError> {
            Ok("steady mood overall".into())
        }

        async fn summarize_analysis(&self, text: &str) -> Result<String, ServiceError> {
            Ok(format!("summary of {} chars", text.chars().count()))
        }

        async fn correct_transcript(&self, text: &str, _: Language) -> Result<String, ServiceError> {
            Ok(text.trim().to_string())
        }
    }

    struct FixedTranscriber;

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _: &AudioInput, _: Language) -> Result<String, ServiceError> {
            Ok(" 2 ".into())
        }
    }

    struct ToneSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for ToneSynthesizer {
        async fn synthesize(&self, _: &str, _: Language) -> Result<SynthesizedSpeech, ServiceError> {
            Ok(SynthesizedSpeech {
                bytes: b"ID3tone".to_vec(),
                content_type: "audio/mpeg".into(),
            })
        }
    }

    #[derive(Default)]
    struct AckSink {
        fail: AtomicBool,
    }

    #[async_trait]
    impl ReportSink for AckSink {
        async fn deliver(&self, report: &SessionReport) -> Result<Option<Value>, ServiceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ServiceError::Delivery("receiver down".into()));
            }
            Ok(Some(json!({ "received": report.user_id })))
        }
    }

    fn app_with_sink(sink: Arc<AckSink>) -> Router {
        let flow = ScreeningFlow::new(
            Box::new(Phq9),
            Collaborators {
                oracle: Arc::new(EchoOracle),
                transcriber: Arc::new(FixedTranscriber),
                synthesizer: Arc::new(ToneSynthesizer),
                reports: sink,
                store: Arc::new(MemorySessionStore::default()),
            },
        );
        router(AppState {
            flow: Arc::new(flow),
            session_ttl: SignedDuration::from_secs(600),
            allowed_origins: vec![HeaderValue::from_static(FRONTEND)],
        })
    }

    fn app() -> Router {
        app_with_sink(Arc::new(AckSink::default()))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    fn post_json(path: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::post(path).header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn json_body(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    /// `solace_session=<id>` from a response's Set-Cookie header.
    fn session_cookie_of(headers: &HeaderMap) -> String {
        let value = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.contains("HttpOnly"));
        value.split(';').next().unwrap().to_string()
    }

    async fn start_session(app: &Router) -> String {
        let (status, headers, body) = send(
            app,
            post_json(
                "/api/chatbot/start",
                None,
                json!({ "user_id": "user-7", "language": "en" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["user_id"], "user-7");
        assert_eq!(body["question_number"], 1);
        session_cookie_of(&headers)
    }

    fn voice_request(cookie: &str, field: &str) -> Request<Body> {
        let body = format!(
            "--XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"answer.wav\"\r\n\
             Content-Type: audio/wav\r\n\r\n\
             RIFFfake\r\n\
             --XBOUNDARY--\r\n"
        );
        Request::post("/api/chatbot/voice")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .header(COOKIE, cookie)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health() {
        let (status, _, body) = send(
            &app(),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn questionnaire_listing_and_detail() {
        let app = app();
        let (status, _, body) = send(
            &app,
            Request::get("/api/questionnaires").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!([{ "id": "phq9", "name": "PHQ-9", "item_count": 9 }])
        );

        let (status, _, body) = send(
            &app,
            Request::get("/api/questionnaires/phq9").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let detail = json_body(&body);
        assert_eq!(detail["max_total"], 27);
        assert_eq!(detail["items"].as_array().unwrap().len(), 9);

        let (status, _, _) = send(
            &app,
            Request::get("/api/questionnaires/gad7").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn start_requires_user_id() {
        let (status, headers, body) =
            send(&app(), post_json("/api/chatbot/start", None, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "User ID is required");
        assert!(headers.contains_key(SET_COOKIE));
    }

    #[tokio::test]
    async fn start_rejects_unknown_language() {
        let (status, _, _) = send(
            &app(),
            post_json(
                "/api/chatbot/start",
                None,
                json!({ "user_id": "u", "language": "fr" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_without_session_is_forbidden() {
        let (status, _, body) = send(
            &app(),
            post_json("/api/chatbot/chat", None, json!({ "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("session"));
    }

    #[tokio::test]
    async fn chat_requires_message() {
        let app = app();
        let cookie = start_session(&app).await;
        let (status, _, body) = send(
            &app,
            post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "Message field is required");
    }

    #[tokio::test]
    async fn full_screening_then_chat_then_end() {
        let app = app();
        let cookie = start_session(&app).await;

        for number in 2..=9 {
            let (status, _, body) = send(
                &app,
                post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "1" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let body = json_body(&body);
            assert_eq!(body["kind"], "question");
            assert_eq!(body["question_number"], number);
        }

        let (_, _, body) = send(
            &app,
            post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "1" })),
        )
        .await;
        let body = json_body(&body);
        assert_eq!(body["kind"], "completed");
        assert_eq!(body["total_score"], 9);
        assert_eq!(body["severity"], "mild");

        let (_, _, body) = send(
            &app,
            post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "thanks" })),
        )
        .await;
        let body = json_body(&body);
        assert_eq!(body["kind"], "chat");
        assert_eq!(body["response"], "you said: thanks");

        let (status, _, body) =
            send(&app, post_json("/api/chatbot/end", Some(&cookie), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["server_response"], json!({ "received": "user-7" }));

        let (status, _, _) = send(
            &app,
            post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let app = app();
        let cookie = start_session(&app).await;
        for _ in 0..9 {
            send(
                &app,
                post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "0" })),
            )
            .await;
        }
        let (status, _, body) = send(
            &app,
            post_json("/api/chatbot/chat", Some(&cookie), json!({ "message": "fail" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!json_body(&body)["error"].as_str().unwrap().contains("throttled"));
    }

    #[tokio::test]
    async fn failed_delivery_keeps_session() {
        let sink = Arc::new(AckSink::default());
        let app = app_with_sink(sink.clone());
        let cookie = start_session(&app).await;

        sink.fail.store(true, Ordering::SeqCst);
        let (status, _, _) =
            send(&app, post_json("/api/chatbot/end", Some(&cookie), json!({}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        sink.fail.store(false, Ordering::SeqCst);
        let (status, _, _) =
            send(&app, post_json("/api/chatbot/end", Some(&cookie), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn analyze() {
        let app = app();
        let (status, _, body) =
            send(&app, post_json("/api/chatbot/analyze", None, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "Text field is required");

        let (status, _, body) = send(
            &app,
            post_json("/api/chatbot/analyze", None, json!({ "text": "low mood" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["summary"], "summary of 8 chars");
    }

    #[tokio::test]
    async fn voice_turn_returns_audio() {
        let app = app();
        let cookie = start_session(&app).await;

        let (status, headers, body) = send(&app, voice_request(&cookie, "file")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[CONTENT_TYPE], "audio/mpeg");
        assert_eq!(headers[TURN_KIND_HEADER], "question");
        assert_eq!(&body[..], b"ID3tone");
    }

    #[tokio::test]
    async fn voice_requires_file_field() {
        let app = app();
        let cookie = start_session(&app).await;

        let (status, _, body) = send(&app, voice_request(&cookie, "recording")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "Audio file is required");
    }

    #[tokio::test]
    async fn voice_without_session_is_forbidden() {
        let (status, _, _) = send(
            &app(),
            voice_request("solace_session=00000000-0000-0000-0000-000000000001", "file"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::options("/api/chatbot/start")
            .header(ORIGIN, origin)
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn configured_origin_may_send_credentials() {
        let (status, headers, _) = send(&app(), preflight(FRONTEND)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], FRONTEND);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_grant() {
        let (_, headers, _) = send(&app(), preflight("https://elsewhere.example.net")).await;
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let (status, headers, _) = send(
            &app(),
            Request::get("/health")
                .header(ORIGIN, "https://elsewhere.example.net")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
