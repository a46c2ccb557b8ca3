//! Startup configuration, read once from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use eyre::{WrapErr, eyre};
use jiff::SignedDuration;
use solace_speech::SpeechConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET: &str = "solace";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-haiku-4-5-20251001-v1:0";

/// Where session records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    S3,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub region: String,
    pub bucket: String,
    pub model_id: String,
    pub session_backend: SessionBackend,
    pub session_ttl: SignedDuration,
    /// Most history messages sent with a chat turn.
    pub chat_window: usize,
    /// Receiver of end-of-session reports. Forwarding is off when unset.
    pub report_url: Option<String>,
    pub speech: SpeechConfig,
    pub http_timeout: Duration,
    /// Browser origins granted credentialed CORS. Empty means same-origin only.
    pub allowed_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind_addr = or("SOLACE_BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .wrap_err("invalid SOLACE_BIND_ADDR")?;

        let session_backend = match or("SOLACE_SESSION_BACKEND", "memory")
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => SessionBackend::Memory,
            "s3" => SessionBackend::S3,
            other => return Err(eyre!("unknown SOLACE_SESSION_BACKEND: {other}")),
        };

        let ttl_secs: i64 = or("SOLACE_SESSION_TTL_SECS", "600")
            .parse()
            .wrap_err("invalid SOLACE_SESSION_TTL_SECS")?;
        if ttl_secs <= 0 {
            return Err(eyre!("SOLACE_SESSION_TTL_SECS must be positive"));
        }

        let chat_window: usize = or("SOLACE_CHAT_WINDOW", "20")
            .parse()
            .wrap_err("invalid SOLACE_CHAT_WINDOW")?;

        let timeout_secs: u64 = or("SOLACE_HTTP_TIMEOUT_SECS", "30")
            .parse()
            .wrap_err("invalid SOLACE_HTTP_TIMEOUT_SECS")?;
        let http_timeout = Duration::from_secs(timeout_secs);

        let speech = SpeechConfig {
            endpoint: or("SOLACE_SPEECH_URL", solace_speech::DEFAULT_ENDPOINT),
            api_key: get("SOLACE_SPEECH_API_KEY"),
            model: or("SOLACE_SPEECH_MODEL", solace_speech::DEFAULT_MODEL),
            voice: or("SOLACE_SPEECH_VOICE", solace_speech::DEFAULT_VOICE),
            timeout: http_timeout,
        };

        let allowed_origins = get("SOLACE_ALLOWED_ORIGINS")
            .map(|list| parse_origins(&list))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            region: or("AWS_REGION", DEFAULT_REGION),
            bucket: or("SOLACE_BUCKET", DEFAULT_BUCKET),
            model_id: or("SOLACE_MODEL_ID", DEFAULT_MODEL_ID),
            session_backend,
            session_ttl: SignedDuration::from_secs(ttl_secs),
            chat_window,
            report_url: get("SOLACE_REPORT_URL"),
            speech,
            http_timeout,
            allowed_origins,
        })
    }
}

/// Comma-separated origins such as `https://app.example.com`.
fn parse_origins(list: &str) -> eyre::Result<Vec<HeaderValue>> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(eyre!("SOLACE_ALLOWED_ORIGINS cannot be a wildcard"));
            }
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .wrap_err_with(|| format!("invalid origin in SOLACE_ALLOWED_ORIGINS: {origin}"))
        })
        .collect()
}
