use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use solace_core::models::report::SessionReport;
use solace_screening::error::ServiceError;
use solace_screening::ports::ReportSink;

/// Posts finished-session reports as JSON to a downstream URL.
///
/// With no URL configured, delivery is a no-op that reports `None`.
pub struct HttpReportSink {
    http: Client,
    url: Option<String>,
}

impl HttpReportSink {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Delivery(e.to_string()))?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn deliver(&self, report: &SessionReport) -> Result<Option<Value>, ServiceError> {
        let Some(url) = &self.url else {
            tracing::debug!(session_id = %report.session_id, "report forwarding disabled");
            return Ok(None);
        };

        let resp = self
            .http
            .post(url)
            .json(report)
            .send()
            .await
            .map_err(|e| ServiceError::Delivery(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ServiceError::Delivery(format!(
                "receiver returned {status}: {body}"
            )));
        }

        tracing::info!(
            session_id = %report.session_id,
            status = status.as_u16(),
            "report delivered"
        );
        Ok(Some(parse_reply(body)))
    }
}

/// Receivers are expected to reply with JSON; anything else is kept as text.
fn parse_reply(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
