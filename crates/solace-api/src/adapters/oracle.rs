use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use solace_bedrock::error::BedrockError;
use solace_bedrock::screening;
use solace_core::models::chat_history::HistoryMessage;
use solace_core::models::language::Language;
use solace_screening::error::ServiceError;
use solace_screening::ports::LanguageOracle;

/// Language oracle backed by the Bedrock Converse API.
pub struct BedrockOracle {
    client: Client,
    model_id: String,
    chat_window: usize,
}

impl BedrockOracle {
    pub fn new(client: Client, model_id: impl Into<String>, chat_window: usize) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            chat_window,
        }
    }
}

fn oracle_error(e: BedrockError) -> ServiceError {
    ServiceError::Oracle(e.to_string())
}

#[async_trait]
impl LanguageOracle for BedrockOracle {
    async fn score_answer(
        &self,
        question: &str,
        answer: &str,
        language: Language,
    ) -> Result<i64, ServiceError> {
        screening::score_answer(&self.client, &self.model_id, question, answer, language)
            .await
            .map_err(oracle_error)
    }

    async fn chat_reply(
        &self,
        message: &str,
        history: &[HistoryMessage],
        language: Language,
    ) -> Result<String, ServiceError> {
        screening::chat_reply(
            &self.client,
            &self.model_id,
            message,
            history,
            language,
            self.chat_window,
        )
        .await
        .map_err(oracle_error)
    }

    async fn evaluate_session(
        &self,
        history: &[HistoryMessage],
        screening_results: Option<&str>,
    ) -> Result<String, ServiceError> {
        screening::evaluate_session(&self.client, &self.model_id, history, screening_results)
            .await
            .map_err(oracle_error)
    }

    async fn summarize_analysis(&self, text: &str) -> Result<String, ServiceError> {
        screening::summarize_analysis(&self.client, &self.model_id, text)
            .await
            .map_err(oracle_error)
    }

    async fn correct_transcript(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, ServiceError> {
        screening::correct_transcript(&self.client, &self.model_id, text, language)
            .await
            .map_err(oracle_error)
    }
}
