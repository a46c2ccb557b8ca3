//! Model calls made by the screening flow.

use aws_sdk_bedrockruntime::Client;
use solace_core::models::chat_history::HistoryMessage;
use solace_core::models::language::Language;
use tracing::warn;

use crate::chat::{ChatMessage, conversation_window};
use crate::context::build_conversation_block;
use crate::error::BedrockError;
use crate::invoke::{InferenceSettings, converse};
use crate::prompts;

const SCORING: InferenceSettings = InferenceSettings {
    max_tokens: 10,
    temperature: 0.0,
};

const CHAT: InferenceSettings = InferenceSettings {
    max_tokens: 300,
    temperature: 0.5,
};

const EVALUATION: InferenceSettings = InferenceSettings {
    max_tokens: 400,
    temperature: 0.5,
};

const SUMMARY: InferenceSettings = InferenceSettings {
    max_tokens: 200,
    temperature: 0.5,
};

const CORRECTION: InferenceSettings = InferenceSettings {
    max_tokens: 300,
    temperature: 0.0,
};

/// Ask the model how strongly `answer` affirms `question`.
///
/// Returns the first integer in the reply, unclamped. A reply with no
/// integer scores 0.
pub async fn score_answer(
    client: &Client,
    model_id: &str,
    question: &str,
    answer: &str,
    language: Language,
) -> Result<i64, BedrockError> {
    let request = prompts::scoring_request(question, answer, language);
    let output = converse(
        client,
        model_id,
        prompts::SCORING_SYSTEM_PROMPT,
        &[ChatMessage::user(request)],
        SCORING,
    )
    .await?;

    Ok(parse_score(&output.text).unwrap_or_else(|| {
        warn!(reply_len = output.text.len(), "no score in model reply, using 0");
        0
    }))
}

/// Free-conversation reply to `message`, given the turns before it.
pub async fn chat_reply(
    client: &Client,
    model_id: &str,
    message: &str,
    history: &[HistoryMessage],
    language: Language,
    window: usize,
) -> Result<String, BedrockError> {
    let messages = conversation_window(history, message, window);
    let output = converse(
        client,
        model_id,
        &prompts::chat_system_prompt(language),
        &messages,
        CHAT,
    )
    .await?;
    Ok(output.text)
}

/// Overall assessment of a session's conversation.
pub async fn evaluate_session(
    client: &Client,
    model_id: &str,
    history: &[HistoryMessage],
    screening: Option<&str>,
) -> Result<String, BedrockError> {
    let conversation = build_conversation_block(history);
    let request = prompts::evaluation_request(&conversation, screening);
    if request.trim().is_empty() {
        return Err(BedrockError::EmptyConversation);
    }

    let output = converse(
        client,
        model_id,
        prompts::EVALUATION_SYSTEM_PROMPT,
        &[ChatMessage::user(request)],
        EVALUATION,
    )
    .await?;
    Ok(output.text)
}

/// Summarize an analysis in at most [`prompts::SUMMARY_MAX_CHARS`] characters.
pub async fn summarize_analysis(
    client: &Client,
    model_id: &str,
    text: &str,
) -> Result<String, BedrockError> {
    let output = converse(
        client,
        model_id,
        prompts::SUMMARY_SYSTEM_PROMPT,
        &[ChatMessage::user(prompts::summary_request(text))],
        SUMMARY,
    )
    .await?;
    Ok(truncate_chars(&output.text, prompts::SUMMARY_MAX_CHARS))
}

/// Clean up a raw speech-recognition transcript.
pub async fn correct_transcript(
    client: &Client,
    model_id: &str,
    transcript: &str,
    language: Language,
) -> Result<String, BedrockError> {
    let output = converse(
        client,
        model_id,
        prompts::CORRECTION_SYSTEM_PROMPT,
        &[ChatMessage::user(prompts::correction_request(transcript, language))],
        CORRECTION,
    )
    .await?;
    Ok(output.text)
}

/// First integer in `text`, with an optional leading minus sign.
pub fn parse_score(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: i64 = digits.parse().ok()?;
    let negative = text[..start].ends_with('-');
    Some(if negative { -value } else { value })
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
