use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use solace_core::models::chat_history::ChatRole;
use solace_core::models::cost::{TokenCount, TokenUsage};
use tracing::info;

use crate::chat::ChatMessage;
use crate::error::BedrockError;
use crate::tokens;

/// Sampling limits for one call.
#[derive(Debug, Clone, Copy)]
pub struct InferenceSettings {
    pub max_tokens: i32,
    pub temperature: f32,
}

/// The model's reply and what it cost.
#[derive(Debug, Clone)]
pub struct ConverseOutput {
    pub text: String,
    pub usage: TokenUsage,
}

/// Core invocation using the Bedrock Converse API.
pub async fn converse(
    client: &Client,
    model_id: &str,
    system_prompt: &str,
    messages: &[ChatMessage],
    settings: InferenceSettings,
) -> Result<ConverseOutput, BedrockError> {
    if messages.is_empty() {
        return Err(BedrockError::EmptyConversation);
    }

    let converse_messages = messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                ChatRole::User => ConversationRole::User,
                ChatRole::Assistant => ConversationRole::Assistant,
            };
            Message::builder()
                .role(role)
                .content(ContentBlock::Text(msg.content.clone()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(system_prompt.to_string()))
        .set_messages(Some(converse_messages))
        .inference_config(
            InferenceConfiguration::builder()
                .max_tokens(settings.max_tokens)
                .temperature(settings.temperature)
                .build(),
        )
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

    let text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string();

    let pricing = tokens::get_pricing(model_id);
    let token_count = response
        .usage()
        .map(tokens::extract_token_usage)
        .unwrap_or_default();
    let usage = tokens::calculate_cost(token_count, pricing.as_ref());

    log_usage(model_id, usage);

    Ok(ConverseOutput { text, usage })
}

fn log_usage(model_id: &str, usage: TokenUsage) {
    let TokenCount { input, output } = usage.tokens;
    info!(
        model = model_id,
        input_tokens = input,
        output_tokens = output,
        cost_usd = usage.cost_usd,
        "converse complete"
    );
}
