use solace_core::models::cost::{ModelPricing, TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(
    usage: &aws_sdk_bedrockruntime::types::TokenUsage,
) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Attach a cost to a token count. Unknown pricing costs nothing.
pub fn calculate_cost(tokens: TokenCount, pricing: Option<&ModelPricing>) -> TokenUsage {
    match pricing {
        Some(pricing) => pricing.usage(tokens),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

/// On-demand pricing for the Anthropic models this service can run on.
/// Matches both bare model ids and `us.` inference profile ids.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") => Some(ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }),
        id if id.contains("claude-haiku-4-5") => Some(ModelPricing {
            input_per_million: 1.0,
            output_per_million: 5.0,
        }),
        id if id.contains("claude-3-5-haiku") => Some(ModelPricing {
            input_per_million: 0.80,
            output_per_million: 4.0,
        }),
        _ => None,
    }
}
