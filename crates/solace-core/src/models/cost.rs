//! Model token accounting.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Input and output tokens of one or more model calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Tokens consumed by a model call and their estimated price.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenUsage {
    pub tokens: TokenCount,
    pub cost_usd: f64,
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn estimate_cost(&self, tokens: TokenCount) -> f64 {
        let per_token = |count: u64, per_million: f64| count as f64 * per_million / 1_000_000.0;
        per_token(tokens.input, self.input_per_million)
            + per_token(tokens.output, self.output_per_million)
    }

    pub fn usage(&self, tokens: TokenCount) -> TokenUsage {
        TokenUsage {
            tokens,
            cost_usd: self.estimate_cost(tokens),
        }
    }
}
