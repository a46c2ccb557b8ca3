//! solace-bedrock
//!
//! Language-model calls over the Bedrock Converse API: answer scoring,
//! supportive chat, session evaluation, analysis summaries, and transcript
//! correction.

pub mod chat;
pub mod client;
pub mod context;
pub mod error;
pub mod invoke;
pub mod prompts;
pub mod screening;
pub mod tokens;
