//! Conversation shaping for the Converse API.
//!
//! Converse rejects conversations that start with an assistant turn or that
//! contain two consecutive turns from the same role. Session histories do
//! both (every session opens with the assistant asking a question), so they
//! are reshaped before being sent.

use serde::{Deserialize, Serialize};
use solace_core::models::chat_history::{ChatRole, HistoryMessage};

/// A single message sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Build the message list for a chat reply: the tail of `history` followed
/// by `message`, at most `max_messages` long, starting with a user turn and
/// alternating roles.
pub fn conversation_window(
    history: &[HistoryMessage],
    message: &str,
    max_messages: usize,
) -> Vec<ChatMessage> {
    let mut merged: Vec<ChatMessage> = Vec::with_capacity(history.len() + 1);
    let turns = history
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .chain(std::iter::once((ChatRole::User, message)));

    for (role, content) in turns {
        if content.trim().is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(content);
            }
            _ => merged.push(ChatMessage {
                role,
                content: content.to_string(),
            }),
        }
    }

    let keep = max_messages.max(1);
    let mut window = merged.split_off(merged.len().saturating_sub(keep));
    if window.first().is_some_and(|m| m.role == ChatRole::Assistant) {
        window.remove(0);
    }
    window
}
