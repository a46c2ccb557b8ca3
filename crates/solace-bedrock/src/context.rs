//! Conversation transcript block for evaluation prompts.

use solace_core::models::chat_history::HistoryMessage;

/// Render a session history as `role: content` lines inside a
/// `<conversation>` block. An empty history renders as an empty string.
pub fn build_conversation_block(history: &[HistoryMessage]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut block = String::from("<conversation>\n");
    for message in history {
        block.push_str(message.role.as_str());
        block.push_str(": ");
        block.push_str(message.content.trim_end());
        block.push('\n');
    }
    block.push_str("</conversation>");
    block
}
