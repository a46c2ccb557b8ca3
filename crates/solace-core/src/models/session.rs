use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::chat_history::{ChatRole, HistoryMessage};
use super::language::Language;

/// Server-side state of one screening/conversation session.
///
/// Keyed by the session cookie. `scores` holds one entry per answered
/// question, so `scores.len() == question_index` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    pub session_id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub language: Language,
    pub question_index: usize,
    pub scores: Vec<u8>,
    pub completed: bool,
    pub history: Vec<HistoryMessage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionState {
    pub fn new(session_id: Uuid, user_id: impl Into<String>, language: Language, now: Timestamp) -> Self {
        Self {
            session_id,
            user_id: user_id.into(),
            language,
            question_index: 0,
            scores: Vec::new(),
            completed: false,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>, now: Timestamp) {
        self.push(ChatRole::User, content.into(), now);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, now: Timestamp) {
        self.push(ChatRole::Assistant, content.into(), now);
    }

    fn push(&mut self, role: ChatRole, content: String, now: Timestamp) {
        self.history.push(HistoryMessage {
            role,
            content,
            timestamp: now,
        });
        self.updated_at = now;
    }

    /// Record the score for the current question and move to the next one.
    /// Returns the new question index.
    pub fn record_score(&mut self, score: u8, now: Timestamp) -> usize {
        self.scores.push(score);
        self.question_index += 1;
        self.updated_at = now;
        self.question_index
    }

    pub fn mark_completed(&mut self, now: Timestamp) {
        self.completed = true;
        self.updated_at = now;
    }

    pub fn total_score(&self) -> u32 {
        self.scores.iter().map(|&s| u32::from(s)).sum()
    }

    /// Sliding expiry: a session lives for `ttl` after its last activity.
    pub fn is_expired(&self, ttl: SignedDuration, now: Timestamp) -> bool {
        now.duration_since(self.updated_at) > ttl
    }
}
