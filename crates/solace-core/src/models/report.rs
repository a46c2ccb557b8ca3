use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::chat_history::HistoryMessage;
use super::session::SessionState;

/// Results payload forwarded to the downstream server when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionReport {
    pub user_id: String,
    pub session_id: Uuid,
    pub overall_assessment: OverallAssessment,
    pub chat_history: Vec<HistoryMessage>,
    pub scores: Vec<u8>,
    pub total_score: u32,
    /// Severity band id (e.g. `"mild"`), present once screening completed.
    pub severity: Option<String>,
    pub screening_completed: bool,
    pub ended_at: Timestamp,
}

/// Free-text assessment of the whole conversation produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OverallAssessment {
    pub assessment: String,
}

impl SessionReport {
    pub fn from_state(
        state: &SessionState,
        assessment: String,
        severity: Option<String>,
        ended_at: Timestamp,
    ) -> Self {
        Self {
            user_id: state.user_id.clone(),
            session_id: state.session_id,
            overall_assessment: OverallAssessment { assessment },
            chat_history: state.history.clone(),
            scores: state.scores.clone(),
            total_score: state.total_score(),
            severity,
            screening_completed: state.completed,
            ended_at,
        }
    }
}
