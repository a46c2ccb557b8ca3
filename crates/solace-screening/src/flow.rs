//! Questionnaire/conversation flow controller.
//!
//! A session moves through two modes:
//!
//! - **Screening**: each user message answers the current question. The
//!   answer is scored by the language model, clamped into the item range,
//!   recorded, and the next question is returned. After the last item the
//!   session is marked completed and the severity band is reported.
//! - **Conversation**: once completed, every message gets a free-chat reply.
//!
//! The flow loads the session record, mutates it, and saves it back once
//! per turn. A turn that fails part-way leaves the stored record untouched.

use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use solace_core::models::language::Language;
use solace_core::models::report::SessionReport;
use solace_core::models::session::SessionState;
use solace_instruments::Questionnaire;
use solace_instruments::scoring::Severity;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::FlowError;
use crate::messages;
use crate::ports::{
    AudioInput, LanguageOracle, ReportSink, SpeechSynthesizer, SynthesizedSpeech, Transcriber,
};
use crate::store::SessionStore;

/// External collaborators of the flow.
pub struct Collaborators {
    pub oracle: Arc<dyn LanguageOracle>,
    pub transcriber: Arc<dyn Transcriber>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub reports: Arc<dyn ReportSink>,
    pub store: Arc<dyn SessionStore>,
}

pub struct ScreeningFlow {
    questionnaire: Box<dyn Questionnaire>,
    oracle: Arc<dyn LanguageOracle>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    reports: Arc<dyn ReportSink>,
    store: Arc<dyn SessionStore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub message: String,
    pub user_id: String,
    pub language: Language,
    pub question: String,
    pub question_number: u8,
    pub question_count: usize,
}

/// Result of one user turn.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The answer was scored and another question follows.
    Question {
        response: String,
        question_number: u8,
        current_score: u8,
        total_score: u32,
    },
    /// The last answer was scored; screening is over.
    Completed {
        response: String,
        current_score: u8,
        total_score: u32,
        severity: Severity,
        assessment: String,
    },
    /// Free-conversation reply.
    Chat { response: String },
}

impl TurnOutcome {
    /// Text the assistant says back to the user.
    pub fn response(&self) -> &str {
        match self {
            TurnOutcome::Question { response, .. }
            | TurnOutcome::Completed { response, .. }
            | TurnOutcome::Chat { response } => response,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EndOutcome {
    pub response: String,
    pub server_response: Option<serde_json::Value>,
    pub report: SessionReport,
}

#[derive(Debug, Clone)]
pub struct VoiceOutcome {
    /// Corrected transcript that was fed into the flow.
    pub transcript: String,
    pub turn: TurnOutcome,
    pub speech: SynthesizedSpeech,
}

impl ScreeningFlow {
    pub fn new(questionnaire: Box<dyn Questionnaire>, collaborators: Collaborators) -> Self {
        Self {
            questionnaire,
            oracle: collaborators.oracle,
            transcriber: collaborators.transcriber,
            synthesizer: collaborators.synthesizer,
            reports: collaborators.reports,
            store: collaborators.store,
        }
    }

    pub fn questionnaire(&self) -> &dyn Questionnaire {
        self.questionnaire.as_ref()
    }

    /// Begin a new session under `session_id`, replacing any record that
    /// was stored there, and ask the first question.
    pub async fn start(
        &self,
        session_id: Uuid,
        user_id: &str,
        language: Language,
    ) -> Result<StartOutcome, FlowError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(FlowError::InvalidInput("User ID is required".to_string()));
        }

        let first = self.questionnaire.item(0).ok_or_else(|| {
            FlowError::CorruptState(format!("{} has no items", self.questionnaire.name()))
        })?;
        let question = first.text(language).to_string();

        let now = Timestamp::now();
        let mut state = SessionState::new(session_id, user_id, language, now);
        state.push_assistant(question.clone(), now);
        self.store.save(&state).await?;

        info!(
            session_id = %session_id,
            questionnaire = self.questionnaire.id(),
            language = %language,
            "session started"
        );

        Ok(StartOutcome {
            message: messages::session_started(language).to_string(),
            user_id: user_id.to_string(),
            language,
            question,
            question_number: first.number,
            question_count: self.questionnaire.item_count(),
        })
    }

    /// Load the live session or fail with [`FlowError::NoSession`].
    ///
    /// Records whose scores do not fit the questionnaire are rejected as
    /// corrupt.
    pub async fn require_session(&self, session_id: Uuid) -> Result<SessionState, FlowError> {
        let state = self
            .store
            .load(session_id)
            .await?
            .ok_or(FlowError::NoSession)?;

        if let Err(e) = self.questionnaire.check_scores(&state.scores) {
            return Err(FlowError::CorruptState(format!("session {session_id}: {e}")));
        }
        if state.completed && state.question_index != self.questionnaire.item_count() {
            return Err(FlowError::CorruptState(format!(
                "session {session_id}: completed at question index {} of {}",
                state.question_index,
                self.questionnaire.item_count()
            )));
        }
        if state.scores.len() != state.question_index {
            return Err(FlowError::CorruptState(format!(
                "session {session_id}: {} scores at question index {}",
                state.scores.len(),
                state.question_index
            )));
        }
        Ok(state)
    }

    /// Process one user message (typed, or transcribed from voice).
    pub async fn handle_message(
        &self,
        session_id: Uuid,
        message: &str,
    ) -> Result<TurnOutcome, FlowError> {
        let (state, outcome) = self.apply_message(session_id, message).await?;
        self.store.save(&state).await?;
        Ok(outcome)
    }

    /// Run one turn against a loaded copy of the session without saving it.
    async fn apply_message(
        &self,
        session_id: Uuid,
        message: &str,
    ) -> Result<(SessionState, TurnOutcome), FlowError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(FlowError::InvalidInput(
                "Message field is required".to_string(),
            ));
        }

        let mut state = self.require_session(session_id).await?;
        state.push_user(message, Timestamp::now());

        let outcome = if state.completed {
            self.chat_turn(&state, message).await?
        } else {
            self.screening_turn(&mut state, message).await?
        };

        state.push_assistant(outcome.response(), Timestamp::now());
        Ok((state, outcome))
    }

    async fn screening_turn(
        &self,
        state: &mut SessionState,
        answer: &str,
    ) -> Result<TurnOutcome, FlowError> {
        let language = state.language;
        let item = self.questionnaire.item(state.question_index).ok_or_else(|| {
            FlowError::CorruptState(format!(
                "session {} is at question index {} of {} but not completed",
                state.session_id,
                state.question_index,
                self.questionnaire.item_count()
            ))
        })?;

        let raw = self
            .oracle
            .score_answer(item.text(language), answer, language)
            .await?;

        let range = self.questionnaire.item_range();
        if !range.contains(raw) {
            warn!(
                session_id = %state.session_id,
                item = %item.id,
                raw,
                "model score outside item range, clamping"
            );
        }
        let score = range.clamp(raw);

        let now = Timestamp::now();
        state.record_score(score, now);
        let total_score = state.total_score();

        info!(
            session_id = %state.session_id,
            question_number = item.number,
            score,
            total_score,
            "answer scored"
        );

        match self.questionnaire.item(state.question_index) {
            Some(next) => Ok(TurnOutcome::Question {
                response: next.text(language).to_string(),
                question_number: next.number,
                current_score: score,
                total_score,
            }),
            None => {
                state.mark_completed(now);
                let severity = self.questionnaire.severity(total_score);
                info!(
                    session_id = %state.session_id,
                    total_score,
                    severity = severity.id(),
                    "screening completed"
                );
                Ok(TurnOutcome::Completed {
                    response: messages::screening_complete(language).to_string(),
                    current_score: score,
                    total_score,
                    severity,
                    assessment: severity.label(language).to_string(),
                })
            }
        }
    }

    async fn chat_turn(&self, state: &SessionState, message: &str) -> Result<TurnOutcome, FlowError> {
        // The message was already appended; the oracle receives it separately.
        let prior = &state.history[..state.history.len().saturating_sub(1)];
        let response = self
            .oracle
            .chat_reply(message, prior, state.language)
            .await?;
        Ok(TurnOutcome::Chat { response })
    }

    /// Close the session: evaluate it, forward the report, then forget it.
    ///
    /// If delivery fails the record is kept so the client can retry.
    pub async fn end(&self, session_id: Uuid) -> Result<EndOutcome, FlowError> {
        let state = self.require_session(session_id).await?;

        let screening = (!state.scores.is_empty()).then(|| {
            self.questionnaire
                .to_structured_input(&state.scores, state.language)
        });
        let assessment = self
            .oracle
            .evaluate_session(&state.history, screening.as_deref())
            .await?;

        let severity = state.completed.then(|| {
            self.questionnaire
                .severity(state.total_score())
                .id()
                .to_string()
        });
        let report = SessionReport::from_state(&state, assessment, severity, Timestamp::now());

        let server_response = self.reports.deliver(&report).await?;
        self.store.remove(session_id).await?;

        info!(
            session_id = %session_id,
            messages = report.chat_history.len(),
            screening_completed = report.screening_completed,
            forwarded = server_response.is_some(),
            "session ended"
        );

        Ok(EndOutcome {
            response: messages::session_ended(state.language).to_string(),
            server_response,
            report,
        })
    }

    /// Summarize a free-text analysis. Needs no session.
    pub async fn analyze(&self, text: &str) -> Result<String, FlowError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FlowError::InvalidInput("Text field is required".to_string()));
        }
        Ok(self.oracle.summarize_analysis(text).await?)
    }

    /// One spoken turn: transcribe, correct, run the turn, speak the reply.
    pub async fn voice_turn(
        &self,
        session_id: Uuid,
        audio: AudioInput,
    ) -> Result<VoiceOutcome, FlowError> {
        if audio.bytes.is_empty() {
            return Err(FlowError::InvalidInput("Audio file is required".to_string()));
        }

        // Fail before paying for transcription when there is no session.
        let language = self.require_session(session_id).await?.language;

        let transcript = self.transcriber.transcribe(&audio, language).await?;
        if transcript.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "no speech was recognized in the audio".to_string(),
            ));
        }

        let corrected = self
            .oracle
            .correct_transcript(&transcript, language)
            .await?;
        let transcript = if corrected.trim().is_empty() {
            transcript
        } else {
            corrected
        };

        // Nothing is saved unless the reply was synthesized.
        let (state, turn) = self.apply_message(session_id, &transcript).await?;
        let speech = self
            .synthesizer
            .synthesize(turn.response(), language)
            .await?;
        self.store.save(&state).await?;

        Ok(VoiceOutcome {
            transcript,
            turn,
            speech,
        })
    }
}
