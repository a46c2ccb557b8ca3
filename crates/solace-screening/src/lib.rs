//! solace-screening
//!
//! The session-driven questionnaire/conversation flow. Walks a user through
//! a fixed questionnaire one answer at a time, scores each answer through a
//! language model, and switches into free conversation once every question
//! has been answered.
//!
//! Everything outside the state machine (model calls, transcription, speech
//! synthesis, report delivery, session persistence) sits behind the traits
//! in [`ports`] and [`store`].

pub mod error;
pub mod flow;
pub mod messages;
pub mod ports;
pub mod store;
