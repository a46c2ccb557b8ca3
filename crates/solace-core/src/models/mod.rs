pub mod chat_history;
pub mod cost;
pub mod language;
pub mod report;
pub mod session;
