//! System prompts and user-message templates.

use solace_core::models::language::Language;

pub const SCORING_SYSTEM_PROMPT: &str = "\
You rate answers given during a PHQ-9 depression screening interview. \
Reply with a single digit and nothing else.";

pub const CHAT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant. You only provide responses related to \
depression assessment or casual daily conversations. If a user asks about \
another topic, politely remind them that you can only discuss depression \
and daily life.";

pub const EVALUATION_SYSTEM_PROMPT: &str = "\
You are a helpful assistant. Evaluate the overall depression level \
(out of 10) and mental state based on the following conversation history.";

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const CORRECTION_SYSTEM_PROMPT: &str = "\
You correct speech-recognition transcripts. Fix spelling, spacing, and \
grammar errors and words that were obviously misheard. Keep the speaker's \
meaning and language. Return only the corrected transcript, without quotes \
or commentary.";

/// Longest summary returned by the analysis endpoint, in characters.
pub const SUMMARY_MAX_CHARS: usize = 300;

pub fn scoring_request(question: &str, answer: &str, language: Language) -> String {
    format!(
        "The interview is conducted in {lang}.\n\
         Question: {question}\n\
         Answer: {answer}\n\n\
         On a scale from 0 (the answer denies it, not at all) to 3 (the answer \
         strongly affirms it, nearly every day), how strongly does the answer \
         affirm the question? Answer with a number from 0 to 3 only.",
        lang = language.english_name(),
    )
}

pub fn chat_system_prompt(language: Language) -> String {
    format!(
        "{CHAT_SYSTEM_PROMPT} Always reply in {}.",
        language.english_name()
    )
}

pub fn evaluation_request(conversation: &str, screening: Option<&str>) -> String {
    match screening {
        Some(results) => format!("{conversation}\n\n<screening_results>\n{results}</screening_results>"),
        None => conversation.to_string(),
    }
}

pub fn summary_request(text: &str) -> String {
    format!(
        "Summarize the following depression analysis in {SUMMARY_MAX_CHARS} characters or less: '{text}'"
    )
}

pub fn correction_request(transcript: &str, language: Language) -> String {
    format!(
        "Language: {}\nTranscript: {transcript}",
        language.english_name()
    )
}
