//! Fixed status messages shown to the user.

use solace_core::models::language::Language;

pub fn session_started(language: Language) -> &'static str {
    match language {
        Language::Korean => "새로운 세션이 시작되었습니다.",
        Language::English => "A new session has started.",
    }
}

pub fn screening_complete(language: Language) -> &'static str {
    match language {
        Language::Korean => "PHQ-9 질문이 완료되었습니다. 이제 일상적인 대화를 나눌 수 있습니다.",
        Language::English => {
            "The PHQ-9 questions are complete. Now we can talk about anything on your mind."
        }
    }
}

pub fn session_ended(language: Language) -> &'static str {
    match language {
        Language::Korean => "채팅이 종료되었습니다. 세션이 종료되었습니다.",
        Language::English => "The chat has ended. Your session is closed.",
    }
}
