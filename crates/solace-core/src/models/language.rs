use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Language a session is conducted in.
///
/// Selects the questionnaire text, the fixed status messages, and the
/// transcription language for voice input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Two-letter ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }

    /// English name, used when instructing a language model.
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::Korean => "Korean",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    /// Accepts bare codes (`ko`), locale tags (`ko-KR`, `en_US`) and names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ko" | "korean" => Ok(Language::Korean),
            "en" | "english" => Ok(Language::English),
            _ => Err(CoreError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_locale_tags() {
        assert_eq!("ko".parse::<Language>().unwrap(), Language::Korean);
        assert_eq!("ko-KR".parse::<Language>().unwrap(), Language::Korean);
        assert_eq!("en_US".parse::<Language>().unwrap(), Language::English);
        assert_eq!(" English ".parse::<Language>().unwrap(), Language::English);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"en\"");
        let parsed: Language = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(parsed, Language::Korean);
    }
}
