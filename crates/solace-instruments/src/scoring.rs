use serde::{Deserialize, Serialize};
use solace_core::models::language::Language;
use thiserror::Error;
use ts_rs::TS;

/// Inclusive integer range a single item score must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: u8,
    pub max: u8,
}

impl ScoreRange {
    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }

    /// Pull an arbitrary integer into the range.
    pub fn clamp(&self, value: i64) -> u8 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as u8
    }
}

/// One question of a questionnaire, in every supported language.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: String,
    /// 1-based position shown to the user.
    pub number: u8,
    pub text_ko: String,
    pub text_en: String,
}

impl Item {
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::Korean => &self.text_ko,
            Language::English => &self.text_en,
        }
    }
}

/// Clinical severity derived from a questionnaire total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn id(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    /// Sentence shown to the user once screening completes.
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Severity::None, Language::Korean) => "우울증이 없는 상태입니다.",
            (Severity::Mild, Language::Korean) => "경미한 우울증이 의심됩니다.",
            (Severity::Moderate, Language::Korean) => "중간 정도의 우울증이 의심됩니다.",
            (Severity::Severe, Language::Korean) => "심한 우울증이 의심됩니다.",
            (Severity::None, Language::English) => "No signs of depression.",
            (Severity::Mild, Language::English) => "Mild depression is suspected.",
            (Severity::Moderate, Language::English) => "Moderate depression is suspected.",
            (Severity::Severe, Language::English) => "Severe depression is suspected.",
        }
    }
}

/// Inclusive total-score interval mapped to a severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityBand {
    pub severity: Severity,
    pub min_total: u32,
    pub max_total: u32,
}

impl SeverityBand {
    pub fn contains(&self, total: u32) -> bool {
        total >= self.min_total && total <= self.max_total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub item_id: Option<String>,
    pub value: u8,
    pub expected_range: ScoreRange,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: ScoreRange = ScoreRange { min: 0, max: 3 };

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(RANGE.contains(0));
        assert!(RANGE.contains(3));
        assert!(!RANGE.contains(-1));
        assert!(!RANGE.contains(4));
    }

    #[test]
    fn clamp_pulls_values_into_range() {
        assert_eq!(RANGE.clamp(-5), 0);
        assert_eq!(RANGE.clamp(2), 2);
        assert_eq!(RANGE.clamp(17), 3);
    }

    #[test]
    fn severity_serializes_as_id() {
        assert_eq!(
            serde_json::to_string(&Severity::Moderate).unwrap(),
            format!("\"{}\"", Severity::Moderate.id())
        );
    }
}
