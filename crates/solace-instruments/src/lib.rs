//! solace-instruments
//!
//! Screening questionnaire definitions. Pure data, no AWS dependency.
//! Defines the items, the per-item score range, and the severity bands for
//! each supported questionnaire.

pub mod error;
pub mod instruments;
pub mod scoring;

use solace_core::models::language::Language;

use error::InstrumentError;
use scoring::{Item, ScoreRange, Severity, SeverityBand, ValidationError};

/// Trait implemented by each screening questionnaire.
pub trait Questionnaire: Send + Sync {
    /// Unique identifier (e.g., "phq9").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// Questions in the order they are asked.
    fn items(&self) -> &[Item];

    /// Range every item score must fall in.
    fn item_range(&self) -> ScoreRange;

    /// Total-score bands, ordered from least to most severe.
    fn severity_bands(&self) -> &[SeverityBand];

    fn item_count(&self) -> usize {
        self.items().len()
    }

    fn item(&self, index: usize) -> Option<&Item> {
        self.items().get(index)
    }

    fn max_total(&self) -> u32 {
        self.item_count() as u32 * u32::from(self.item_range().max)
    }

    /// Map a total score onto a severity. Totals beyond the last band are
    /// treated as the most severe band.
    fn severity(&self, total: u32) -> Severity {
        let bands = self.severity_bands();
        bands
            .iter()
            .find(|b| b.contains(total))
            .or_else(|| bands.last())
            .map(|b| b.severity)
            .unwrap_or(Severity::None)
    }

    /// Validate a set of per-item scores against this questionnaire.
    fn validate_scores(&self, scores: &[u8]) -> Vec<ValidationError> {
        let range = self.item_range();
        let mut errors = Vec::new();

        if scores.len() > self.item_count() {
            errors.push(ValidationError {
                item_id: None,
                value: 0,
                expected_range: range,
                message: format!(
                    "{}: {} scores given but only {} items exist",
                    self.name(),
                    scores.len(),
                    self.item_count(),
                ),
            });
        }

        for (item, &value) in self.items().iter().zip(scores) {
            if !range.contains(i64::from(value)) {
                errors.push(ValidationError {
                    item_id: Some(item.id.clone()),
                    value,
                    expected_range: range,
                    message: format!(
                        "{}: item {} score {} is outside range [{}, {}]",
                        self.name(),
                        item.number,
                        value,
                        range.min,
                        range.max,
                    ),
                });
            }
        }
        errors
    }

    /// Like [`Questionnaire::validate_scores`], failing on the first problem.
    fn check_scores(&self, scores: &[u8]) -> Result<(), InstrumentError> {
        match self.validate_scores(scores).into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Format answered items as structured text for inclusion in a prompt.
    fn to_structured_input(&self, scores: &[u8], language: Language) -> String {
        let mut output = format!("## {}\n\n", self.name());
        for (item, value) in self.items().iter().zip(scores) {
            output.push_str(&format!(
                "- {}. {}: {}\n",
                item.number,
                item.text(language),
                value
            ));
        }
        let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        output.push_str(&format!(
            "\nTotal: {total} / {} ({})\n",
            self.max_total(),
            self.severity(total).id()
        ));
        output
    }
}

/// Return all registered questionnaires.
pub fn all_questionnaires() -> Vec<Box<dyn Questionnaire>> {
    vec![Box::new(instruments::phq9::Phq9)]
}

/// Look up a questionnaire by ID.
pub fn get_questionnaire(id: &str) -> Option<Box<dyn Questionnaire>> {
    all_questionnaires().into_iter().find(|q| q.id() == id)
}

/// Look up a questionnaire by ID, failing when it is not registered.
pub fn require_questionnaire(id: &str) -> Result<Box<dyn Questionnaire>, InstrumentError> {
    get_questionnaire(id).ok_or_else(|| InstrumentError::UnknownQuestionnaire(id.to_string()))
}
