use solace_core::models::language::Language;
use solace_instruments::instruments::phq9::Phq9;
use solace_instruments::scoring::Severity;
use solace_instruments::error::InstrumentError;
use solace_instruments::{Questionnaire, all_questionnaires, get_questionnaire, require_questionnaire};

#[test]
fn has_nine_items_numbered_in_order() {
    let q = Phq9;
    assert_eq!(q.item_count(), 9);
    for (i, item) in q.items().iter().enumerate() {
        assert_eq!(usize::from(item.number), i + 1);
        assert!(!item.text(Language::Korean).is_empty());
        assert!(!item.text(Language::English).is_empty());
    }
    assert!(q.item(9).is_none());
}

#[test]
fn max_total_is_twenty_seven() {
    assert_eq!(Phq9.max_total(), 27);
}

#[test]
fn severity_band_boundaries() {
    let q = Phq9;
    assert_eq!(q.severity(0), Severity::None);
    assert_eq!(q.severity(4), Severity::None);
    assert_eq!(q.severity(5), Severity::Mild);
    assert_eq!(q.severity(9), Severity::Mild);
    assert_eq!(q.severity(10), Severity::Moderate);
    assert_eq!(q.severity(14), Severity::Moderate);
    assert_eq!(q.severity(15), Severity::Severe);
    assert_eq!(q.severity(27), Severity::Severe);
}

#[test]
fn totals_beyond_last_band_are_severe() {
    assert_eq!(Phq9.severity(40), Severity::Severe);
}

#[test]
fn bands_cover_every_total_without_gaps() {
    let q = Phq9;
    for total in 0..=q.max_total() {
        let hits = q
            .severity_bands()
            .iter()
            .filter(|b| b.contains(total))
            .count();
        assert_eq!(hits, 1, "total {total} matched {hits} bands");
    }
}

#[test]
fn validate_flags_out_of_range_and_excess_scores() {
    let q = Phq9;
    assert!(q.validate_scores(&[0, 1, 2, 3]).is_empty());

    let errors = q.validate_scores(&[0, 4]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].item_id.as_deref(), Some("anhedonia"));

    let errors = q.validate_scores(&[0; 10]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].item_id.is_none());
}

#[test]
fn structured_input_lists_answered_items_and_total() {
    let text = Phq9.to_structured_input(&[3, 2], Language::English);
    assert!(text.starts_with("## PHQ-9"));
    assert!(text.contains("- 1. Lately, have you been feeling down"));
    assert!(text.contains(": 3\n"));
    assert!(text.contains("Total: 5 / 27 (mild)"));
    assert!(!text.contains("- 3."));
}

#[test]
fn registry_lookup() {
    assert_eq!(all_questionnaires().len(), 1);
    assert_eq!(get_questionnaire("phq9").map(|q| q.name().to_string()).as_deref(), Some("PHQ-9"));
    assert!(get_questionnaire("gad7").is_none());
}

#[test]
fn check_scores_reports_first_problem() {
    assert!(Phq9.check_scores(&[3, 3, 3]).is_ok());
    match Phq9.check_scores(&[1, 7, 9]) {
        Err(InstrumentError::Validation(err)) => {
            assert_eq!(err.item_id.as_deref(), Some("anhedonia"));
            assert_eq!(err.value, 7);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn require_unknown_questionnaire_fails() {
    assert!(require_questionnaire("phq9").is_ok());
    assert!(matches!(
        require_questionnaire("gad7"),
        Err(InstrumentError::UnknownQuestionnaire(id)) if id == "gad7"
    ));
}
