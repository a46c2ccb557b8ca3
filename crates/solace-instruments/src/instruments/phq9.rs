use crate::Questionnaire;
use crate::scoring::{Item, ScoreRange, Severity, SeverityBand};

/// PHQ-9: Patient Health Questionnaire, nine-item depression module.
/// Each item is rated 0 (not at all) to 3 (nearly every day); the total
/// (0-27) is banded into a severity.
pub struct Phq9;

pub const ID: &str = "phq9";

const ITEM_RANGE: ScoreRange = ScoreRange { min: 0, max: 3 };

static BANDS: [SeverityBand; 4] = [
    SeverityBand {
        severity: Severity::None,
        min_total: 0,
        max_total: 4,
    },
    SeverityBand {
        severity: Severity::Mild,
        min_total: 5,
        max_total: 9,
    },
    SeverityBand {
        severity: Severity::Moderate,
        min_total: 10,
        max_total: 14,
    },
    SeverityBand {
        severity: Severity::Severe,
        min_total: 15,
        max_total: 27,
    },
];

impl Questionnaire for Phq9 {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn items(&self) -> &[Item] {
        static ITEMS: std::sync::LazyLock<Vec<Item>> = std::sync::LazyLock::new(|| {
            vec![
                item(
                    1,
                    "depressed_mood",
                    "최근에 기분이 가라앉거나 우울한 적이 있나요?",
                    "Lately, have you been feeling down, depressed, or hopeless?",
                ),
                item(
                    2,
                    "anhedonia",
                    "최근에 평소에 즐기던 일들에 흥미를 잃으셨나요?",
                    "Lately, have you lost interest or pleasure in things you usually enjoy?",
                ),
                item(
                    3,
                    "sleep",
                    "최근에 잠들기 어렵거나 자주 깨셨나요?",
                    "Lately, have you had trouble falling or staying asleep?",
                ),
                item(
                    4,
                    "fatigue",
                    "최근에 평소보다 피곤하거나 기운이 없으셨나요?",
                    "Lately, have you been feeling more tired or low on energy than usual?",
                ),
                item(
                    5,
                    "appetite",
                    "최근에 식욕이 줄거나 폭식하는 경향이 있었나요?",
                    "Lately, has your appetite dropped, or have you tended to overeat?",
                ),
                item(
                    6,
                    "self_worth",
                    "최근에 자신에 대해 나쁘게 느끼셨나요?",
                    "Lately, have you been feeling bad about yourself?",
                ),
                item(
                    7,
                    "concentration",
                    "최근에 집중하기 어려운 적이 있나요?",
                    "Lately, have you had trouble concentrating?",
                ),
                item(
                    8,
                    "psychomotor",
                    "최근에 움직이거나 말하는 것이 느리다고 느끼셨나요?",
                    "Lately, have you felt that you move or speak more slowly than usual?",
                ),
                item(
                    9,
                    "self_harm",
                    "최근에 죽고 싶다는 생각을 하신 적이 있나요?",
                    "Lately, have you had thoughts that you would be better off dead?",
                ),
            ]
        });
        &ITEMS
    }

    fn item_range(&self) -> ScoreRange {
        ITEM_RANGE
    }

    fn severity_bands(&self) -> &[SeverityBand] {
        &BANDS
    }
}

fn item(number: u8, id: &str, text_ko: &str, text_en: &str) -> Item {
    Item {
        id: id.to_string(),
        number,
        text_ko: text_ko.to_string(),
        text_en: text_en.to_string(),
    }
}
