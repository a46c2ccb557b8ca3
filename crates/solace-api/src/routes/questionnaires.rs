use axum::Json;
use axum::extract::Path;
use serde::Serialize;

use solace_instruments::scoring::{Item, ScoreRange, SeverityBand};
use solace_instruments::{all_questionnaires, require_questionnaire};

use crate::error::ApiError;

#[derive(Serialize)]
pub struct QuestionnaireSummary {
    id: String,
    name: String,
    item_count: usize,
}

#[derive(Serialize)]
pub struct QuestionnaireDetail {
    id: String,
    name: String,
    item_range: ScoreRange,
    max_total: u32,
    items: Vec<Item>,
    severity_bands: Vec<SeverityBand>,
}

pub async fn list_questionnaires() -> Json<Vec<QuestionnaireSummary>> {
    let questionnaires = all_questionnaires()
        .iter()
        .map(|q| QuestionnaireSummary {
            id: q.id().to_string(),
            name: q.name().to_string(),
            item_count: q.item_count(),
        })
        .collect();
    Json(questionnaires)
}

pub async fn get_questionnaire_detail(
    Path(id): Path<String>,
) -> Result<Json<QuestionnaireDetail>, ApiError> {
    let q = require_questionnaire(&id)?;

    Ok(Json(QuestionnaireDetail {
        id: q.id().to_string(),
        name: q.name().to_string(),
        item_range: q.item_range(),
        max_total: q.max_total(),
        items: q.items().to_vec(),
        severity_bands: q.severity_bands().to_vec(),
    }))
}
