use serde::{Deserialize, Serialize};

use super::calculator::{DailyCalorieResult, LifeStage};
use super::ledger::RemainingNeeds;
use super::session::{can_label, CalculatorSession};
use crate::catalog::ProductRecord;

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub label: String,
    #[serde(flatten)]
    pub record: ProductRecord,
}

impl CandidateView {
    pub fn new(record: &ProductRecord) -> Self {
        Self {
            label: can_label(record),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculatorResponse {
    pub weight: String,
    pub stage: LifeStage,
    pub result: Option<DailyCalorieResult>,
    pub candidate: Option<CandidateView>,
    pub extra_water: String,
    pub day: String,
    pub consumed: Vec<CandidateView>,
    pub remaining: Option<RemainingNeeds>,
    pub remaining_open: bool,
}

impl CalculatorResponse {
    pub fn from_session(session: &mut CalculatorSession) -> Self {
        let day = session.ledger.day().to_string();
        let consumed = session.ledger.entries().iter().map(CandidateView::new).collect();
        Self {
            weight: session.weight().to_string(),
            stage: session.stage(),
            result: session.result(),
            candidate: session.ledger.candidate().map(CandidateView::new),
            extra_water: session.ledger.extra_water().to_string(),
            day,
            consumed,
            remaining: session.remaining(),
            remaining_open: session.remaining_open(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct RemainingResponse {
    pub open: bool,
    pub remaining: Option<RemainingNeeds>,
}

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    #[serde(default)]
    pub weight: String,
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub category: LifeStage,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExtraWaterRequest {
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct RemainingViewRequest {
    pub open: bool,
}
