use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::calculator::{DerRange, DER_RANGES};
use super::dto::{
    CalculatorResponse, CandidateRequest, ExtraWaterRequest, RemainingResponse,
    RemainingViewRequest, StageRequest, Suggestion, SuggestionQuery, WeightRequest,
};
use super::ledger::LedgerError;
use super::session::{can_label, suggestions};
use crate::state::AppState;
use crate::storage::StorageError;

pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/calculator", get(get_calculator))
        .route("/calculator/ranges", get(get_ranges))
        .route("/calculator/weight", put(set_weight))
        .route("/calculator/activity", put(set_activity))
        .route("/calculator/suggestions", get(get_suggestions))
        .route(
            "/calculator/candidate",
            put(stage_candidate).delete(clear_candidate),
        )
        .route("/calculator/consumed", post(confirm_consumed))
        .route("/calculator/extra-water", put(set_extra_water))
        .route("/calculator/remaining", get(get_remaining))
        .route("/calculator/remaining-view", put(set_remaining_view))
}

fn storage_failure(e: StorageError) -> (StatusCode, String) {
    error!(error = %e, "persisting calculator state failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[instrument(skip(state))]
pub async fn get_calculator(State(state): State<AppState>) -> Json<CalculatorResponse> {
    let mut session = state.calculator.lock().await;
    Json(CalculatorResponse::from_session(&mut session))
}

#[instrument]
pub async fn get_ranges() -> Json<&'static [DerRange]> {
    Json(&DER_RANGES[..])
}

#[instrument(skip(state))]
pub async fn set_weight(
    State(state): State<AppState>,
    Json(body): Json<WeightRequest>,
) -> Result<Json<CalculatorResponse>, (StatusCode, String)> {
    let mut session = state.calculator.lock().await;
    session.set_weight(body.weight).map_err(storage_failure)?;
    Ok(Json(CalculatorResponse::from_session(&mut session)))
}

#[instrument(skip(state))]
pub async fn set_activity(
    State(state): State<AppState>,
    Json(body): Json<StageRequest>,
) -> Json<CalculatorResponse> {
    let mut session = state.calculator.lock().await;
    session.set_stage(body.category);
    Json(CalculatorResponse::from_session(&mut session))
}

#[instrument(skip(state))]
pub async fn get_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> Json<Vec<Suggestion>> {
    let store = state.catalog.lock().await;
    let hits = suggestions(store.records(), &params.q, state.config.suggestion_limit)
        .into_iter()
        .map(|(index, record)| Suggestion {
            index,
            label: can_label(record),
        })
        .collect();
    Json(hits)
}

/// Stages the catalog record at `index` as today's candidate can.
#[instrument(skip(state))]
pub async fn stage_candidate(
    State(state): State<AppState>,
    Json(body): Json<CandidateRequest>,
) -> Result<Json<CalculatorResponse>, (StatusCode, String)> {
    let record = {
        let store = state.catalog.lock().await;
        store.record(body.index).cloned()
    };
    let Some(record) = record else {
        warn!(index = body.index, "candidate index out of range");
        return Err((StatusCode::NOT_FOUND, format!("no can at index {}", body.index)));
    };

    let mut session = state.calculator.lock().await;
    info!(label = %can_label(&record), "candidate staged");
    session.ledger.stage(record);
    Ok(Json(CalculatorResponse::from_session(&mut session)))
}

#[instrument(skip(state))]
pub async fn clear_candidate(State(state): State<AppState>) -> Json<CalculatorResponse> {
    let mut session = state.calculator.lock().await;
    session.ledger.unstage();
    Json(CalculatorResponse::from_session(&mut session))
}

#[instrument(skip(state))]
pub async fn confirm_consumed(
    State(state): State<AppState>,
) -> Result<Json<CalculatorResponse>, (StatusCode, String)> {
    let mut session = state.calculator.lock().await;
    match session.ledger.confirm() {
        Ok(_) => Ok(Json(CalculatorResponse::from_session(&mut session))),
        Err(LedgerError::NothingStaged) => {
            Err((StatusCode::BAD_REQUEST, "no can is staged".into()))
        }
        Err(LedgerError::Storage(e)) => Err(storage_failure(e)),
    }
}

#[instrument(skip(state))]
pub async fn set_extra_water(
    State(state): State<AppState>,
    Json(body): Json<ExtraWaterRequest>,
) -> Result<Json<CalculatorResponse>, (StatusCode, String)> {
    let mut session = state.calculator.lock().await;
    match session.ledger.set_extra_water(body.amount) {
        Ok(()) => Ok(Json(CalculatorResponse::from_session(&mut session))),
        Err(LedgerError::Storage(e)) => Err(storage_failure(e)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

#[instrument(skip(state))]
pub async fn get_remaining(State(state): State<AppState>) -> Json<RemainingResponse> {
    let session = state.calculator.lock().await;
    Json(RemainingResponse {
        open: session.remaining_open(),
        remaining: session.remaining(),
    })
}

#[instrument(skip(state))]
pub async fn set_remaining_view(
    State(state): State<AppState>,
    Json(body): Json<RemainingViewRequest>,
) -> Json<RemainingResponse> {
    let mut session = state.calculator.lock().await;
    session.set_remaining_open(body.open);
    Json(RemainingResponse {
        open: session.remaining_open(),
        remaining: session.remaining(),
    })
}
