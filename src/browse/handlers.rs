use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    CatalogResponse, ColumnsResponse, QueryRequest, SelectionResponse, SortRequest, ValueRequest,
    ValuesRequest,
};
use super::filter::{Dimension, FilterOptions};
use crate::catalog::load_catalog;
use crate::state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/reload", post(reload_catalog))
        .route("/catalog/options", get(get_options))
        .route("/catalog/selection", get(get_selection))
        .route("/catalog/query", put(set_query))
        .route("/catalog/filters/:dimension", put(set_filter))
        .route("/catalog/filters/:dimension/toggle", post(toggle_filter_value))
        .route("/catalog/filters/:dimension/toggle-all", post(toggle_filter_all))
        .route("/catalog/filters/:dimension/clear", post(clear_filter))
        .route("/catalog/sort", post(toggle_sort))
}

pub fn column_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog/columns", get(get_columns))
        .route("/catalog/columns/show-all", post(show_all_columns))
        .route("/catalog/columns/:id/toggle", post(toggle_column))
}

#[instrument(skip(state))]
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let mut store = state.catalog.lock().await;
    Json(CatalogResponse::from_store(&mut store))
}

/// Fetches the source again and replaces the catalog wholesale.
#[instrument(skip(state))]
pub async fn reload_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let load = load_catalog(state.source.as_ref()).await;
    if load.records.is_empty() {
        warn!("reload produced no records");
    }
    let mut store = state.catalog.lock().await;
    store.replace(load);
    info!(records = store.len(), "catalog reloaded");
    Json(CatalogResponse::from_store(&mut store))
}

#[instrument(skip(state))]
pub async fn get_options(State(state): State<AppState>) -> Json<FilterOptions> {
    let store = state.catalog.lock().await;
    Json(store.options().clone())
}

#[instrument(skip(state))]
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let store = state.catalog.lock().await;
    Json(SelectionResponse::from_store(&store))
}

#[instrument(skip(state, body))]
pub async fn set_query(
    State(state): State<AppState>,
    Json(body): Json<QueryRequest>,
) -> Json<CatalogResponse> {
    let mut store = state.catalog.lock().await;
    store.set_query(body.query);
    Json(CatalogResponse::from_store(&mut store))
}

#[instrument(skip(state, body))]
pub async fn set_filter(
    State(state): State<AppState>,
    Path(dimension): Path<Dimension>,
    Json(body): Json<ValuesRequest>,
) -> Result<Json<CatalogResponse>, (StatusCode, String)> {
    let mut store = state.catalog.lock().await;
    let available = store.options().for_dimension(dimension);
    if let Some(unknown) = body.values.iter().find(|v| !available.contains(v)) {
        warn!(?dimension, value = %unknown, "filter set with unknown value");
        return Err((StatusCode::NOT_FOUND, format!("unknown value: {}", unknown)));
    }
    store.set_values(dimension, body.values);
    Ok(Json(CatalogResponse::from_store(&mut store)))
}

#[instrument(skip(state, body))]
pub async fn toggle_filter_value(
    State(state): State<AppState>,
    Path(dimension): Path<Dimension>,
    Json(body): Json<ValueRequest>,
) -> Result<Json<CatalogResponse>, (StatusCode, String)> {
    let mut store = state.catalog.lock().await;
    if !store.options().for_dimension(dimension).contains(&body.value) {
        warn!(?dimension, value = %body.value, "toggle of unknown filter value");
        return Err((StatusCode::NOT_FOUND, format!("unknown value: {}", body.value)));
    }
    store.toggle_value(dimension, &body.value);
    Ok(Json(CatalogResponse::from_store(&mut store)))
}

#[instrument(skip(state))]
pub async fn toggle_filter_all(
    State(state): State<AppState>,
    Path(dimension): Path<Dimension>,
) -> Json<CatalogResponse> {
    let mut store = state.catalog.lock().await;
    store.toggle_all(dimension);
    Json(CatalogResponse::from_store(&mut store))
}

#[instrument(skip(state))]
pub async fn clear_filter(
    State(state): State<AppState>,
    Path(dimension): Path<Dimension>,
) -> Json<CatalogResponse> {
    let mut store = state.catalog.lock().await;
    store.clear(dimension);
    Json(CatalogResponse::from_store(&mut store))
}

#[instrument(skip(state, body))]
pub async fn toggle_sort(
    State(state): State<AppState>,
    Json(body): Json<SortRequest>,
) -> Json<CatalogResponse> {
    let mut store = state.catalog.lock().await;
    store.toggle_sort(body.field);
    Json(CatalogResponse::from_store(&mut store))
}

#[instrument(skip(state))]
pub async fn get_columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    let store = state.catalog.lock().await;
    Json(ColumnsResponse::from_store(&store))
}

#[instrument(skip(state))]
pub async fn toggle_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ColumnsResponse>, (StatusCode, String)> {
    let mut store = state.catalog.lock().await;
    if store.toggle_column(&id).is_none() {
        warn!(%id, "toggle of unknown column");
        return Err((StatusCode::NOT_FOUND, format!("unknown column: {}", id)));
    }
    Ok(Json(ColumnsResponse::from_store(&store)))
}

#[instrument(skip(state))]
pub async fn show_all_columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    let mut store = state.catalog.lock().await;
    store.show_all_columns();
    Json(ColumnsResponse::from_store(&store))
}
