pub mod columns;
pub mod dto;
pub mod filter;
pub mod handlers;
pub mod sort;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::catalog_routes())
        .merge(handlers::column_routes())
}
