pub mod calculator;
pub mod dto;
pub mod handlers;
pub mod ledger;
pub mod session;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::calculator_routes()
}
