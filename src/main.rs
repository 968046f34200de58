mod app;
mod browse;
mod catalog;
mod config;
mod numeric;
mod nutrition;
mod state;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "catcan=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    if app_state.catalog.lock().await.is_empty() {
        tracing::warn!(path = %app_state.config.catalog_path.display(), "no catalog data; serving empty catalog");
    }

    app::serve(app::build_app(app_state)).await
}
