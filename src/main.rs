mod app;
mod bootstrap;
mod config;
mod db;
mod state;
mod users;

use crate::config::AppConfig;
use crate::db::PgConnector;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userdir=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let report = bootstrap::run(&PgConnector::new(&config.database)).await?;
    tracing::info!(database_created = report.database_created, "schema bootstrap complete");

    let app = app::build_app(AppState::init(&config));
    app::serve(app, config.http.addr()?).await
}
