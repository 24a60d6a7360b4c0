mod app;
mod auth;
mod chat;
mod config;
mod db;
mod error;
mod journal;
#[cfg(test)]
mod memory;
mod speech;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "moodlog=debug,axum=info,tower_http=info".to_string());
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
    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let cors = app::cors_layer(&config.cors_origin)?;
    let state = AppState::init(&config, db.clone())?;
    app::serve(app::build_app(state, cors)).await?;

    db.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
