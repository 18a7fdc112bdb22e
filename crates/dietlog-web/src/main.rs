use std::sync::Arc;

use anyhow::Result;
use dietlog_core::config::DietlogConfig;
use dietlog_core::service::MealService;
use dietlog_core::storage;
use dietlog_web::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dietlog_web=info".parse().unwrap()),
        )
        .init();

    let config = DietlogConfig::load(None).unwrap_or_else(|_| DietlogConfig::default_config());

    let store = storage::open_storage(&config)?;
    tracing::info!("using database at {}", store.path().display());

    let state = Arc::new(AppState {
        service: MealService::new(store),
    });

    let router = app(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("{}:{}", config.web.host, config.web.port);
    tracing::info!("dietlog-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
