pub mod error;
pub mod routes;

use std::sync::Arc;

use dietlog_core::service::MealService;
use dietlog_core::storage::SqliteStorage;

pub struct AppState {
    pub service: MealService<SqliteStorage>,
}

/// Build the full application router over the shared state.
pub fn app(state: Arc<AppState>) -> axum::Router {
    routes::router().with_state(state)
}
