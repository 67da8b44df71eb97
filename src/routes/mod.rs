mod classify;
mod health;
mod recommend;

pub use classify::*;
pub use health::*;
pub use recommend::*;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use menuwise_db::MenuStore;
use menuwise_recommend::Recommender;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<Recommender>,
    pub store: Arc<dyn MenuStore>,
    pub pool: SqlitePool,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/classify", post(classify))
        .route("/diet-filter", post(diet_filter))
        .route("/recommend", post(recommend))
        .route("/recommendations", get(recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
