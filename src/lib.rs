//! Dining hall menu service: dietary classification and personalized recommendations.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;

use std::{sync::Arc, time::Duration};

use menuwise_db::{MenuStore, SqliteMenuStore};
use menuwise_recommend::{ModelEngine, ModelSource, Recommender, RecommenderOptions, ScoringEngine};
use sqlx::SqlitePool;

pub use routes::AppState;

/// Builds the recommender described by the `[recommender]` and `[scoring]` sections.
///
/// The model is not loaded here; call [`Recommender::warm_up`] or let the first
/// recommendation trigger it.
pub fn recommender_from_config(config: &config::Config) -> Recommender {
    let source = match config.recommender.model_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => ModelSource::File(path.into()),
        _ => ModelSource::Disabled,
    };

    Recommender::new(
        ModelEngine::new(source),
        ScoringEngine::new(config.scoring.clone()),
        RecommenderOptions {
            result_limit: config.recommender.result_limit,
            model_init_timeout: Duration::from_millis(config.recommender.model_init_timeout_ms),
        },
    )
}

pub fn app_state(config: config::Config, pool: SqlitePool) -> AppState {
    AppState {
        recommender: Arc::new(recommender_from_config(&config)),
        store: Arc::new(SqliteMenuStore::new(pool.clone())) as Arc<dyn MenuStore>,
        config: Arc::new(config),
        pool,
    }
}

/// Create app router
///
/// Used by integration tests that drive the router without a listener.
pub fn create_app(config: config::Config, pool: SqlitePool) -> axum::Router {
    routes::router(app_state(config, pool))
}
