use axum::{Router, body::Body, http::Request};
use http_body_util::BodyExt;
use menuwise::config::{
    Config, DatabaseConfig, MenuConfig, ObservabilityConfig, RecommenderConfig, ServerConfig,
};
use menuwise_db::SqliteMenuStore;
use menuwise_recommend::ScoringWeights;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: SqliteMenuStore,
    _dir: TempDir,
}

pub fn test_config(url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: url.to_string(),
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        menu: MenuConfig::default(),
        recommender: RecommenderConfig::default(),
        scoring: ScoringWeights::default(),
    }
}

async fn setup_pool(dir: &TempDir) -> anyhow::Result<(String, SqlitePool)> {
    let path = dir.child("menuwise.db");
    let url = format!("sqlite:{}", path.display());
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    menuwise_db::migrate(&pool).await?;

    Ok((url, pool))
}

pub async fn create_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let (url, pool) = setup_pool(&dir).await?;

    Ok(TestApp {
        router: menuwise::create_app(test_config(&url), pool.clone()),
        store: SqliteMenuStore::new(pool),
        _dir: dir,
    })
}

pub async fn send(
    router: &Router,
    request: Request<Body>,
) -> anyhow::Result<(axum::http::StatusCode, serde_json::Value)> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();

    Ok((status, serde_json::from_slice(&body)?))
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
