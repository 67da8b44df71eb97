use anyhow::Result;

use crate::config::Config;

#[tracing::instrument(skip(config))]
pub async fn migrate(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_write_pool(&config.database.url).await?;
    menuwise_db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrations completed");

    Ok(())
}
