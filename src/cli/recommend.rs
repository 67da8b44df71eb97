use anyhow::Result;
use menuwise_db::{MenuStore, SqliteMenuStore};
use menuwise_shared::MealPeriod;
use serde_json::json;

use crate::config::Config;

/// Prints the ranked menu for one eater as JSON on stdout.
#[tracing::instrument(skip(config))]
pub async fn recommend(
    config: Config,
    eater_id: String,
    date: Option<String>,
    meal: Option<MealPeriod>,
    limit: Option<usize>,
) -> Result<()> {
    let timezone = config.menu.timezone.to_owned();
    let date = match date {
        Some(raw) => menuwise_shared::parse_date(&raw)?,
        None => menuwise_shared::today(&timezone),
    };
    let meal = meal.unwrap_or_else(|| menuwise_shared::current_meal_period(&timezone));

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    menuwise_db::migrate(&pool).await?;
    let store = SqliteMenuStore::new(pool.clone());

    let preferences = match store.preferences_for(&eater_id).await? {
        Some(preferences) => preferences,
        None => {
            tracing::warn!("No saved preferences for {eater_id}, recommending as anonymous");
            Default::default()
        }
    };
    let listings = store.listings_for(date, Some(meal)).await?;

    let recommender = crate::recommender_from_config(&config);
    let recommendations = recommender
        .recommend(&listings, Some(meal), &preferences, limit)
        .await;

    let output = json!({
        "eater_id": eater_id,
        "date": date.to_string(),
        "meal_period": meal,
        "model_ready": recommender.is_model_ready(),
        "recommendations": recommendations,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    recommender.dispose();
    pool.close().await;

    Ok(())
}
