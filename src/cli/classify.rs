use anyhow::Result;
use menuwise_db::{MenuStore, SqliteMenuStore};
use menuwise_shared::MealPeriod;
use serde_json::json;

use crate::config::Config;

/// Classifies every stored listing for a date as JSON on stdout.
///
/// Without `--meal` all meal periods of the day are included.
#[tracing::instrument(skip(config))]
pub async fn classify(config: Config, date: Option<String>, meal: Option<MealPeriod>) -> Result<()> {
    let date = match date {
        Some(raw) => menuwise_shared::parse_date(&raw)?,
        None => menuwise_shared::today(&config.menu.timezone),
    };

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    menuwise_db::migrate(&pool).await?;
    let listings = SqliteMenuStore::new(pool.clone())
        .listings_for(date, meal)
        .await?;

    let classified = listings
        .iter()
        .map(|listing| {
            let location = listing
                .location
                .as_deref()
                .map(|id| menuwise_shared::location_name(id).unwrap_or(id));

            json!({
                "id": listing.id,
                "name": listing.name,
                "meal_period": listing.meal_period,
                "location": location,
                "classification": menuwise_tagging::classify(listing),
            })
        })
        .collect::<Vec<_>>();

    tracing::info!("Classified {} listings for {date}", classified.len());
    println!("{}", serde_json::to_string_pretty(&classified)?);

    pool.close().await;

    Ok(())
}
