use axum::{
    Json,
    extract::{Query, State},
};
use menuwise_shared::{EaterPreferences, FoodListing, MealPeriod, ScoredListing};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(max = 5000, message = "At most 5000 listings per request"))]
    pub listings: Vec<FoodListing>,
    #[serde(default)]
    pub preferences: EaterPreferences,
    #[serde(default)]
    pub meal_period: Option<MealPeriod>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[serde(default)]
    pub eater_id: Option<String>,
    /// `YYYY-MM-DD`, today in the menu timezone when absent.
    #[serde(default)]
    pub date: Option<String>,
    /// Current meal period in the menu timezone when absent.
    #[serde(default)]
    pub meal: Option<MealPeriod>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub meal_period: Option<MealPeriod>,
    pub model_ready: bool,
    pub recommendations: Vec<ScoredListing>,
}

/// POST /recommend
///
/// Ranks caller-supplied listings against caller-supplied preferences.
#[tracing::instrument(skip_all, fields(listings = payload.listings.len()))]
pub async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    payload.validate()?;

    let recommendations = state
        .recommender
        .recommend(
            &payload.listings,
            payload.meal_period,
            &payload.preferences,
            payload.limit,
        )
        .await;

    Ok(Json(RecommendationsResponse {
        meal_period: payload.meal_period,
        model_ready: state.recommender.is_model_ready(),
        recommendations,
    }))
}

/// GET /recommendations
///
/// Reads the menu and the eater's saved preferences from the store. Unknown or missing
/// eaters are served as anonymous.
#[tracing::instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    query.validate()?;

    let timezone = &state.config.menu.timezone;
    let date = match query.date.as_deref() {
        Some(raw) => menuwise_shared::parse_date(raw)?,
        None => menuwise_shared::today(timezone),
    };
    let meal = query
        .meal
        .unwrap_or_else(|| menuwise_shared::current_meal_period(timezone));

    let preferences = match query.eater_id.as_deref().map(str::trim) {
        Some(eater_id) if !eater_id.is_empty() => state
            .store
            .preferences_for(eater_id)
            .await?
            .unwrap_or_default(),
        _ => EaterPreferences::default(),
    };

    let listings = state.store.listings_for(date, Some(meal)).await?;

    tracing::debug!(%date, %meal, listings = listings.len(), "Loaded menu");

    let recommendations = state
        .recommender
        .recommend(&listings, Some(meal), &preferences, query.limit)
        .await;

    Ok(Json(RecommendationsResponse {
        meal_period: Some(meal),
        model_ready: state.recommender.is_model_ready(),
        recommendations,
    }))
}
