use std::collections::BTreeSet;

use axum::Json;
use menuwise_shared::{DietaryTag, FoodListing};
use menuwise_tagging::{Classification, matches_diet_filters};
use serde::{Deserialize, Serialize};

/// POST /classify
///
/// Inferred tags, allergens, summary and per-tag explanation for one listing. Never
/// fails on content: sparse listings simply come back with fewer tags.
#[tracing::instrument(skip_all, fields(listing_id = %listing.id))]
pub async fn classify(Json(listing): Json<FoodListing>) -> Json<Classification> {
    Json(menuwise_tagging::classify(&listing))
}

#[derive(Debug, Deserialize)]
pub struct DietFilterRequest {
    pub listing: FoodListing,
    #[serde(default)]
    pub required: BTreeSet<DietaryTag>,
}

#[derive(Debug, Serialize)]
pub struct DietFilterResponse {
    pub matches: bool,
}

/// POST /diet-filter
pub async fn diet_filter(Json(payload): Json<DietFilterRequest>) -> Json<DietFilterResponse> {
    let matches = matches_diet_filters(&payload.listing, &payload.required);

    tracing::debug!(
        listing_id = %payload.listing.id,
        required = ?payload.required,
        matches,
        "Diet filter evaluated"
    );

    Json(DietFilterResponse { matches })
}
