//! Fixed-length numeric encoding of a listing for the learned scorer.
//!
//! Layout, in order:
//! - dietary tags, then pass-through extension tags (one-hot)
//! - known locations (one-hot)
//! - meal periods (one-hot)
//! - category buckets (multi-hot, substring match)
//! - calories, protein, carbs, fat, each divided by a reference maximum and clamped to `[0, 1]`
//! - preference scalars: required-tag fraction, favored location, no disliked ingredient, intensity

use std::collections::BTreeSet;

use menuwise_shared::{
    DietaryTag, EaterPreferences, FoodListing, KNOWN_LOCATIONS, MealPeriod, normalize_tag,
};
use menuwise_tagging::{infer_dietary_tags, listing_blob, mentions_any_ingredient, satisfies};
use strum::VariantArray;

/// Descriptive tags scored when present on a listing but never inferred.
pub const EXTENSION_TAGS: [&str; 3] = ["halal", "kosher", "high-protein"];

pub const CATEGORY_BUCKETS: [&str; 12] = [
    "grill",
    "pizza",
    "pasta",
    "plant-based",
    "salad bar",
    "deli",
    "desserts",
    "global",
    "breakfast",
    "soups",
    "comfort",
    "entrees",
];

/// Calories, protein, carbs and fat values that map to `1.0`.
pub const NUTRITION_REFERENCE: [f32; 4] = [800.0, 50.0, 100.0, 40.0];

const PREFERENCE_SCALARS: usize = 4;

/// Preference signals needed for a full intensity of `1.0`.
const INTENSITY_SATURATION: f32 = 6.0;

pub const FEATURE_LEN: usize = DietaryTag::VARIANTS.len()
    + EXTENSION_TAGS.len()
    + KNOWN_LOCATIONS.len()
    + MealPeriod::VARIANTS.len()
    + CATEGORY_BUCKETS.len()
    + NUTRITION_REFERENCE.len()
    + PREFERENCE_SCALARS;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f32; FEATURE_LEN]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// The trailing preference block.
    pub fn preference_scalars(&self) -> &[f32] {
        &self.0[FEATURE_LEN - PREFERENCE_SCALARS..]
    }
}

impl From<[f32; FEATURE_LEN]> for FeatureVector {
    fn from(value: [f32; FEATURE_LEN]) -> Self {
        Self(value)
    }
}

/// Per-listing derived data shared by the encoder, the scorer and the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingProfile {
    pub tags: BTreeSet<DietaryTag>,
    /// Normalized stored tags outside the inferred set, e.g. `halal`.
    pub extra_tags: BTreeSet<String>,
    pub blob: String,
}

impl ListingProfile {
    pub fn of(listing: &FoodListing) -> Self {
        let extra_tags = listing
            .tags
            .iter()
            .filter(|tag| DietaryTag::parse_lenient(tag).is_none())
            .map(|tag| normalize_tag(tag))
            .collect();

        Self {
            tags: infer_dietary_tags(listing),
            extra_tags,
            blob: listing_blob(listing),
        }
    }

    pub fn has_disliked(&self, prefs: &EaterPreferences) -> bool {
        mentions_any_ingredient(&self.blob, &prefs.disliked_ingredients)
    }

    /// Share of the eater's required tags this listing satisfies, `0.5` when none are required.
    pub fn required_fraction(&self, prefs: &EaterPreferences) -> f32 {
        if prefs.required_tags.is_empty() {
            return 0.5;
        }

        let satisfied = prefs
            .required_tags
            .iter()
            .filter(|tag| satisfies(&self.tags, **tag))
            .count();

        satisfied as f32 / prefs.required_tags.len() as f32
    }
}

fn one_hot(out: &mut Vec<f32>, hit: bool) {
    out.push(if hit { 1.0 } else { 0.0 });
}

fn scaled(value: Option<f32>, reference: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => (v / reference).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

pub fn encode(
    listing: &FoodListing,
    profile: &ListingProfile,
    prefs: &EaterPreferences,
) -> FeatureVector {
    let mut out = Vec::with_capacity(FEATURE_LEN);

    for tag in DietaryTag::VARIANTS {
        one_hot(&mut out, profile.tags.contains(tag));
    }
    for tag in EXTENSION_TAGS {
        one_hot(&mut out, profile.extra_tags.contains(tag));
    }

    let location = listing
        .location
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .unwrap_or_default();
    for (id, _) in KNOWN_LOCATIONS {
        one_hot(&mut out, location == id);
    }

    for meal in MealPeriod::VARIANTS {
        one_hot(&mut out, listing.meal_period == Some(*meal));
    }

    let category = listing
        .category
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    for bucket in CATEGORY_BUCKETS {
        one_hot(&mut out, !category.is_empty() && category.contains(bucket));
    }

    let nutrition = &listing.nutrition;
    let values = [
        nutrition.calories,
        nutrition.protein,
        nutrition.carbs,
        nutrition.fat,
    ];
    for (value, reference) in values.into_iter().zip(NUTRITION_REFERENCE) {
        out.push(scaled(value, reference));
    }

    if prefs.is_anonymous() {
        out.extend([0.5, 0.5, 1.0, 0.0]);
    } else {
        out.push(profile.required_fraction(prefs));
        one_hot(
            &mut out,
            prefs.is_favored_location(listing.location.as_deref()),
        );
        one_hot(&mut out, !profile.has_disliked(prefs));
        let signals = (prefs.required_tags.len() + prefs.favored_locations.len()) as f32;
        out.push((signals / INTENSITY_SATURATION).min(1.0));
    }

    let mut features = [0.0; FEATURE_LEN];
    features.copy_from_slice(&out);

    FeatureVector(features)
}
