use std::{collections::BTreeSet, sync::Arc, time::Duration};

use menuwise_shared::{DietaryTag, EaterPreferences, FoodListing, MealPeriod, ScoredListing};
use menuwise_tagging::satisfies_all;

use crate::{ListingProfile, ModelCapability, ModelEngine, ScoringEngine, encode};

#[derive(Debug, Clone)]
pub struct RecommenderOptions {
    pub result_limit: usize,
    /// Upper bound on waiting for the model before scoring with rules only.
    pub model_init_timeout: Duration,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            result_limit: 8,
            model_init_timeout: Duration::from_secs(2),
        }
    }
}

pub struct Recommender {
    engine: Arc<ModelEngine>,
    scoring: ScoringEngine,
    options: RecommenderOptions,
}

impl Recommender {
    pub fn new(engine: ModelEngine, scoring: ScoringEngine, options: RecommenderOptions) -> Self {
        Self {
            engine: Arc::new(engine),
            scoring,
            options,
        }
    }

    pub fn rule_based() -> Self {
        Self::new(
            ModelEngine::disabled(),
            ScoringEngine::default(),
            RecommenderOptions::default(),
        )
    }

    pub fn options(&self) -> &RecommenderOptions {
        &self.options
    }

    pub fn is_model_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Gives the model up to `model_init_timeout` to load. Never fails: on error or
    /// timeout scoring continues with rules only.
    ///
    /// The load runs on its own task, so a timeout stops the wait, not the load. A slow
    /// model becomes ready in the background; a failed one is retried on the next call.
    pub async fn warm_up(&self) -> bool {
        if self.engine.is_ready() {
            return true;
        }

        let engine = Arc::clone(&self.engine);
        let load = tokio::spawn(async move { engine.initialize().await });

        match tokio::time::timeout(self.options.model_init_timeout, load).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(err))) => {
                tracing::warn!("Scoring model unavailable, using rules only: {err}")
            }
            Ok(Err(err)) => tracing::error!("Scoring model load task failed: {err}"),
            Err(_) => tracing::warn!(
                "Scoring model not ready after {:?}, using rules only while it loads",
                self.options.model_init_timeout
            ),
        }

        self.engine.is_ready()
    }

    /// Scores every listing that passes the hard filters, best first.
    ///
    /// Listings failing a required dietary tag or mentioning a disliked ingredient never
    /// appear in the output. Equal scores keep their input order.
    pub fn score_listings(
        &self,
        listings: &[FoodListing],
        prefs: &EaterPreferences,
    ) -> Vec<ScoredListing> {
        let loaded = self.engine.model();
        let model = ModelCapability::from(loaded.as_ref());

        let candidates = listings
            .iter()
            .map(|listing| (listing, ListingProfile::of(listing)))
            .filter(|(_, profile)| passes_diet(profile, &prefs.required_tags))
            .filter(|(_, profile)| !profile.has_disliked(prefs))
            .collect::<Vec<_>>();

        let mut scored = candidates
            .into_iter()
            .map(|(listing, profile)| {
                let features = encode(listing, &profile, prefs);
                let score = self
                    .scoring
                    .score(listing, &profile, prefs, &features, model);

                ScoredListing {
                    listing: listing.clone(),
                    score: score.value,
                    confidence: score.confidence,
                }
            })
            .collect::<Vec<_>>();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            candidates = listings.len(),
            kept = scored.len(),
            "Scored listings"
        );

        scored
    }

    /// [`Self::score_listings`] truncated to `limit`.
    pub fn rank(
        &self,
        listings: &[FoodListing],
        prefs: &EaterPreferences,
        limit: usize,
    ) -> Vec<ScoredListing> {
        let mut scored = self.score_listings(listings, prefs);
        scored.truncate(limit);

        scored
    }

    /// Full pipeline: restrict to the meal period, filter, score, sort and truncate.
    ///
    /// Listings without a meal period are dropped when `meal` is given.
    pub async fn recommend(
        &self,
        listings: &[FoodListing],
        meal: Option<MealPeriod>,
        prefs: &EaterPreferences,
        limit: Option<usize>,
    ) -> Vec<ScoredListing> {
        self.warm_up().await;

        let in_period = listings
            .iter()
            .filter(|listing| meal.is_none() || listing.meal_period == meal)
            .cloned()
            .collect::<Vec<_>>();

        self.rank(
            &in_period,
            prefs,
            limit.unwrap_or(self.options.result_limit),
        )
    }

    /// Releases the loaded model. A later [`Self::warm_up`] loads it again.
    pub fn dispose(&self) {
        self.engine.dispose();
    }
}

fn passes_diet(profile: &ListingProfile, required: &BTreeSet<DietaryTag>) -> bool {
    satisfies_all(&profile.tags, required)
}
