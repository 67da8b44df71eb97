use menuwise_shared::{DietaryTag, EaterPreferences, FoodListing};
use serde::{Deserialize, Serialize};

use crate::{FeatureVector, ListingProfile, ModelCapability, ModelError};

pub const SCORE_MIN: f32 = 0.0;
pub const SCORE_MAX: f32 = 100.0;

/// Additive rule weights on the `[0, 100]` scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub neutral_base: f32,
    /// Multiplier turning a model output in `[0, 1]` into a base score.
    pub model_scale: f32,
    /// Confidence reported whenever the model did not produce the score, and the floor
    /// of model confidence.
    pub rule_confidence: f32,
    pub dietary_match: f32,
    /// Extra per requirement when vegan is what satisfies vegetarian or dairy-free.
    pub vegan_subsumption: f32,
    pub favored_location: f32,
    pub disliked_penalty: f32,
    pub nutrition_bonus: f32,
    pub protein_threshold: f32,
    pub calorie_floor: f32,
    pub calorie_ceiling: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            neutral_base: 50.0,
            model_scale: 60.0,
            rule_confidence: 0.5,
            dietary_match: 35.0,
            vegan_subsumption: 5.0,
            favored_location: 15.0,
            disliked_penalty: 100.0,
            nutrition_bonus: 5.0,
            protein_threshold: 20.0,
            calorie_floor: 100.0,
            calorie_ceiling: 600.0,
        }
    }
}

impl ScoringWeights {
    /// Largest sum of positive adjustments a single listing can collect.
    pub fn max_positive(&self) -> f32 {
        self.dietary_match
            + 2.0 * self.vegan_subsumption
            + self.favored_location
            + 2.0 * self.nutrition_bonus
    }

    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("neutral_base", self.neutral_base),
            ("model_scale", self.model_scale),
            ("rule_confidence", self.rule_confidence),
            ("dietary_match", self.dietary_match),
            ("vegan_subsumption", self.vegan_subsumption),
            ("favored_location", self.favored_location),
            ("disliked_penalty", self.disliked_penalty),
            ("nutrition_bonus", self.nutrition_bonus),
            ("protein_threshold", self.protein_threshold),
            ("calorie_floor", self.calorie_floor),
            ("calorie_ceiling", self.calorie_ceiling),
        ];

        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(format!("scoring.{name} must be a finite non-negative number"));
        }

        if self.rule_confidence > 1.0 {
            return Err("scoring.rule_confidence must be within [0, 1]".to_owned());
        }

        if self.disliked_penalty <= self.max_positive() {
            return Err(format!(
                "scoring.disliked_penalty ({}) must exceed the combined positive adjustments ({})",
                self.disliked_penalty,
                self.max_positive()
            ));
        }

        if self.calorie_floor >= self.calorie_ceiling {
            return Err("scoring.calorie_floor must be below scoring.calorie_ceiling".to_owned());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPath {
    Model,
    RuleBased,
    /// The model was available but failed, so rules took over.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub value: f32,
    pub confidence: f32,
    pub path: ScoringPath,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores one listing. Model failures are absorbed here and never reach the caller.
    pub fn score(
        &self,
        listing: &FoodListing,
        profile: &ListingProfile,
        prefs: &EaterPreferences,
        features: &FeatureVector,
        model: ModelCapability<'_>,
    ) -> Score {
        let rules = (self.weights.neutral_base, self.weights.rule_confidence);

        let ((base, confidence), path) = match model {
            ModelCapability::Unavailable => (rules, ScoringPath::RuleBased),
            ModelCapability::Available(model) => {
                match model.predict(features).and_then(checked_output) {
                    Ok(output) => (
                        (output * self.weights.model_scale, self.model_confidence(output)),
                        ScoringPath::Model,
                    ),
                    Err(err) => {
                        tracing::warn!(
                            listing_id = %listing.id,
                            "Scoring model failed, using rule-based score: {err}"
                        );
                        (rules, ScoringPath::Fallback)
                    }
                }
            }
        };

        let value = (base + self.adjustments(listing, profile, prefs)).clamp(SCORE_MIN, SCORE_MAX);

        Score {
            value,
            confidence,
            path,
        }
    }

    /// Distance of `output` from the 0.5 boundary, mapped onto `[rule_confidence, 1]`.
    ///
    /// A model score is never less confident than the rules alone, so a fallback can
    /// only lower confidence.
    pub fn model_confidence(&self, output: f32) -> f32 {
        let floor = self.weights.rule_confidence;
        let decisiveness = (output - 0.5).abs() * 2.0;

        floor + (1.0 - floor) * decisiveness
    }

    /// Sum of the rule-based adjustments, applied on top of the base score.
    pub fn adjustments(
        &self,
        listing: &FoodListing,
        profile: &ListingProfile,
        prefs: &EaterPreferences,
    ) -> f32 {
        let w = &self.weights;
        let mut total = 0.0;

        if !prefs.required_tags.is_empty() {
            total += w.dietary_match * profile.required_fraction(prefs);

            if profile.tags.contains(&DietaryTag::Vegan) {
                let subsumed = prefs
                    .required_tags
                    .iter()
                    .filter(|tag| matches!(tag, DietaryTag::Vegetarian | DietaryTag::DairyFree))
                    .count();
                total += w.vegan_subsumption * subsumed as f32;
            }
        }

        if prefs.is_favored_location(listing.location.as_deref()) {
            total += w.favored_location;
        }

        if profile.has_disliked(prefs) {
            total -= w.disliked_penalty;
        }

        let nutrition = &listing.nutrition;
        if nutrition.protein.is_some_and(|p| p > w.protein_threshold) {
            total += w.nutrition_bonus;
        }
        if nutrition
            .calories
            .is_some_and(|c| c > w.calorie_floor && c < w.calorie_ceiling)
        {
            total += w.nutrition_bonus;
        }

        total
    }
}

fn checked_output(output: f32) -> Result<f32, ModelError> {
    if output.is_finite() && (0.0..=1.0).contains(&output) {
        Ok(output)
    } else {
        Err(ModelError::OutOfRange(output))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use menuwise_shared::Nutrition;

    use super::*;
    use crate::{ScoringModel, encode};

    struct Fixed(f32);

    impl ScoringModel for Fixed {
        fn predict(&self, _features: &FeatureVector) -> Result<f32, ModelError> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl ScoringModel for Broken {
        fn predict(&self, _features: &FeatureVector) -> Result<f32, ModelError> {
            Err(ModelError::Inference("tensor backend crashed".to_owned()))
        }
    }

    fn score(listing: &FoodListing, prefs: &EaterPreferences, model: ModelCapability<'_>) -> Score {
        let profile = ListingProfile::of(listing);
        let features = encode(listing, &profile, prefs);

        ScoringEngine::default().score(listing, &profile, prefs, &features, model)
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert_eq!(ScoringWeights::default().validate(), Ok(()));
    }

    #[test]
    fn test_penalty_must_dominate() {
        let weights = ScoringWeights {
            disliked_penalty: 40.0,
            ..Default::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_rule_based_neutral() {
        let s = score(
            &FoodListing::new("1", "Plain Rice"),
            &EaterPreferences::default(),
            ModelCapability::Unavailable,
        );

        assert_eq!(s.value, 50.0);
        assert_eq!(s.confidence, 0.5);
        assert_eq!(s.path, ScoringPath::RuleBased);
    }

    #[test]
    fn test_model_base_and_confidence() {
        let model = Fixed(0.9);
        let s = score(
            &FoodListing::new("1", "Plain Rice"),
            &EaterPreferences::default(),
            ModelCapability::Available(&model),
        );

        assert!((s.value - 54.0).abs() < 1e-4);
        assert!((s.confidence - 0.9).abs() < 1e-4);
        assert_eq!(s.path, ScoringPath::Model);
    }

    #[test]
    fn test_fallback_never_more_confident_than_model() {
        let listing = FoodListing::new("1", "Plain Rice");
        let prefs = EaterPreferences::default();
        let fallback = score(&listing, &prefs, ModelCapability::Available(&Broken));

        for output in [0.0, 0.3, 0.45, 0.5, 0.55, 0.74, 0.76, 1.0] {
            let model = Fixed(output);
            let s = score(&listing, &prefs, ModelCapability::Available(&model));

            assert_eq!(s.path, ScoringPath::Model);
            assert!(s.confidence >= fallback.confidence, "{output}");
            assert!(s.confidence <= 1.0, "{output}");
        }
    }

    #[test]
    fn test_model_failure_falls_back() {
        let listing = FoodListing::new("1", "Plain Rice");
        let prefs = EaterPreferences::default();

        let broken = score(&listing, &prefs, ModelCapability::Available(&Broken));
        let rules = score(&listing, &prefs, ModelCapability::Unavailable);
        assert_eq!(broken.value, rules.value);
        assert_eq!(broken.confidence, rules.confidence);
        assert_eq!(broken.path, ScoringPath::Fallback);

        let out_of_range = Fixed(f32::NAN);
        let s = score(&listing, &prefs, ModelCapability::Available(&out_of_range));
        assert_eq!(s.path, ScoringPath::Fallback);
    }

    #[test]
    fn test_vegan_subsumption_bonus() {
        let prefs = EaterPreferences {
            required_tags: BTreeSet::from([DietaryTag::DairyFree]),
            ..Default::default()
        };
        let vegan = FoodListing::new("1", "Lentil Curry").with_tags(["vegan"]);
        let dairy_free = FoodListing::new("2", "Rice Noodles").with_tags(["dairy-free"]);

        let vegan = score(&vegan, &prefs, ModelCapability::Unavailable);
        let dairy_free = score(&dairy_free, &prefs, ModelCapability::Unavailable);
        assert_eq!(vegan.value, 90.0);
        assert_eq!(dairy_free.value, 85.0);
    }

    #[test]
    fn test_disliked_penalty_overrides_everything() {
        let prefs = EaterPreferences {
            required_tags: BTreeSet::from([DietaryTag::Vegetarian, DietaryTag::DairyFree]),
            favored_locations: BTreeSet::from(["hampshire".to_owned()]),
            disliked_ingredients: vec!["mushroom".to_owned()],
        };
        let listing = FoodListing::new("1", "Vegan Mushroom Stroganoff")
            .with_location("hampshire")
            .with_nutrition(Nutrition {
                calories: Some(450.0),
                protein: Some(30.0),
                ..Default::default()
            });

        let s = score(&listing, &prefs, ModelCapability::Available(&Fixed(1.0)));
        assert!(s.value < ScoringEngine::default().weights().neutral_base);
    }

    #[test]
    fn test_score_is_bounded_for_odd_nutrition() {
        let prefs = EaterPreferences {
            favored_locations: BTreeSet::from(["worcester".to_owned()]),
            ..Default::default()
        };
        let values = [None, Some(-50.0), Some(f32::NAN), Some(f32::INFINITY), Some(250.0)];

        for value in values {
            let listing = FoodListing::new("1", "Mystery Plate")
                .with_location("worcester")
                .with_nutrition(Nutrition {
                    calories: value,
                    protein: value,
                    carbs: value,
                    fat: value,
                });

            for model in [ModelCapability::Unavailable, ModelCapability::Available(&Fixed(1.0))] {
                let s = score(&listing, &prefs, model);
                assert!((SCORE_MIN..=SCORE_MAX).contains(&s.value), "{value:?}");
                assert!((0.0..=1.0).contains(&s.confidence));
            }
        }
    }
}
