use std::collections::BTreeSet;

use menuwise_shared::{Allergen, FoodListing};
use strum::VariantArray;

use crate::{DAIRY_KEYWORDS, EGG_KEYWORDS, contains_any, listing_blob};

const NUT_KEYWORDS: &[&str] = &[
    "nut",
    "nuts",
    "peanut",
    "almond",
    "cashew",
    "walnut",
    "pecan",
    "pistachio",
    "hazelnut",
    "macadamia",
    "pine nut",
    "praline",
];

const SOY_KEYWORDS: &[&str] = &["soy", "soya", "tofu", "edamame", "miso", "tempeh", "tamari"];

const SHELLFISH_KEYWORDS: &[&str] = &[
    "shrimp", "crab", "lobster", "clam", "mussel", "oyster", "scallop", "crawfish", "prawn",
];

const WHEAT_KEYWORDS: &[&str] = &[
    "wheat", "flour", "bread", "pasta", "noodle", "cracker", "cereal",
];

pub fn allergen_keywords(allergen: Allergen) -> &'static [&'static str] {
    match allergen {
        Allergen::Nuts => NUT_KEYWORDS,
        Allergen::Soy => SOY_KEYWORDS,
        Allergen::Shellfish => SHELLFISH_KEYWORDS,
        Allergen::Eggs => EGG_KEYWORDS,
        Allergen::Wheat => WHEAT_KEYWORDS,
        Allergen::Dairy => DAIRY_KEYWORDS,
    }
}

/// Allergens mentioned anywhere in a normalized blob.
///
/// Matching is by substring, so false positives ("coconut" flags nuts) are accepted;
/// a missed allergen is the worse outcome.
pub fn detect_allergens_in(blob: &str) -> BTreeSet<Allergen> {
    Allergen::VARIANTS
        .iter()
        .copied()
        .filter(|allergen| contains_any(blob, allergen_keywords(*allergen)))
        .collect()
}

pub fn detect_allergens(listing: &FoodListing) -> BTreeSet<Allergen> {
    detect_allergens_in(&listing_blob(listing))
}
