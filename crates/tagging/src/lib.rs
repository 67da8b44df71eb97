//! Menu listing classification
//!
//! Stateless services that turn free-text listings into dietary tags and allergen
//! warnings. Everything here is total: sparse or ambiguous text resolves to the most
//! conservative answer instead of an error.

mod allergen;
mod diet_filter;
mod inference;
mod normalize;
mod signal;
mod summary;

pub use allergen::*;
pub use diet_filter::*;
pub use inference::*;
pub use normalize::*;
pub use signal::*;
pub use summary::*;

use std::collections::BTreeSet;

use menuwise_shared::{Allergen, DietaryTag, FoodListing};
use serde::Serialize;

/// Everything the classifier can say about one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub tags: BTreeSet<DietaryTag>,
    pub allergens: BTreeSet<Allergen>,
    pub summary: String,
    pub explanation: Vec<TagDecision>,
}

pub fn classify(listing: &FoodListing) -> Classification {
    let blob = listing_blob(listing);
    let explanation = explain_blob(&blob, &listing.tags);
    let tags = included_tags(&explanation);

    Classification {
        summary: dietary_summary(&tags),
        allergens: detect_allergens_in(&blob),
        tags,
        explanation,
    }
}
