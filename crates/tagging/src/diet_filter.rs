use std::collections::BTreeSet;

use menuwise_shared::{DietaryTag, FoodListing};

use crate::infer_dietary_tags;

/// Whether a set of inferred tags satisfies a single requirement.
///
/// Vegan satisfies vegetarian and dairy-free. Vegan and gluten-free need an exact match.
pub fn satisfies(tags: &BTreeSet<DietaryTag>, required: DietaryTag) -> bool {
    match required {
        DietaryTag::Vegetarian | DietaryTag::DairyFree => {
            tags.contains(&required) || tags.contains(&DietaryTag::Vegan)
        }
        DietaryTag::Vegan | DietaryTag::GlutenFree => tags.contains(&required),
    }
}

/// AND across every requirement. An empty requirement set always matches.
pub fn satisfies_all(tags: &BTreeSet<DietaryTag>, required: &BTreeSet<DietaryTag>) -> bool {
    required.iter().all(|tag| satisfies(tags, *tag))
}

pub fn matches_diet_filters(listing: &FoodListing, required: &BTreeSet<DietaryTag>) -> bool {
    if required.is_empty() {
        return true;
    }

    satisfies_all(&infer_dietary_tags(listing), required)
}
