use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::DietaryTag;

/// What an eater has told us about themselves. The default is an anonymous eater.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EaterPreferences {
    #[serde(default)]
    pub required_tags: BTreeSet<DietaryTag>,
    #[serde(default)]
    pub favored_locations: BTreeSet<String>,
    /// Matched case-insensitively as substrings of the listing text.
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,
}

impl EaterPreferences {
    /// No required tags, favored locations or dislikes.
    pub fn is_anonymous(&self) -> bool {
        self.required_tags.is_empty()
            && self.favored_locations.is_empty()
            && self.disliked_ingredients.is_empty()
    }

    pub fn is_favored_location(&self, location: Option<&str>) -> bool {
        let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) else {
            return false;
        };

        self.favored_locations
            .iter()
            .any(|favored| favored.trim().eq_ignore_ascii_case(location))
    }
}
