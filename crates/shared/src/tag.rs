use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Closed set of dietary labels the inference engine can emit.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DietaryTag {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietaryTag {
    /// Parses a stored tag after trimming, lowercasing and mapping `_` to `-`.
    ///
    /// Returns `None` for anything outside the closed set, such as `halal`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        normalize_tag(raw).parse().ok()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Vegan => "Vegan",
            DietaryTag::GlutenFree => "Gluten-Free",
            DietaryTag::DairyFree => "Dairy-Free",
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Allergen {
    Nuts,
    Soy,
    Shellfish,
    Eggs,
    Wheat,
    Dairy,
}

/// Canonical form of a free-text tag: trimmed, lowercase, single spaces, `_` → `-`.
pub fn normalize_tag(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lenient_accepts_storage_spellings() {
        assert_eq!(
            DietaryTag::parse_lenient("gluten_free"),
            Some(DietaryTag::GlutenFree)
        );
        assert_eq!(
            DietaryTag::parse_lenient("  Dairy-Free "),
            Some(DietaryTag::DairyFree)
        );
        assert_eq!(DietaryTag::parse_lenient("VEGAN"), Some(DietaryTag::Vegan));
        assert_eq!(DietaryTag::parse_lenient("halal"), None);
    }

    #[test]
    fn test_display_is_kebab_case() {
        assert_eq!(DietaryTag::GlutenFree.to_string(), "gluten-free");
        assert_eq!(Allergen::Shellfish.to_string(), "shellfish");
        assert_eq!(
            serde_json::to_string(&DietaryTag::DairyFree).unwrap(),
            "\"dairy-free\""
        );
    }
}
