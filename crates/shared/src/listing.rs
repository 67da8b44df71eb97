use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

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
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealPeriod {
    /// Serving window for a local hour: breakfast from 7, lunch from 11, dinner from 15.
    pub fn at_hour(hour: u8) -> Self {
        match hour {
            7..=10 => MealPeriod::Breakfast,
            11..=14 => MealPeriod::Lunch,
            _ => MealPeriod::Dinner,
        }
    }
}

/// Known dining locations with their display names.
pub const KNOWN_LOCATIONS: [(&str, &str); 4] = [
    ("worcester", "Worcester"),
    ("franklin", "Franklin"),
    ("berkshire", "Berkshire"),
    ("hampshire", "Hampshire"),
];

pub fn location_name(id: &str) -> Option<&'static str> {
    let id = id.trim().to_lowercase();

    KNOWN_LOCATIONS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

/// Nutrition facts per serving, each field independently optional.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: Option<f32>,
    #[serde(default)]
    pub protein: Option<f32>,
    #[serde(default)]
    pub carbs: Option<f32>,
    #[serde(default)]
    pub fat: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodListing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meal_period: Option<MealPeriod>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// Tags carried in from ingestion; untrusted and possibly contradictory.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FoodListing {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category: None,
            meal_period: None,
            location: None,
            nutrition: Nutrition::default(),
            tags: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_meal_period(mut self, meal_period: MealPeriod) -> Self {
        self.meal_period = Some(meal_period);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }
}

/// A listing ranked for one recommendation response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: FoodListing,
    /// Relevance in `[0, 100]`.
    pub score: f32,
    /// How decisively the score was produced, in `[0, 1]`.
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_period_at_hour() {
        assert_eq!(MealPeriod::at_hour(6), MealPeriod::Dinner);
        assert_eq!(MealPeriod::at_hour(7), MealPeriod::Breakfast);
        assert_eq!(MealPeriod::at_hour(10), MealPeriod::Breakfast);
        assert_eq!(MealPeriod::at_hour(11), MealPeriod::Lunch);
        assert_eq!(MealPeriod::at_hour(14), MealPeriod::Lunch);
        assert_eq!(MealPeriod::at_hour(15), MealPeriod::Dinner);
        assert_eq!(MealPeriod::at_hour(23), MealPeriod::Dinner);
    }

    #[test]
    fn test_meal_period_parse() {
        assert_eq!("lunch".parse::<MealPeriod>().ok(), Some(MealPeriod::Lunch));
        assert_eq!("Dinner".parse::<MealPeriod>().ok(), Some(MealPeriod::Dinner));
        assert!("brunch".parse::<MealPeriod>().is_err());
    }

    #[test]
    fn test_listing_deserializes_with_missing_optionals() {
        let listing: FoodListing =
            serde_json::from_str(r#"{"id":"1","name":"Tomato Soup"}"#).unwrap();

        assert_eq!(listing.description, None);
        assert_eq!(listing.nutrition, Nutrition::default());
        assert!(listing.tags.is_empty());
    }

    #[test]
    fn test_location_name() {
        assert_eq!(location_name(" Franklin "), Some("Franklin"));
        assert_eq!(location_name("north"), None);
    }
}
