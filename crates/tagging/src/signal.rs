//! Keyword and explicit-claim detection over a normalized blob.
//!
//! Keyword lists match by substring containment, so "ham" also fires on
//! "hamburger". Claim patterns match whole words only, so the abbreviation
//! "vg" counts on its own but not inside "avg". Both assume the blob was
//! produced by [`crate::normalize`].

use std::sync::LazyLock;

use menuwise_shared::DietaryTag;
use regex::Regex;
use serde::Serialize;
use strum::{Display, VariantArray};

pub(crate) const MEAT_KEYWORDS: &[&str] = &[
    "beef",
    "chicken",
    "pork",
    "bacon",
    "ham",
    "sausage",
    "pepperoni",
    "turkey",
    "lamb",
    "steak",
    "meatball",
    "prosciutto",
    "salami",
    "hot dog",
    "ribs",
    "wing",
    "drumstick",
    "brisket",
    "corned beef",
    "pastrami",
    "chorizo",
    "bratwurst",
    "kielbasa",
    "ground beef",
    "pulled pork",
    "carnitas",
    "carne",
    "pollo",
    "roast beef",
];

pub(crate) const SEAFOOD_KEYWORDS: &[&str] = &[
    "fish",
    "salmon",
    "tuna",
    "shrimp",
    "crab",
    "lobster",
    "clam",
    "mussel",
    "oyster",
    "scallop",
    "anchovy",
    "cod",
    "tilapia",
    "mahi",
    "halibut",
    "trout",
    "swordfish",
    "catfish",
    "calamari",
    "squid",
    "octopus",
    "crawfish",
    "prawn",
];

pub(crate) const DAIRY_KEYWORDS: &[&str] = &[
    "milk",
    "cheese",
    "butter",
    "cream",
    "yogurt",
    "mozzarella",
    "cheddar",
    "parmesan",
    "feta",
    "gouda",
    "ricotta",
    "brie",
    "ice cream",
    "whipped",
    "sour cream",
    "cream cheese",
    "alfredo",
    "queso",
    "nacho cheese",
    "blue cheese",
    "provolone",
    "swiss",
];

pub(crate) const EGG_KEYWORDS: &[&str] = &[
    "egg",
    "omelet",
    "omelette",
    "mayo",
    "mayonnaise",
    "aioli",
    "meringue",
    "custard",
    "quiche",
    "frittata",
    "scrambled",
    "poached egg",
    "fried egg",
    "egg salad",
    "hollandaise",
];

pub(crate) const GLUTEN_KEYWORDS: &[&str] = &[
    "bread",
    "pasta",
    "flour",
    "wheat",
    "barley",
    "rye",
    "breaded",
    "battered",
    "crouton",
    "noodle",
    "tortilla",
    "pita",
    "wrap",
    "bun",
    "roll",
    "crust",
    "panko",
    "breadcrumb",
    "soy sauce",
];

const HONEY_KEYWORD: &str = "honey";

/// Animal-product and gluten families tracked by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum KeywordCategory {
    Meat,
    Seafood,
    Dairy,
    Egg,
    Gluten,
}

impl KeywordCategory {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Meat => MEAT_KEYWORDS,
            KeywordCategory::Seafood => SEAFOOD_KEYWORDS,
            KeywordCategory::Dairy => DAIRY_KEYWORDS,
            KeywordCategory::Egg => EGG_KEYWORDS,
            KeywordCategory::Gluten => GLUTEN_KEYWORDS,
        }
    }

    pub fn is_present(&self, blob: &str) -> bool {
        contains_any(blob, self.keywords())
    }
}

static VEGAN_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:vegan|vg|plant[- ]?based)\b|\b100%\s*plant\b").unwrap()
});

static VEGETARIAN_CLAIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:vegetarian|veg|meatless)\b").unwrap());

static GLUTEN_FREE_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gluten[- ]?free|gf|celiac[- ]?safe)\b").unwrap()
});

static DAIRY_FREE_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dairy[- ]?free|df|lactose[- ]?free|non[- ]?dairy)\b").unwrap()
});

/// Whole-word pattern recognising an explicit claim of `tag` in the text.
pub fn claim_pattern(tag: DietaryTag) -> &'static Regex {
    match tag {
        DietaryTag::Vegan => &*VEGAN_CLAIM,
        DietaryTag::Vegetarian => &*VEGETARIAN_CLAIM,
        DietaryTag::GlutenFree => &*GLUTEN_FREE_CLAIM,
        DietaryTag::DairyFree => &*DAIRY_FREE_CLAIM,
    }
}

/// Strictly boolean evidence extracted from one blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub has_meat: bool,
    pub has_seafood: bool,
    pub has_dairy: bool,
    pub has_egg: bool,
    pub has_gluten: bool,
    pub has_honey: bool,
    pub claims_vegan: bool,
    pub claims_vegetarian: bool,
    pub claims_gluten_free: bool,
    pub claims_dairy_free: bool,
}

impl Signals {
    pub fn detect(blob: &str) -> Self {
        Self {
            has_meat: KeywordCategory::Meat.is_present(blob),
            has_seafood: KeywordCategory::Seafood.is_present(blob),
            has_dairy: KeywordCategory::Dairy.is_present(blob),
            has_egg: KeywordCategory::Egg.is_present(blob),
            has_gluten: KeywordCategory::Gluten.is_present(blob),
            has_honey: blob.contains(HONEY_KEYWORD),
            claims_vegan: claim_pattern(DietaryTag::Vegan).is_match(blob),
            claims_vegetarian: claim_pattern(DietaryTag::Vegetarian).is_match(blob),
            claims_gluten_free: claim_pattern(DietaryTag::GlutenFree).is_match(blob),
            claims_dairy_free: claim_pattern(DietaryTag::DairyFree).is_match(blob),
        }
    }

    pub fn claims(&self, tag: DietaryTag) -> bool {
        match tag {
            DietaryTag::Vegan => self.claims_vegan,
            DietaryTag::Vegetarian => self.claims_vegetarian,
            DietaryTag::GlutenFree => self.claims_gluten_free,
            DietaryTag::DairyFree => self.claims_dairy_free,
        }
    }

    pub fn vegetarian_safe(&self) -> bool {
        !self.has_meat && !self.has_seafood
    }

    pub fn vegan_safe(&self) -> bool {
        self.vegetarian_safe() && !self.has_dairy && !self.has_egg && !self.has_honey
    }
}

pub(crate) fn contains_any(blob: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| blob.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    fn signals(text: &str) -> Signals {
        Signals::detect(&normalize(text))
    }

    #[test]
    fn test_detects_animal_products() {
        let s = signals("Grilled Chicken Caesar Wrap chicken, romaine, parmesan");

        assert!(s.has_meat);
        assert!(!s.has_seafood);
        assert!(s.has_dairy);
        assert!(s.has_gluten);
        assert!(!s.has_egg);
    }

    #[test]
    fn test_keyword_matching_is_substring() {
        assert!(signals("Hamburger").has_meat);
        assert!(signals("Shrimp Scampi").has_seafood);
        assert!(signals("Egg noodles").has_egg);
    }

    #[test]
    fn test_claims_require_whole_words() {
        assert!(signals("Vegan Chili").claims_vegan);
        assert!(signals("plant-based burger").claims_vegan);
        assert!(signals("Plant Based Nuggets").claims_vegan);
        assert!(signals("100% plant patty").claims_vegan);
        assert!(!signals("Veganaise spread").claims_vegan);

        assert!(signals("Meatless Monday pasta").claims_vegetarian);
        assert!(signals("Veg curry").claims_vegetarian);
        assert!(!signals("Vegetable soup").claims_vegetarian);

        assert!(signals("GF brownie").claims_gluten_free);
        assert!(signals("gluten free bread").claims_gluten_free);
        assert!(!signals("Bagful of chips").claims_gluten_free);

        assert!(signals("Non-dairy creamer").claims_dairy_free);
        assert!(signals("lactose free milk").claims_dairy_free);
    }

    #[test]
    fn test_safety_helpers() {
        let honey = signals("Honey glazed carrots");
        assert!(honey.vegetarian_safe());
        assert!(!honey.vegan_safe());

        let tofu = signals("Tofu stir fry");
        assert!(tofu.vegetarian_safe());
        assert!(tofu.vegan_safe());

        let tuna = signals("Tuna melt");
        assert!(!tuna.vegetarian_safe());
    }

    #[test]
    fn test_every_category_has_keywords() {
        for category in KeywordCategory::VARIANTS {
            assert!(!category.keywords().is_empty(), "{category} has no keywords");
        }
    }
}
