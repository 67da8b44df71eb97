use std::collections::BTreeSet;

use menuwise_shared::DietaryTag;

const SEPARATOR: &str = " • ";

/// Short human label for a tag set, e.g. `Vegan • Gluten-Free`.
///
/// Implied tags are folded into the strongest one: vegan hides vegetarian and dairy-free.
pub fn dietary_summary(tags: &BTreeSet<DietaryTag>) -> String {
    let vegan = tags.contains(&DietaryTag::Vegan);
    let mut labels = Vec::with_capacity(3);

    if vegan {
        labels.push(DietaryTag::Vegan.label());
    } else if tags.contains(&DietaryTag::Vegetarian) {
        labels.push(DietaryTag::Vegetarian.label());
    }

    if tags.contains(&DietaryTag::GlutenFree) {
        labels.push(DietaryTag::GlutenFree.label());
    }

    if !vegan && tags.contains(&DietaryTag::DairyFree) {
        labels.push(DietaryTag::DairyFree.label());
    }

    labels.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vegan_hides_implied_tags() {
        let tags = BTreeSet::from([
            DietaryTag::Vegan,
            DietaryTag::Vegetarian,
            DietaryTag::DairyFree,
            DietaryTag::GlutenFree,
        ]);
        assert_eq!(dietary_summary(&tags), "Vegan • Gluten-Free");
    }

    #[test]
    fn test_vegetarian_and_dairy_free() {
        let tags = BTreeSet::from([DietaryTag::Vegetarian, DietaryTag::DairyFree]);
        assert_eq!(dietary_summary(&tags), "Vegetarian • Dairy-Free");
    }

    #[test]
    fn test_empty() {
        assert_eq!(dietary_summary(&BTreeSet::new()), "");
    }
}
