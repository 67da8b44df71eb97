use std::collections::BTreeSet;

use menuwise_shared::{Allergen, DietaryTag, FoodListing};
use menuwise_tagging::{
    Reason, classify, detect_allergens, explain_dietary_tags, infer_dietary_tags,
    matches_diet_filters,
};

fn listing(name: &str, description: &str, tags: &[&str]) -> FoodListing {
    FoodListing::new(name.to_lowercase().replace(' ', "-"), name)
        .with_description(description)
        .with_tags(tags.iter().copied())
}

fn corpus() -> Vec<FoodListing> {
    vec![
        listing(
            "Grilled Chicken Caesar Wrap",
            "chicken, romaine, parmesan, caesar dressing",
            &[],
        ),
        listing(
            "Mediterranean Falafel Bowl",
            "crispy falafel, hummus, tahini",
            &["vegan"],
        ),
        listing("Vegan Brownie", "contains milk chocolate", &["vegan"]),
        listing("Shrimp Tacos", "vegan slaw, corn tortilla", &["vegetarian", "vegan"]),
        listing("Tofu Scramble", "plant-based, gf", &[]),
        listing("Honey Oat Bar", "rolled oats, honey", &["vegan"]),
        listing("Spinach Omelette", "eggs, spinach", &["vegetarian"]),
        listing("Mac and Cheese", "cheddar, elbow pasta", &["dairy_free"]),
        listing("Lentil Soup", "", &["Gluten_Free", "halal"]),
        listing("Tuna Melt", "", &[]),
        listing("", "", &[]),
    ]
}

#[test]
fn chicken_caesar_wrap_has_no_dietary_tags() {
    let wrap = listing(
        "Grilled Chicken Caesar Wrap",
        "chicken, romaine, parmesan, caesar dressing",
        &[],
    );

    assert!(infer_dietary_tags(&wrap).is_empty());
    assert_eq!(detect_allergens(&wrap), BTreeSet::from([Allergen::Dairy]));
}

#[test]
fn tagged_falafel_bowl_is_vegan_and_implied_tags() {
    let bowl = listing(
        "Mediterranean Falafel Bowl",
        "crispy falafel, hummus, tahini",
        &["vegan"],
    );

    assert_eq!(
        infer_dietary_tags(&bowl),
        BTreeSet::from([DietaryTag::Vegan, DietaryTag::Vegetarian, DietaryTag::DairyFree])
    );
}

#[test]
fn milk_overrides_vegan_claim() {
    let brownie = listing("Vegan Brownie", "contains milk chocolate", &["vegan"]);
    let tags = infer_dietary_tags(&brownie);

    assert!(!tags.contains(&DietaryTag::Vegan));
    assert!(!tags.contains(&DietaryTag::DairyFree));
    assert!(tags.contains(&DietaryTag::Vegetarian));

    let vegan = explain_dietary_tags(&brownie)
        .into_iter()
        .find(|decision| decision.tag == DietaryTag::Vegan);
    assert_eq!(vegan.map(|d| d.reason), Some(Reason::DairyDetected));
}

#[test]
fn seafood_beats_stored_and_claimed_tags() {
    let tacos = listing("Shrimp Tacos", "vegan slaw, corn tortilla", &["vegetarian", "vegan"]);
    let tags = infer_dietary_tags(&tacos);

    assert!(!tags.contains(&DietaryTag::Vegan));
    assert!(!tags.contains(&DietaryTag::Vegetarian));
}

#[test]
fn claims_in_text_are_admitted() {
    let scramble = listing("Tofu Scramble", "plant-based, gf", &[]);

    assert_eq!(
        infer_dietary_tags(&scramble),
        BTreeSet::from([
            DietaryTag::Vegan,
            DietaryTag::Vegetarian,
            DietaryTag::GlutenFree,
            DietaryTag::DairyFree,
        ])
    );
}

#[test]
fn honey_and_egg_block_vegan_only() {
    let bar = listing("Honey Oat Bar", "rolled oats, honey", &["vegan"]);
    assert_eq!(
        infer_dietary_tags(&bar),
        BTreeSet::from([DietaryTag::Vegetarian])
    );

    let omelette = listing("Spinach Omelette", "eggs, spinach", &["vegetarian"]);
    assert_eq!(
        infer_dietary_tags(&omelette),
        BTreeSet::from([DietaryTag::Vegetarian])
    );
}

#[test]
fn stored_dairy_free_tag_contradicted_by_cheese() {
    let mac = listing("Mac and Cheese", "cheddar, elbow pasta", &["dairy_free"]);
    assert!(!infer_dietary_tags(&mac).contains(&DietaryTag::DairyFree));
}

#[test]
fn stored_tags_are_normalized() {
    let soup = listing("Lentil Soup", "", &["Gluten_Free", "halal"]);
    assert!(infer_dietary_tags(&soup).contains(&DietaryTag::GlutenFree));
}

#[test]
fn meat_or_seafood_never_vegetarian() {
    for item in corpus() {
        let blob = menuwise_tagging::listing_blob(&item);
        let signals = menuwise_tagging::Signals::detect(&blob);
        if signals.has_meat || signals.has_seafood {
            let tags = infer_dietary_tags(&item);
            assert!(!tags.contains(&DietaryTag::Vegan), "{}", item.name);
            assert!(!tags.contains(&DietaryTag::Vegetarian), "{}", item.name);
        }
    }
}

#[test]
fn vegan_implies_vegetarian_and_dairy_free() {
    for item in corpus() {
        let tags = infer_dietary_tags(&item);
        if tags.contains(&DietaryTag::Vegan) {
            assert!(tags.contains(&DietaryTag::Vegetarian), "{}", item.name);
            assert!(tags.contains(&DietaryTag::DairyFree), "{}", item.name);
        }
    }
}

#[test]
fn vegan_items_match_vegetarian_filter() {
    let vegetarian = BTreeSet::from([DietaryTag::Vegetarian]);

    for item in corpus() {
        if infer_dietary_tags(&item).contains(&DietaryTag::Vegan) {
            assert!(matches_diet_filters(&item, &vegetarian), "{}", item.name);
        }
    }
}

#[test]
fn allergens_are_monotonic_in_keywords() {
    for item in corpus() {
        let before = detect_allergens(&item);
        let extended = FoodListing {
            description: Some(format!(
                "{} with peanuts",
                item.description.clone().unwrap_or_default()
            )),
            ..item.clone()
        };
        let after = detect_allergens(&extended);

        assert!(before.is_subset(&after), "{}", item.name);
        assert!(after.contains(&Allergen::Nuts));
    }
}

#[test]
fn inference_is_idempotent() {
    for item in corpus() {
        assert_eq!(infer_dietary_tags(&item), infer_dietary_tags(&item));
    }
}

#[test]
fn classify_bundles_summary_and_allergens() {
    let classification = classify(&listing(
        "Mediterranean Falafel Bowl",
        "crispy falafel, hummus, tahini",
        &["vegan"],
    ));

    assert_eq!(classification.summary, "Vegan");
    assert!(classification.allergens.is_empty());
    assert_eq!(classification.explanation.len(), 4);
}
