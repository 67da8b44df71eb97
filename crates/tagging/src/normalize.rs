use menuwise_shared::FoodListing;

/// Lowercases and collapses every whitespace run to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Single comparison blob built from a name and an optional description.
pub fn text_blob(name: &str, description: Option<&str>) -> String {
    normalize(&format!("{} {}", name, description.unwrap_or_default()))
}

pub fn listing_blob(listing: &FoodListing) -> String {
    text_blob(&listing.name, listing.description.as_deref())
}

/// True when the blob contains any of the given ingredients.
///
/// Ingredients go through the same normalization as the blob; blank entries never match.
pub fn mentions_any_ingredient(blob: &str, ingredients: &[String]) -> bool {
    ingredients
        .iter()
        .map(|ingredient| normalize(ingredient))
        .filter(|ingredient| !ingredient.is_empty())
        .any(|ingredient| blob.contains(&ingredient))
}
