use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum MenuItem {
    Table,
    Id,
    Name,
    Description,
    Category,
    MealType,
    DiningHallId,
    MenuDate,
    Calories,
    Protein,
    Carbs,
    Fat,
    Tags,
}

#[derive(Iden, Clone)]
pub enum EaterPreference {
    Table,
    EaterId,
    DietaryPreferences,
    FavoredLocations,
    DislikedIngredients,
    UpdatedAt,
}
