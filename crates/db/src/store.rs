use menuwise_shared::{
    DietaryTag, EaterPreferences, FoodListing, MealPeriod, Nutrition, Result, bail,
};
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::{Date, OffsetDateTime};

use crate::table::{EaterPreference, MenuItem};

/// Read side of the menu database consumed by the recommendation pipeline.
#[async_trait::async_trait]
pub trait MenuStore: Send + Sync {
    /// Every listing served on `date`, optionally restricted to one meal period.
    async fn listings_for(&self, date: Date, meal: Option<MealPeriod>)
    -> Result<Vec<FoodListing>>;

    /// Saved preferences, `None` when the eater never saved any.
    async fn preferences_for(&self, eater_id: &str) -> Result<Option<EaterPreferences>>;
}

#[derive(FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    meal_type: Option<String>,
    dining_hall_id: Option<String>,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    tags: String,
}

impl From<MenuItemRow> for FoodListing {
    fn from(row: MenuItemRow) -> Self {
        let meal_period = row.meal_type.as_deref().and_then(|m| m.parse().ok());
        let tags = json_strings(&row.id, "tags", &row.tags);

        FoodListing {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            meal_period,
            location: row.dining_hall_id,
            nutrition: Nutrition {
                calories: row.calories.map(|v| v as f32),
                protein: row.protein.map(|v| v as f32),
                carbs: row.carbs.map(|v| v as f32),
                fat: row.fat.map(|v| v as f32),
            },
            tags,
        }
    }
}

#[derive(FromRow)]
struct EaterPreferenceRow {
    eater_id: String,
    dietary_preferences: String,
    favored_locations: String,
    disliked_ingredients: String,
}

impl From<EaterPreferenceRow> for EaterPreferences {
    fn from(row: EaterPreferenceRow) -> Self {
        let id = &row.eater_id;

        EaterPreferences {
            required_tags: json_strings(id, "dietary_preferences", &row.dietary_preferences)
                .iter()
                .filter_map(|tag| DietaryTag::parse_lenient(tag))
                .collect(),
            favored_locations: json_strings(id, "favored_locations", &row.favored_locations)
                .into_iter()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
            disliked_ingredients: json_strings(
                id,
                "disliked_ingredients",
                &row.disliked_ingredients,
            ),
        }
    }
}

/// Decodes a JSON string array column written by ingestion. Malformed data reads as empty.
fn json_strings(id: &str, column: &str, raw: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!("Ignoring malformed {column} on {id}: {err}");
            vec![]
        }
    }
}

#[derive(Clone)]
pub struct SqliteMenuStore {
    pool: SqlitePool,
}

impl SqliteMenuStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save_listing(&self, date: Date, listing: &FoodListing) -> Result<()> {
        let statement = Query::insert()
            .into_table(MenuItem::Table)
            .columns([
                MenuItem::Id,
                MenuItem::Name,
                MenuItem::Description,
                MenuItem::Category,
                MenuItem::MealType,
                MenuItem::DiningHallId,
                MenuItem::MenuDate,
                MenuItem::Calories,
                MenuItem::Protein,
                MenuItem::Carbs,
                MenuItem::Fat,
                MenuItem::Tags,
            ])
            .values_panic([
                listing.id.to_owned().into(),
                listing.name.to_owned().into(),
                listing.description.to_owned().into(),
                listing.category.to_owned().into(),
                listing.meal_period.map(|m| m.to_string()).into(),
                listing.location.to_owned().into(),
                date.to_string().into(),
                listing.nutrition.calories.map(f64::from).into(),
                listing.nutrition.protein.map(f64::from).into(),
                listing.nutrition.carbs.map(f64::from).into(),
                listing.nutrition.fat.map(f64::from).into(),
                serde_json::to_string(&listing.tags)?.into(),
            ])
            .on_conflict(
                OnConflict::column(MenuItem::Id)
                    .update_columns([
                        MenuItem::Name,
                        MenuItem::Description,
                        MenuItem::Category,
                        MenuItem::MealType,
                        MenuItem::DiningHallId,
                        MenuItem::MenuDate,
                        MenuItem::Calories,
                        MenuItem::Protein,
                        MenuItem::Carbs,
                        MenuItem::Fat,
                        MenuItem::Tags,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    pub async fn save_preferences(&self, eater_id: &str, prefs: &EaterPreferences) -> Result<()> {
        let eater_id = eater_id.trim();
        if eater_id.is_empty() {
            bail!("eater id is required");
        }

        let required = prefs
            .required_tags
            .iter()
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>();

        let statement = Query::insert()
            .into_table(EaterPreference::Table)
            .columns([
                EaterPreference::EaterId,
                EaterPreference::DietaryPreferences,
                EaterPreference::FavoredLocations,
                EaterPreference::DislikedIngredients,
                EaterPreference::UpdatedAt,
            ])
            .values_panic([
                eater_id.to_owned().into(),
                serde_json::to_string(&required)?.into(),
                serde_json::to_string(&prefs.favored_locations)?.into(),
                serde_json::to_string(&prefs.disliked_ingredients)?.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::column(EaterPreference::EaterId)
                    .update_columns([
                        EaterPreference::DietaryPreferences,
                        EaterPreference::FavoredLocations,
                        EaterPreference::DislikedIngredients,
                        EaterPreference::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl MenuStore for SqliteMenuStore {
    async fn listings_for(
        &self,
        date: Date,
        meal: Option<MealPeriod>,
    ) -> Result<Vec<FoodListing>> {
        let mut statement = Query::select()
            .columns([
                MenuItem::Id,
                MenuItem::Name,
                MenuItem::Description,
                MenuItem::Category,
                MenuItem::MealType,
                MenuItem::DiningHallId,
                MenuItem::Calories,
                MenuItem::Protein,
                MenuItem::Carbs,
                MenuItem::Fat,
                MenuItem::Tags,
            ])
            .from(MenuItem::Table)
            .and_where(Expr::col(MenuItem::MenuDate).eq(date.to_string()))
            .order_by(MenuItem::Name, Order::Asc)
            .order_by(MenuItem::Id, Order::Asc)
            .to_owned();

        if let Some(meal) = meal {
            statement.and_where(Expr::col(MenuItem::MealType).eq(meal.to_string()));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MenuItemRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn preferences_for(&self, eater_id: &str) -> Result<Option<EaterPreferences>> {
        let eater_id = eater_id.trim();
        if eater_id.is_empty() {
            bail!("eater id is required");
        }

        let statement = Query::select()
            .columns([
                EaterPreference::EaterId,
                EaterPreference::DietaryPreferences,
                EaterPreference::FavoredLocations,
                EaterPreference::DislikedIngredients,
            ])
            .from(EaterPreference::Table)
            .and_where(Expr::col(EaterPreference::EaterId).eq(eater_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, EaterPreferenceRow, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }
}
