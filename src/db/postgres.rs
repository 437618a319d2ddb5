use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::{
    db::RecipeStore,
    error::AppResult,
    models::{
        DashboardData, Difficulty, HistoryFilter, HistoryPage, HistoryQuery, Ingredient, Recipe,
        TOP_LIKED_LIMIT,
    },
};

const RECIPE_COLUMNS: &str = "id, user_id, title, description, ingredients, instructions, \
     prep_time, cook_time, servings, difficulty, cuisine_type, liked, created_at";

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Row shape of the `recipes` table
#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    user_id: String,
    title: String,
    description: String,
    ingredients: Json<Vec<Ingredient>>,
    instructions: Json<Vec<String>>,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    difficulty: String,
    cuisine_type: Option<String>,
    liked: bool,
    created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            ingredients: row.ingredients.0,
            instructions: row.instructions.0,
            prep_time: u32::try_from(row.prep_time).unwrap_or(0),
            cook_time: u32::try_from(row.cook_time).unwrap_or(0),
            servings: u32::try_from(row.servings).unwrap_or(1).max(1),
            difficulty: Difficulty::parse(&row.difficulty).unwrap_or_default(),
            cuisine_type: row.cuisine_type,
            liked: row.liked,
            created_at: row.created_at,
        }
    }
}

fn to_db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn liked_condition(filter: HistoryFilter) -> &'static str {
    match filter {
        HistoryFilter::All => "",
        HistoryFilter::Liked => " AND liked = true",
        HistoryFilter::Disliked => " AND liked = false",
    }
}

/// Recipe store backed by PostgreSQL
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn liked_recipes(&self, owner_id: &str, order: &str, limit: i64) -> AppResult<Vec<Recipe>> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE user_id = $1 AND liked = true ORDER BY {} LIMIT $2",
            RECIPE_COLUMNS, order
        );
        let rows: Vec<RecipeRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }
}

#[async_trait::async_trait]
impl RecipeStore for PgRecipeStore {
    async fn save_all(&self, recipes: &[Recipe]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for recipe in recipes {
            sqlx::query(
                r#"
                INSERT INTO recipes (
                    id, user_id, title, description, ingredients, instructions,
                    prep_time, cook_time, servings, difficulty, cuisine_type, liked, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(recipe.id)
            .bind(&recipe.user_id)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(Json(&recipe.ingredients))
            .bind(Json(&recipe.instructions))
            .bind(to_db_int(recipe.prep_time))
            .bind(to_db_int(recipe.cook_time))
            .bind(to_db_int(recipe.servings))
            .bind(recipe.difficulty.as_str())
            .bind(&recipe.cuisine_type)
            .bind(recipe.liked)
            .bind(recipe.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(count = recipes.len(), "Recipes saved");

        Ok(())
    }

    async fn history(&self, owner_id: &str, query: &HistoryQuery) -> AppResult<HistoryPage> {
        let condition = liked_condition(query.filter());

        // Column and direction come from closed enums, never from user input.
        let sql = format!(
            "SELECT {} FROM recipes WHERE user_id = $1{} ORDER BY {} {} LIMIT $2 OFFSET $3",
            RECIPE_COLUMNS,
            condition,
            query.sort_field().column(),
            query.sort_order().keyword()
        );
        let rows: Vec<RecipeRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .bind(i64::from(query.limit()))
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM recipes WHERE user_id = $1{}",
            condition
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        let recipes = rows.into_iter().map(Recipe::from).collect();
        Ok(HistoryPage::new(recipes, total.max(0) as u64, query))
    }

    async fn set_liked(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        liked: bool,
    ) -> AppResult<Option<Recipe>> {
        let sql = format!(
            "UPDATE recipes SET liked = $1 WHERE id = $2 AND user_id = $3 RETURNING {}",
            RECIPE_COLUMNS
        );
        let row: Option<RecipeRow> = sqlx::query_as(&sql)
            .bind(liked)
            .bind(recipe_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Recipe::from))
    }

    async fn get(&self, owner_id: &str, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE id = $1 AND user_id = $2",
            RECIPE_COLUMNS
        );
        let row: Option<RecipeRow> = sqlx::query_as(&sql)
            .bind(recipe_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Recipe::from))
    }

    async fn dashboard(&self, owner_id: &str) -> AppResult<DashboardData> {
        let trending_recipe = self
            .liked_recipes(owner_id, "RANDOM()", 1)
            .await?
            .into_iter()
            .next();
        let top_liked_recipes = self
            .liked_recipes(owner_id, "created_at DESC", TOP_LIKED_LIMIT as i64)
            .await?;

        let (total_recipes, total_liked): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE liked) FROM recipes WHERE user_id = $1",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardData {
            trending_recipe,
            top_liked_recipes,
            total_recipes: total_recipes.max(0) as u64,
            total_liked: total_liked.max(0) as u64,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
