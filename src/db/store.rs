use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{DashboardData, HistoryPage, HistoryQuery, Recipe},
};

/// Persistence for generated recipes
///
/// All lookups are scoped to an owner: a recipe is only visible to the user or
/// guest it was generated for.
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// Stores freshly generated recipes
    async fn save_all(&self, recipes: &[Recipe]) -> AppResult<()>;

    /// One filtered, sorted page of an owner's recipes
    async fn history(&self, owner_id: &str, query: &HistoryQuery) -> AppResult<HistoryPage>;

    /// Sets the liked flag, returning the updated recipe if the owner has it
    async fn set_liked(&self, owner_id: &str, recipe_id: Uuid, liked: bool)
        -> AppResult<Option<Recipe>>;

    async fn get(&self, owner_id: &str, recipe_id: Uuid) -> AppResult<Option<Recipe>>;

    /// Counts, the most recent liked recipes and one random liked recipe
    async fn dashboard(&self, owner_id: &str) -> AppResult<DashboardData>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Backend name for logging and health reporting
    fn backend(&self) -> &'static str;
}
