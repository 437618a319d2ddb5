use std::collections::HashMap;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::RecipeStore,
    error::AppResult,
    models::{DashboardData, HistoryPage, HistoryQuery, Recipe, TOP_LIKED_LIMIT},
};

/// Process-local recipe store used when no database is configured
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<HashMap<Uuid, Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn owned_by(&self, owner_id: &str) -> Vec<Recipe> {
        let recipes = self.recipes.read().await;
        recipes
            .values()
            .filter(|recipe| recipe.user_id == owner_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn save_all(&self, recipes: &[Recipe]) -> AppResult<()> {
        let mut stored = self.recipes.write().await;
        for recipe in recipes {
            stored.insert(recipe.id, recipe.clone());
        }
        Ok(())
    }

    async fn history(&self, owner_id: &str, query: &HistoryQuery) -> AppResult<HistoryPage> {
        let filter = query.filter();
        let mut recipes: Vec<Recipe> = self
            .owned_by(owner_id)
            .await
            .into_iter()
            .filter(|recipe| filter.matches(recipe))
            .collect();

        let total = recipes.len() as u64;
        query.sort(&mut recipes);

        let page = recipes
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();

        Ok(HistoryPage::new(page, total, query))
    }

    async fn set_liked(
        &self,
        owner_id: &str,
        recipe_id: Uuid,
        liked: bool,
    ) -> AppResult<Option<Recipe>> {
        let mut recipes = self.recipes.write().await;
        Ok(recipes
            .get_mut(&recipe_id)
            .filter(|recipe| recipe.user_id == owner_id)
            .map(|recipe| {
                recipe.liked = liked;
                recipe.clone()
            }))
    }

    async fn get(&self, owner_id: &str, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes
            .get(&recipe_id)
            .filter(|recipe| recipe.user_id == owner_id)
            .cloned())
    }

    async fn dashboard(&self, owner_id: &str) -> AppResult<DashboardData> {
        let owned = self.owned_by(owner_id).await;
        let total_recipes = owned.len() as u64;

        let mut liked: Vec<Recipe> = owned.into_iter().filter(|recipe| recipe.liked).collect();
        liked.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let trending_recipe = liked.choose(&mut rand::thread_rng()).cloned();
        let total_liked = liked.len() as u64;
        liked.truncate(TOP_LIKED_LIMIT);

        Ok(DashboardData {
            trending_recipe,
            top_liked_recipes: liked,
            total_recipes,
            total_liked,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Ingredient};
    use chrono::{Duration, Utc};

    fn recipe(owner: &str, title: &str, liked: bool, age_minutes: i64) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            user_id: owner.to_string(),
            title: title.to_string(),
            description: String::new(),
            ingredients: vec![Ingredient::new("egg", "1", None)],
            instructions: vec!["Cook".to_string()],
            prep_time: 1,
            cook_time: 2,
            servings: 1,
            difficulty: Difficulty::Easy,
            cuisine_type: None,
            liked,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_get_is_scoped_to_owner() {
        let store = MemoryRecipeStore::new();
        let mine = recipe("alice", "Mine", false, 0);
        store.save_all(&[mine.clone()]).await.unwrap();

        assert_eq!(store.get("alice", mine.id).await.unwrap(), Some(mine.clone()));
        assert_eq!(store.get("bob", mine.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_liked_updates_only_owned_recipe() {
        let store = MemoryRecipeStore::new();
        let mine = recipe("alice", "Mine", false, 0);
        store.save_all(&[mine.clone()]).await.unwrap();

        assert!(store.set_liked("bob", mine.id, true).await.unwrap().is_none());

        let updated = store.set_liked("alice", mine.id, true).await.unwrap().unwrap();
        assert!(updated.liked);
        assert!(store.get("alice", mine.id).await.unwrap().unwrap().liked);

        let unliked = store.set_liked("alice", mine.id, false).await.unwrap().unwrap();
        assert!(!unliked.liked);
    }

    #[tokio::test]
    async fn test_set_liked_unknown_recipe() {
        let store = MemoryRecipeStore::new();
        assert!(store
            .set_liked("alice", Uuid::new_v4(), true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_history_filters_sorts_and_paginates() {
        let store = MemoryRecipeStore::new();
        store
            .save_all(&[
                recipe("alice", "Apple Pie", true, 30),
                recipe("alice", "Banana Bread", false, 20),
                recipe("alice", "Carrot Cake", true, 10),
                recipe("bob", "Durian Tart", true, 0),
            ])
            .await
            .unwrap();

        let query = HistoryQuery {
            filter: Some("liked".to_string()),
            sort_by: Some("title".to_string()),
            sort_order: Some("asc".to_string()),
            page: Some(1),
            limit: Some(1),
        };
        let page = store.history("alice", &query).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.has_more);
        assert_eq!(page.recipes.len(), 1);
        assert_eq!(page.recipes[0].title, "Apple Pie");

        let second = store
            .history(
                "alice",
                &HistoryQuery {
                    page: Some(2),
                    ..query
                },
            )
            .await
            .unwrap();
        assert_eq!(second.recipes[0].title, "Carrot Cake");
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_history_defaults_to_newest_first() {
        let store = MemoryRecipeStore::new();
        store
            .save_all(&[
                recipe("alice", "Old", false, 60),
                recipe("alice", "New", false, 0),
            ])
            .await
            .unwrap();

        let page = store
            .history("alice", &HistoryQuery::default())
            .await
            .unwrap();
        assert_eq!(page.recipes[0].title, "New");
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_top_liked() {
        let store = MemoryRecipeStore::new();
        let mut recipes: Vec<Recipe> = (0..7)
            .map(|i| recipe("alice", &format!("Liked {}", i), true, i))
            .collect();
        recipes.push(recipe("alice", "Meh", false, 100));
        recipes.push(recipe("bob", "Other", true, 0));
        store.save_all(&recipes).await.unwrap();

        let dashboard = store.dashboard("alice").await.unwrap();
        assert_eq!(dashboard.total_recipes, 8);
        assert_eq!(dashboard.total_liked, 7);
        assert_eq!(dashboard.top_liked_recipes.len(), TOP_LIKED_LIMIT);
        assert_eq!(dashboard.top_liked_recipes[0].title, "Liked 0");
        let trending = dashboard.trending_recipe.unwrap();
        assert!(trending.liked);
        assert_eq!(trending.user_id, "alice");
    }

    #[tokio::test]
    async fn test_dashboard_without_likes() {
        let store = MemoryRecipeStore::new();
        store
            .save_all(&[recipe("alice", "Meh", false, 0)])
            .await
            .unwrap();

        let dashboard = store.dashboard("alice").await.unwrap();
        assert!(dashboard.trending_recipe.is_none());
        assert!(dashboard.top_liked_recipes.is_empty());
        assert_eq!(dashboard.total_recipes, 1);
    }
}
