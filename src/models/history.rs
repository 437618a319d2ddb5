use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::Recipe;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOP_LIKED_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Liked,
    Disliked,
}

impl HistoryFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Liked => recipe.liked,
            HistoryFilter::Disliked => !recipe.liked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    CookTime,
}

impl SortField {
    /// Column name, only ever one of a fixed set
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Title => "title",
            SortField::CookTime => "cook_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query string of `GET /api/recipes/history`
///
/// Unknown filter, sort field or order values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub filter: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn filter(&self) -> HistoryFilter {
        match self.filter.as_deref() {
            Some("liked") => HistoryFilter::Liked,
            Some("disliked") => HistoryFilter::Disliked,
            _ => HistoryFilter::All,
        }
    }

    pub fn sort_field(&self) -> SortField {
        match self.sort_by.as_deref() {
            Some("title") => SortField::Title,
            Some("cook_time") => SortField::CookTime,
            _ => SortField::CreatedAt,
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        match self.sort_order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }

    /// Orders recipes in place according to the requested field and direction
    pub fn sort(&self, recipes: &mut [Recipe]) {
        let field = self.sort_field();
        let compare = |a: &Recipe, b: &Recipe| -> Ordering {
            match field {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Title => a.title.cmp(&b.title),
                SortField::CookTime => a.cook_time.cmp(&b.cook_time),
            }
        };

        match self.sort_order() {
            SortOrder::Asc => recipes.sort_by(compare),
            SortOrder::Desc => recipes.sort_by(|a, b| compare(b, a)),
        }
    }
}

/// One page of a user's recipe history
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryPage {
    pub recipes: Vec<Recipe>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl HistoryPage {
    pub fn new(recipes: Vec<Recipe>, total: u64, query: &HistoryQuery) -> Self {
        let limit = query.limit();
        Self {
            recipes,
            total,
            page: query.page(),
            limit,
            has_more: query.offset() + u64::from(limit) < total,
        }
    }
}

/// Body of `POST /api/recipes/like`
#[derive(Debug, Deserialize, Serialize)]
pub struct LikeRequest {
    pub recipe_id: Uuid,
    pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub success: bool,
    pub recipe: Recipe,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DashboardData {
    pub trending_recipe: Option<Recipe>,
    pub top_liked_recipes: Vec<Recipe>,
    pub total_recipes: u64,
    pub total_liked: u64,
}
