pub mod generation;
pub mod history;
pub mod recipe;

pub use generation::{CookingTime, GenerationRequest, GenerationResponse, PreferenceBundle, SpiceLevel};
pub use history::{
    DashboardData, HistoryFilter, HistoryPage, HistoryQuery, LikeRequest, LikeResponse, SortField,
    SortOrder, TOP_LIKED_LIMIT,
};
pub use recipe::{Difficulty, Ingredient, Recipe, RecipeCandidate};
