pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryRecipeStore;
pub use postgres::{create_pool, run_migrations, PgRecipeStore};
pub use store::RecipeStore;
