use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    db::{MemoryRecipeStore, RecipeStore},
    services::{providers::GenerativeProvider, RecipeGenerator},
};

/// Shared application state
pub struct AppState {
    pub generator: RecipeGenerator,
    pub store: Arc<dyn RecipeStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(generator: RecipeGenerator, store: Arc<dyn RecipeStore>) -> Self {
        Self {
            generator,
            store,
            started_at: Instant::now(),
        }
    }

    /// State backed by an in-memory store, used when no database is configured
    pub fn in_memory(provider: Arc<dyn GenerativeProvider>, timeout: Duration) -> Self {
        Self::new(
            RecipeGenerator::new(provider, timeout),
            Arc::new(MemoryRecipeStore::new()),
        )
    }

    pub fn generator_configured(&self) -> bool {
        self.generator.provider().name() != "disabled"
    }
}
