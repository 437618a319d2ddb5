pub mod fallback;
pub mod generation;
pub mod normalizer;
pub mod prompt;
pub mod providers;

pub use generation::{Generation, RecipeGenerator, RecipeSource};
