use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{GenerationRequest, Recipe, RecipeCandidate},
    services::{
        fallback,
        normalizer::{self, SchemaError},
        prompt,
        providers::{GenerativeProvider, UpstreamError},
    },
};

/// Where a batch of recipes came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSource {
    Model,
    Fallback,
}

impl RecipeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSource::Model => "model",
            RecipeSource::Fallback => "fallback",
        }
    }
}

/// Recipes produced by one generation call
#[derive(Debug)]
pub struct Generation {
    pub recipes: Vec<Recipe>,
    pub source: RecipeSource,
}

/// Why the model path was abandoned
#[derive(Debug, thiserror::Error)]
enum FallbackReason {
    #[error("generation backend unavailable")]
    Unavailable,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Runs the recipe generation pipeline
///
/// Sequence:
/// 1. Reject requests without ingredients
/// 2. Probe the backend; fall back when it is unavailable
/// 3. Build the prompt and request a completion
///
/// The timeout bounds steps 2 and 3 together: the completion only gets what is
/// left after the probe.
/// 4. Normalize the completion into candidates
/// 5. Stamp candidates with id, owner and creation time
///
/// Any failure in steps 2-4 degrades to the fallback generator, so callers
/// always get at least one recipe for a non-empty ingredient list. There are no
/// retries.
#[derive(Clone)]
pub struct RecipeGenerator {
    provider: Arc<dyn GenerativeProvider>,
    timeout: Duration,
}

impl RecipeGenerator {
    pub fn new(provider: Arc<dyn GenerativeProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider(&self) -> &Arc<dyn GenerativeProvider> {
        &self.provider
    }

    /// Generates recipes for `owner_id`
    pub async fn run(&self, request: &GenerationRequest, owner_id: &str) -> AppResult<Vec<Recipe>> {
        Ok(self.generate(request, owner_id).await?.recipes)
    }

    /// Same as [`run`](Self::run) but also reports which path produced the recipes
    #[instrument(
        skip(self, request),
        fields(
            ingredient_count = request.ingredients.len(),
            provider = self.provider.name(),
        )
    )]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        owner_id: &str,
    ) -> AppResult<Generation> {
        if request.cleaned_ingredients().is_empty() {
            return Err(AppError::Validation(
                "Please provide at least one ingredient".to_string(),
            ));
        }

        let (candidates, source) = match self.model_candidates(request).await {
            Ok(candidates) => (candidates, RecipeSource::Model),
            Err(reason) => {
                tracing::warn!(reason = %reason, "Falling back to generated placeholder recipes");
                (fallback::generate(request), RecipeSource::Fallback)
            }
        };

        let recipes: Vec<Recipe> = candidates
            .into_iter()
            .map(|candidate| Recipe::from_candidate(candidate, owner_id))
            .collect();

        tracing::info!(
            recipes = recipes.len(),
            source = source.as_str(),
            "Recipe generation completed"
        );

        Ok(Generation { recipes, source })
    }

    async fn model_candidates(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RecipeCandidate>, FallbackReason> {
        let deadline = tokio::time::Instant::now() + self.timeout;

        let available = tokio::time::timeout_at(deadline, self.provider.is_available())
            .await
            .unwrap_or(false);
        if !available {
            return Err(FallbackReason::Unavailable);
        }

        let prompt = prompt::build(request);
        let raw = tokio::time::timeout_at(deadline, self.provider.complete(&prompt))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))??;

        let candidates = normalizer::normalize(&raw).map_err(|e| {
            tracing::debug!(
                preview = %raw.chars().take(200).collect::<String>(),
                "Unusable completion"
            );
            e
        })?;

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::services::prompt::RecipePrompt;
    use crate::services::providers::MockGenerativeProvider;

    const MODEL_OUTPUT: &str = r#"```json
[
  {
    "title": "Tomato Basil Pasta",
    "description": "Classic and fresh",
    "ingredients": [
      {"name": "pasta", "amount": "200", "unit": "g"},
      {"name": "tomato", "amount": "3", "unit": null}
    ],
    "instructions": ["Boil pasta", "Make sauce", "Combine"],
    "prep_time": 10,
    "cook_time": 15,
    "servings": 2,
    "difficulty": "medium",
    "cuisine_type": "italian"
  },
  {
    "title": "Bruschetta",
    "description": "Toasted bread with tomato",
    "ingredients": [{"name": "tomato", "amount": "2", "unit": null}],
    "instructions": ["Toast", "Top"],
    "prep_time": 5,
    "cook_time": 5,
    "servings": 4,
    "difficulty": "easy",
    "cuisine_type": "italian"
  }
]
```"#;

    fn mock(available: bool) -> MockGenerativeProvider {
        let mut provider = MockGenerativeProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_is_available().returning(move || available);
        provider
    }

    fn generator(provider: MockGenerativeProvider) -> RecipeGenerator {
        RecipeGenerator::new(Arc::new(provider), Duration::from_secs(5))
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(["tomato", "basil", "pasta"])
    }

    fn assert_invariants(recipes: &[Recipe]) {
        assert!(!recipes.is_empty());
        for recipe in recipes {
            assert!(!recipe.title.is_empty());
            assert!(!recipe.instructions.is_empty());
            assert!(!recipe.ingredients.is_empty());
            assert!(recipe.servings >= 1);
            assert!(!recipe.liked);
        }
    }

    #[tokio::test]
    async fn test_empty_ingredients_rejected_without_upstream_call() {
        let mut provider = MockGenerativeProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_is_available().times(0);
        provider.expect_complete().times(0);

        let result = generator(provider)
            .run(&GenerationRequest::new(Vec::<String>::new()), "user-1")
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_ingredients_rejected() {
        let mut provider = mock(true);
        provider.expect_complete().times(0);

        let result = generator(provider)
            .run(&GenerationRequest::new(["  ", ""]), "user-1")
            .await;
        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn test_unavailable_backend_never_completes() {
        let mut provider = mock(false);
        provider.expect_complete().times(0);

        let generation = generator(provider)
            .generate(&request(), "guest-1")
            .await
            .unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert_eq!(generation.recipes.len(), 2);
        assert_invariants(&generation.recipes);
    }

    #[tokio::test]
    async fn test_model_output_becomes_recipes() {
        let mut provider = mock(true);
        provider
            .expect_complete()
            .withf(|prompt: &RecipePrompt| prompt.user.contains("tomato, basil, pasta"))
            .times(1)
            .returning(|_| Ok(MODEL_OUTPUT.to_string()));

        let generation = generator(provider)
            .generate(&request(), "user-42")
            .await
            .unwrap();

        assert_eq!(generation.source, RecipeSource::Model);
        let recipes = generation.recipes;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Tomato Basil Pasta");
        assert_eq!(recipes[1].title, "Bruschetta");
        assert_eq!(recipes[0].difficulty, Difficulty::Medium);
        assert!(recipes.iter().all(|r| r.user_id == "user-42"));
        assert_ne!(recipes[0].id, recipes[1].id);
        assert_invariants(&recipes);
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back() {
        let mut provider = mock(true);
        provider.expect_complete().times(1).returning(|_| {
            Err(UpstreamError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        });

        let generation = generator(provider)
            .generate(&GenerationRequest::new(["egg"]), "user-1")
            .await
            .unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert_eq!(generation.recipes.len(), 1);
        assert_eq!(generation.recipes[0].title, "Quick egg Stir-Fry");
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let mut provider = mock(true);
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Ok("Sure! Here are some recipes you might enjoy.".to_string()));

        let generation = generator(provider)
            .generate(&GenerationRequest::new(["chicken", "rice"]), "user-1")
            .await
            .unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert_eq!(generation.recipes.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_batch_falls_back_entirely() {
        let mut provider = mock(true);
        provider.expect_complete().returning(|_| {
            Ok(r#"[
                {"title": "Good", "ingredients": ["egg"], "instructions": ["Cook"]},
                {"title": "Bad", "ingredients": ["egg"], "instructions": []}
            ]"#
            .to_string())
        });

        let generation = generator(provider)
            .generate(&GenerationRequest::new(["egg"]), "user-1")
            .await
            .unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert!(generation.recipes.iter().all(|r| r.title != "Good"));
    }

    struct SlowProvider;

    #[async_trait::async_trait]
    impl GenerativeProvider for SlowProvider {
        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, _prompt: &RecipePrompt) -> Result<String, UpstreamError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(MODEL_OUTPUT.to_string())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let generator = RecipeGenerator::new(Arc::new(SlowProvider), Duration::from_millis(50));

        let generation = generator.generate(&request(), "user-1").await.unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert_invariants(&generation.recipes);
    }

    /// Each call fits the timeout on its own but not both together
    struct SluggishProvider;

    #[async_trait::async_trait]
    impl GenerativeProvider for SluggishProvider {
        async fn is_available(&self) -> bool {
            tokio::time::sleep(Duration::from_millis(150)).await;
            true
        }

        async fn complete(&self, _prompt: &RecipePrompt) -> Result<String, UpstreamError> {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(MODEL_OUTPUT.to_string())
        }

        fn name(&self) -> &'static str {
            "sluggish"
        }
    }

    #[tokio::test]
    async fn test_timeout_covers_availability_check_and_completion() {
        let generator = RecipeGenerator::new(Arc::new(SluggishProvider), Duration::from_millis(250));

        let generation = generator.generate(&request(), "user-1").await.unwrap();

        assert_eq!(generation.source, RecipeSource::Fallback);
        assert_invariants(&generation.recipes);
    }
}
