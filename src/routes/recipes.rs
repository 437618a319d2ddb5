use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{Owner, RequestId},
    models::{
        GenerationRequest, GenerationResponse, HistoryPage, HistoryQuery, LikeRequest,
        LikeResponse, Recipe,
    },
    routes::AppState,
};

/// Handler for recipe generation endpoint
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    owner: Owner,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<Json<GenerationResponse>> {
    let Json(request) = payload?;

    tracing::info!(
        request_id = %request_id,
        owner = %owner,
        guest = owner.is_guest(),
        ingredient_count = request.ingredients.len(),
        allow_additional = request.allow_additional_ingredients,
        "Processing recipe generation request"
    );

    let generation = state.generator.generate(&request, owner.as_str()).await?;

    // Persistence is best effort; the caller still gets the recipes.
    if let Err(e) = state.store.save_all(&generation.recipes).await {
        tracing::warn!(
            request_id = %request_id,
            error = %e,
            backend = state.store.backend(),
            "Failed to save generated recipes"
        );
    }

    tracing::info!(
        request_id = %request_id,
        recipes = generation.recipes.len(),
        source = generation.source.as_str(),
        "Recipe generation request completed"
    );

    Ok(Json(GenerationResponse {
        recipes: generation.recipes,
        success: true,
        message: None,
    }))
}

/// Handler for recipe history endpoint
pub async fn history(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<HistoryPage>> {
    let Query(query) = query?;
    let page = state.store.history(owner.as_str(), &query).await?;
    Ok(Json(page))
}

/// Handler for like/unlike endpoint
pub async fn like(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> AppResult<Json<LikeResponse>> {
    let Json(request) = payload?;
    let recipe = state
        .store
        .set_liked(owner.as_str(), request.recipe_id, request.liked)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

    tracing::info!(recipe_id = %recipe.id, liked = recipe.liked, "Recipe like status updated");

    Ok(Json(LikeResponse {
        success: true,
        recipe,
    }))
}

/// Handler for single recipe lookup
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    recipe_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Recipe>> {
    let Path(recipe_id) = recipe_id?;
    state
        .store
        .get(owner.as_str(), recipe_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
}
