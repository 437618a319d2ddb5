use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{error::AppResult, middleware::Owner, models::DashboardData, routes::AppState};

/// Handler for dashboard endpoint
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> AppResult<Json<DashboardData>> {
    let data = state.store.dashboard(owner.as_str()).await?;

    tracing::debug!(
        owner = %owner,
        total_recipes = data.total_recipes,
        total_liked = data.total_liked,
        "Dashboard loaded"
    );

    Ok(Json(data))
}
