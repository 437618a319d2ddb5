use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub database: &'static str,
    pub generator: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub version: &'static str,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub database: bool,
    pub generator: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

async fn database_reachable(state: &AppState) -> bool {
    match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "Database check failed");
            false
        }
    }
}

/// Health check endpoint
///
/// Degraded (503) when the database is unreachable or no generation backend
/// is configured. Recipes are still served from the fallback in that case.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = if !database_reachable(&state).await {
        "error"
    } else if state.store.backend() == "in_memory" {
        "in_memory"
    } else {
        "connected"
    };
    let generator = if state.generator_configured() {
        "configured"
    } else {
        "not_configured"
    };

    let healthy = database != "error" && generator == "configured";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        timestamp: Utc::now(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceStatus {
            database,
            generator,
        },
    };

    (status, Json(body))
}

/// Readiness endpoint
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let checks = ReadinessChecks {
        database: database_reachable(&state).await,
        generator: state.generator_configured(),
    };
    let ready = checks.database && checks.generator;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, checks }))
}

/// Liveness ping
pub async fn ping() -> Json<Value> {
    Json(json!({
        "message": "FridgeChef API is running!",
        "timestamp": Utc::now(),
    }))
}
