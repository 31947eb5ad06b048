//! HTTP surface: health, usage, recommend and catalog reload.

use crate::catalog::{Catalog, CatalogHandle, ColumnMap};
use crate::format::RecommendationResult;
use crate::Recommender;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct AppState {
    pub catalog: CatalogHandle,
    pub recommender: Recommender,
    pub catalog_path: PathBuf,
    pub columns: ColumnMap,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommended_assessments: Vec<RecommendationResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/recommend", post(handle_recommend))
        .route("/reload", post(handle_reload))
        .with_state(state)
}

pub async fn serve(state: SharedState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn handle_root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the SHL Assessment Recommender API!",
        "usage": "Use the /recommend endpoint with a POST request.",
        "example": {
            "endpoint": "/recommend",
            "method": "POST",
            "body": { "query": "Cognitive" }
        }
    }))
}

pub async fn handle_health(State(state): State<SharedState>) -> Json<Value> {
    let catalog = state.catalog.snapshot();
    Json(json!({
        "status": "healthy",
        "catalog_items": catalog.len(),
        "catalog_loaded_at": catalog.loaded_at().to_rfc3339(),
    }))
}

pub async fn handle_recommend(
    State(state): State<SharedState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ErrorResponse>)> {
    let catalog = state.catalog.snapshot();
    match state.recommender.recommend(&catalog, &request.query) {
        Ok(results) => Ok(Json(RecommendResponse {
            recommended_assessments: results,
        })),
        Err(e) => {
            error!(error = %e, "Catalog cannot be matched");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// Re-read the catalog file. On failure the current snapshot stays in place.
pub async fn handle_reload(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let path = state.catalog_path.clone();
    let columns = state.columns.clone();
    let loaded = tokio::task::spawn_blocking(move || Catalog::load(&path, &columns)).await;

    match loaded {
        Ok(Ok(catalog)) => {
            let items = catalog.len();
            let changed = state.catalog.replace(catalog);
            (
                StatusCode::OK,
                Json(json!({ "status": "reloaded", "catalog_items": items, "changed": changed })),
            )
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Catalog reload failed; keeping current snapshot");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
        Err(e) => {
            error!(error = %e, "Catalog reload task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "reload task failed" })),
            )
        }
    }
}
