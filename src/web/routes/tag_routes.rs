use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::tag;
use crate::db::services::tag_service::{self, TagWithCounts};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct SetApprovalRequest {
    approved: bool,
}

#[derive(Deserialize)]
pub struct RenameTagRequest {
    name: String,
}

/// Approved tags in name order, as shown in facet pickers.
async fn list_approved_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<tag::Model>>, AppError> {
    let tags = tag_service::list_approved(&app_state.db).await?;
    Ok(Json(tags))
}

/// Every tag with reference counts, for the moderation screen.
async fn list_all_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagWithCounts>>, AppError> {
    let tags = tag_service::list_all_with_counts(&app_state.db).await?;
    Ok(Json(tags))
}

async fn set_approval_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
    Json(payload): Json<SetApprovalRequest>,
) -> Result<Json<tag::Model>, AppError> {
    let updated = tag_service::set_approval(&app_state.db, tag_id, payload.approved).await?;
    Ok(Json(updated))
}

async fn rename_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
    Json(payload): Json<RenameTagRequest>,
) -> Result<Json<tag::Model>, AppError> {
    let updated = tag_service::rename(&app_state.db, tag_id, &payload.name).await?;
    Ok(Json(updated))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_approved_handler))
        .route("/all", get(list_all_handler))
        .route("/{tag_id}/approval", put(set_approval_handler))
        .route("/{tag_id}/name", put(rename_handler))
}
