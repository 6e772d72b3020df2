use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::entities::{project, tag};
use crate::db::services::project_service::{self, NewProject};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub github_repo_url: Option<String>,
    pub deployed_url: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub new_tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct ApplyTagsRequest {
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub new_tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub items: Vec<project::Model>,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: project::Model,
    pub tags: Vec<tag::Model>,
}

async fn create_project_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<project::Model>), AppError> {
    let created = project_service::create_project(
        &app_state.db,
        NewProject {
            user_id: payload.user_id,
            name: payload.name,
            description: payload.description,
            github_repo_url: payload.github_repo_url,
            deployed_url: payload.deployed_url,
            tag_ids: payload.tag_ids,
            new_tag_names: payload.new_tags,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_projects_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let (items, total_pages) = project_service::list_projects(&app_state.db, page).await?;
    Ok(Json(ProjectListResponse {
        items,
        page,
        total_pages,
    }))
}

async fn get_project_handler(
    State(app_state): State<Arc<AppState>>,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectDetailResponse>, AppError> {
    let (project, tags) = project_service::view_project(&app_state.db, project_id).await?;
    Ok(Json(ProjectDetailResponse { project, tags }))
}

/// Applies the submitted target tag set and returns the project's tags as
/// they stand afterwards.
async fn apply_tags_handler(
    State(app_state): State<Arc<AppState>>,
    Path(project_id): Path<i32>,
    Json(payload): Json<ApplyTagsRequest>,
) -> Result<Json<Vec<tag::Model>>, AppError> {
    project_service::apply_tags(&app_state.db, project_id, &payload.tag_ids, &payload.new_tags)
        .await?;
    let tags = project_service::get_project_tags(&app_state.db, project_id).await?;
    Ok(Json(tags))
}

async fn delete_project_handler(
    State(app_state): State<Arc<AppState>>,
    Path(project_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    project_service::delete_project(&app_state.db, project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_projects_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_projects_handler).post(create_project_handler))
        .route("/{project_id}", get(get_project_handler).delete(delete_project_handler))
        .route("/{project_id}/tags", put(apply_tags_handler))
}
