use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::entities::{job_post, tag, work_location_type};
use crate::db::services::job_post_service::{self, NewJobPost};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateJobPostRequest {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub new_tags: Vec<String>,
    #[serde(default)]
    pub work_location_type_ids: Vec<i32>,
}

#[derive(Deserialize)]
pub struct ApplyWorkLocationTypesRequest {
    #[serde(default)]
    pub work_location_type_ids: Vec<i32>,
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
pub struct JobPostListResponse {
    pub items: Vec<job_post::Model>,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Serialize)]
pub struct JobPostDetailResponse {
    #[serde(flatten)]
    pub job_post: job_post::Model,
    pub tags: Vec<tag::Model>,
    pub work_location_types: Vec<work_location_type::Model>,
}

async fn create_job_post_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateJobPostRequest>,
) -> Result<(StatusCode, Json<job_post::Model>), AppError> {
    let created = job_post_service::create_job_post(
        &app_state.db,
        NewJobPost {
            user_id: payload.user_id,
            name: payload.name,
            description: payload.description,
            company: payload.company,
            location: payload.location,
            salary_from: payload.salary_from,
            salary_to: payload.salary_to,
            salary_currency: payload.salary_currency,
            tag_ids: payload.tag_ids,
            new_tag_names: payload.new_tags,
            work_location_type_ids: payload.work_location_type_ids,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_job_posts_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<JobPostListResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let (items, total_pages) = job_post_service::list_job_posts(&app_state.db, page).await?;
    Ok(Json(JobPostListResponse {
        items,
        page,
        total_pages,
    }))
}

async fn get_job_post_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_post_id): Path<i32>,
) -> Result<Json<JobPostDetailResponse>, AppError> {
    let (job_post, tags, work_location_types) =
        job_post_service::view_job_post(&app_state.db, job_post_id).await?;
    Ok(Json(JobPostDetailResponse {
        job_post,
        tags,
        work_location_types,
    }))
}

async fn apply_work_location_types_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_post_id): Path<i32>,
    Json(payload): Json<ApplyWorkLocationTypesRequest>,
) -> Result<Json<Vec<work_location_type::Model>>, AppError> {
    job_post_service::apply_work_location_types(
        &app_state.db,
        job_post_id,
        &payload.work_location_type_ids,
    )
    .await?;
    let types =
        job_post_service::get_job_post_work_location_types(&app_state.db, job_post_id).await?;
    Ok(Json(types))
}

async fn apply_tags_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_post_id): Path<i32>,
    Json(payload): Json<ApplyTagsRequest>,
) -> Result<Json<Vec<tag::Model>>, AppError> {
    job_post_service::apply_tags(&app_state.db, job_post_id, &payload.tag_ids, &payload.new_tags)
        .await?;
    let tags = job_post_service::get_job_post_tags(&app_state.db, job_post_id).await?;
    Ok(Json(tags))
}

async fn delete_job_post_handler(
    State(app_state): State<Arc<AppState>>,
    Path(job_post_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    job_post_service::delete_job_post(&app_state.db, job_post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_job_posts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_job_posts_handler).post(create_job_post_handler))
        .route("/{job_post_id}", get(get_job_post_handler).delete(delete_job_post_handler))
        .route("/{job_post_id}/tags", put(apply_tags_handler))
        .route(
            "/{job_post_id}/work-location-types",
            put(apply_work_location_types_handler),
        )
}
