use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::entities::{tag, user, work_location_type};
use crate::db::enums::Capability;
use crate::db::services::user_service::{self, NewUser};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub work_title: Option<String>,
    pub company: Option<String>,
    pub capability: Capability,
}

#[derive(Deserialize)]
pub struct SetCapabilityRequest {
    pub capability: Capability,
}

#[derive(Deserialize)]
pub struct SetWorkLocationPreferencesRequest {
    #[serde(default)]
    pub work_location_type_ids: Vec<i32>,
}

async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<user::Model>), AppError> {
    let created = user_service::create_user(
        &app_state.db,
        NewUser {
            email: payload.email,
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            work_title: payload.work_title,
            company: payload.company,
            capability: payload.capability,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<user::Model>, AppError> {
    let user = user_service::get_user(&app_state.db, user_id).await?;
    Ok(Json(user))
}

/// The derived skill set shown on a profile page.
async fn get_user_skills_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<tag::Model>>, AppError> {
    let skills = user_service::get_user_skills(&app_state.db, user_id).await?;
    Ok(Json(skills))
}

async fn get_work_location_preferences_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<work_location_type::Model>>, AppError> {
    let types = user_service::get_work_location_preferences(&app_state.db, user_id).await?;
    Ok(Json(types))
}

async fn set_work_location_preferences_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetWorkLocationPreferencesRequest>,
) -> Result<Json<Vec<work_location_type::Model>>, AppError> {
    user_service::set_work_location_preferences(
        &app_state.db,
        user_id,
        &payload.work_location_type_ids,
    )
    .await?;
    let types = user_service::get_work_location_preferences(&app_state.db, user_id).await?;
    Ok(Json(types))
}

async fn set_capability_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetCapabilityRequest>,
) -> Result<Json<user::Model>, AppError> {
    let updated =
        user_service::set_capability(&app_state.db, user_id, payload.capability).await?;
    Ok(Json(updated))
}

pub fn create_users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", axum::routing::post(create_user_handler))
        .route("/{user_id}", get(get_user_handler))
        .route("/{user_id}/skills", get(get_user_skills_handler))
        .route("/{user_id}/capability", put(set_capability_handler))
        .route(
            "/{user_id}/work-location-types",
            get(get_work_location_preferences_handler).put(set_work_location_preferences_handler),
        )
}
