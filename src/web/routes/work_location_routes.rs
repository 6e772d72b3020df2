use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::entities::work_location_type;
use crate::db::services::work_location_service;
use crate::web::{AppError, AppState};

/// The work location lookup values, for selection controls.
async fn list_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<work_location_type::Model>>, AppError> {
    let types = work_location_service::list(&app_state.db).await?;
    Ok(Json(types))
}

pub fn create_work_locations_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_handler))
}
