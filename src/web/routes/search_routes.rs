use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::services::search_service::{
    self, SearchQuery, SearchResults, SearchTarget, TagMatchMode,
};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct SearchParams {
    /// Free-text query; empty or missing matches everything.
    pub q: Option<String>,
    /// Entity type selector; unrecognized values fall back to users.
    pub t: Option<String>,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    /// "all" or "any"; anything else means any.
    pub mode: Option<String>,
    pub page: Option<u64>,
}

async fn search_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let tag_names: Vec<String> = params
        .tags
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let results = search_service::search(
        &app_state.db,
        SearchQuery {
            q: params.q.unwrap_or_default(),
            target: SearchTarget::from_param(params.t.as_deref().unwrap_or("")),
            tag_names,
            mode: TagMatchMode::from_param(params.mode.as_deref().unwrap_or("")),
            page: params.page.unwrap_or(1),
        },
    )
    .await?;

    Ok(Json(results))
}

pub fn create_search_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(search_handler))
}
