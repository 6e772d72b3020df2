use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;

pub mod error;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(db: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { db, config: config.clone() });

    let cors = match config
        .frontend_url
        .as_deref()
        .and_then(|url| url.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any),
    };

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest("/api/users", routes::user_routes::create_users_router())
        .nest("/api/tags", routes::tag_routes::create_tags_router())
        .nest("/api/projects", routes::project_routes::create_projects_router())
        .nest("/api/job-posts", routes::job_post_routes::create_job_posts_router())
        .nest("/api/search", routes::search_routes::create_search_router())
        .nest(
            "/api/work-location-types",
            routes::work_location_routes::create_work_locations_router(),
        )
        .layer(cors)
        .with_state(app_state)
}
