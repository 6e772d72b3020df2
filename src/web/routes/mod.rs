pub mod job_post_routes;
pub mod project_routes;
pub mod search_routes;
pub mod tag_routes;
pub mod user_routes;
pub mod work_location_routes;
