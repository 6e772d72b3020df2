//! Database services: all persistence logic lives here so handlers work
//! with domain operations instead of queries. One module per domain area.

pub mod job_post_service;
pub mod project_service;
pub mod search_service;
pub mod skill_service;
pub mod tag_service;
pub mod user_service;
pub mod work_location_service;

/// Fixed page size shared by listings and search.
pub const PAGE_SIZE: u64 = 9;

/// URL slug from a display name: lowercase alphanumerics joined by single
/// hyphens.
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
