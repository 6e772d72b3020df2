#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use stackfolio::db::entities::{project, tag, user};
use stackfolio::db::enums::Capability;
use stackfolio::db::schema;
use stackfolio::db::services::project_service::{self, NewProject};
use stackfolio::db::services::tag_service;
use stackfolio::db::services::user_service::{self, NewUser};
use stackfolio::db::services::work_location_service;

/// In-memory SQLite with the full schema. A single pooled connection so
/// every query in a test sees the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1);
    let db = Database::connect(opt)
        .await
        .expect("connect to in-memory sqlite");
    schema::create_all_tables(&db).await.expect("create schema");
    work_location_service::seed_defaults(&db)
        .await
        .expect("seed work location types");
    db
}

pub async fn create_user_with(
    db: &DatabaseConnection,
    username: &str,
    capability: Capability,
) -> user::Model {
    user_service::create_user(
        db,
        NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            bio: None,
            work_title: None,
            company: None,
            capability,
        },
    )
    .await
    .expect("create user")
}

pub async fn tech_user(db: &DatabaseConnection, username: &str) -> user::Model {
    create_user_with(db, username, Capability::Tech).await
}

pub async fn recruiter_user(db: &DatabaseConnection, username: &str) -> user::Model {
    create_user_with(db, username, Capability::Recruiter).await
}

pub async fn approved_tag(db: &DatabaseConnection, name: &str) -> tag::Model {
    let created = tag_service::resolve_or_create(db, name)
        .await
        .expect("resolve tag");
    tag_service::set_approval(db, created.id, true)
        .await
        .expect("approve tag")
}

pub async fn create_project(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
    tag_ids: Vec<i32>,
) -> project::Model {
    project_service::create_project(
        db,
        NewProject {
            user_id,
            name: name.to_string(),
            description: None,
            github_repo_url: None,
            deployed_url: None,
            tag_ids,
            new_tag_names: vec![],
        },
    )
    .await
    .expect("create project")
}

/// The user's derived skill tag ids, sorted for stable assertions.
pub async fn skill_tag_ids(db: &DatabaseConnection, user_id: i32) -> Vec<i32> {
    let mut ids: Vec<i32> = user_service::get_user_skills(db, user_id)
        .await
        .expect("load skills")
        .into_iter()
        .map(|t| t.id)
        .collect();
    ids.sort();
    ids
}
