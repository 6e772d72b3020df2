mod common;

use sea_orm::{EntityTrait, PaginatorTrait};

use stackfolio::db::entities::tag;
use stackfolio::db::enums::Capability;
use stackfolio::db::services::job_post_service::{self, NewJobPost};
use stackfolio::db::services::project_service::{self, NewProject};
use stackfolio::db::services::tag_service;
use stackfolio::web::error::AppError;

#[tokio::test]
async fn whitespace_free_text_entries_are_discarded() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let project = common::create_project(&db, owner.id, "CLI", vec![]).await;

    project_service::apply_tags(
        &db,
        project.id,
        &[],
        &["  ".to_string(), "".to_string(), " Rust ".to_string()],
    )
    .await
    .unwrap();

    let tags = project_service::get_project_tags(&db, project.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "Rust");
}

#[tokio::test]
async fn unknown_selected_tag_id_is_not_found() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let project = common::create_project(&db, owner.id, "CLI", vec![]).await;

    let result = project_service::apply_tags(&db, project.id, &[4242], &[]).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_submission_is_a_noop() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let rust = common::approved_tag(&db, "Rust").await;
    let project = common::create_project(&db, owner.id, "CLI", vec![rust.id]).await;

    // Same target set again, id and free-text form at once.
    project_service::apply_tags(&db, project.id, &[rust.id], &["Rust".to_string()])
        .await
        .unwrap();

    let tags = project_service::get_project_tags(&db, project.id).await.unwrap();
    assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn removing_last_reference_garbage_collects_the_tag() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let project = common::create_project(&db, owner.id, "CLI", vec![]).await;
    project_service::apply_tags(&db, project.id, &[], &["Zig".to_string()]).await.unwrap();
    let zig = tag_service::find_by_name(&db, "Zig").await.unwrap().unwrap();

    project_service::apply_tags(&db, project.id, &[], &[]).await.unwrap();

    // Row is gone; re-submitting the name mints a fresh id.
    assert!(tag::Entity::find_by_id(zig.id).one(&db).await.unwrap().is_none());
    let reborn = tag_service::resolve_or_create(&db, "Zig").await.unwrap();
    assert_ne!(reborn.id, zig.id);
}

#[tokio::test]
async fn shared_tags_survive_garbage_collection() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let rust = common::approved_tag(&db, "Rust").await;
    let keeper = common::create_project(&db, owner.id, "Keeper", vec![rust.id]).await;
    let dropper = common::create_project(&db, owner.id, "Dropper", vec![rust.id]).await;

    project_service::apply_tags(&db, dropper.id, &[], &[]).await.unwrap();

    assert!(tag::Entity::find_by_id(rust.id).one(&db).await.unwrap().is_some());
    let keeper_tags = project_service::get_project_tags(&db, keeper.id).await.unwrap();
    assert_eq!(keeper_tags.len(), 1);
}

#[tokio::test]
async fn job_post_reference_blocks_garbage_collection() {
    let db = common::setup_db().await;

    let dev = common::tech_user(&db, "dev").await;
    let recruiter = common::recruiter_user(&db, "recruiter").await;
    let rust = common::approved_tag(&db, "Rust").await;

    job_post_service::create_job_post(
        &db,
        NewJobPost {
            user_id: recruiter.id,
            name: "Rust Engineer".to_string(),
            description: None,
            company: None,
            location: None,
            salary_from: None,
            salary_to: None,
            salary_currency: None,
            tag_ids: vec![rust.id],
            new_tag_names: vec![],
            work_location_type_ids: vec![],
        },
    )
    .await
    .unwrap();

    let project = common::create_project(&db, dev.id, "CLI", vec![rust.id]).await;
    project_service::apply_tags(&db, project.id, &[], &[]).await.unwrap();

    // Still referenced by the job post.
    assert!(tag::Entity::find_by_id(rust.id).one(&db).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_project_garbage_collects_its_tags() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let project = common::create_project(&db, owner.id, "CLI", vec![]).await;
    project_service::apply_tags(&db, project.id, &[], &["Zig".to_string()]).await.unwrap();

    project_service::delete_project(&db, project.id).await.unwrap();

    let rows = tag::Entity::find().count(&db).await.unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn project_creation_requires_tech_capability() {
    let db = common::setup_db().await;

    let recruiter = common::recruiter_user(&db, "recruiter").await;
    let result = project_service::create_project(
        &db,
        NewProject {
            user_id: recruiter.id,
            name: "Sneaky".to_string(),
            description: None,
            github_repo_url: None,
            deployed_url: None,
            tag_ids: vec![],
            new_tag_names: vec![],
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}

#[tokio::test]
async fn job_post_creation_requires_recruiter_capability() {
    let db = common::setup_db().await;

    let dev = common::tech_user(&db, "dev").await;
    let result = job_post_service::create_job_post(
        &db,
        NewJobPost {
            user_id: dev.id,
            name: "Ghost Role".to_string(),
            description: None,
            company: None,
            location: None,
            salary_from: None,
            salary_to: None,
            salary_currency: None,
            tag_ids: vec![],
            new_tag_names: vec![],
            work_location_type_ids: vec![],
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}

#[tokio::test]
async fn both_capability_passes_both_checks() {
    let db = common::setup_db().await;

    let hybrid = common::create_user_with(&db, "hybrid", Capability::Both).await;
    common::create_project(&db, hybrid.id, "Side Project", vec![]).await;
    job_post_service::create_job_post(
        &db,
        NewJobPost {
            user_id: hybrid.id,
            name: "Hiring Myself".to_string(),
            description: None,
            company: None,
            location: None,
            salary_from: None,
            salary_to: None,
            salary_currency: None,
            tag_ids: vec![],
            new_tag_names: vec![],
            work_location_type_ids: vec![],
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn job_post_tags_never_reach_the_derived_set() {
    let db = common::setup_db().await;

    let hybrid = common::create_user_with(&db, "hybrid", Capability::Both).await;
    let rust = common::approved_tag(&db, "Rust").await;

    job_post_service::create_job_post(
        &db,
        NewJobPost {
            user_id: hybrid.id,
            name: "Rust Engineer".to_string(),
            description: None,
            company: None,
            location: None,
            salary_from: None,
            salary_to: None,
            salary_currency: None,
            tag_ids: vec![rust.id],
            new_tag_names: vec![],
            work_location_type_ids: vec![],
        },
    )
    .await
    .unwrap();

    assert!(common::skill_tag_ids(&db, hybrid.id).await.is_empty());
}

#[tokio::test]
async fn duplicate_project_name_per_user_is_rejected() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    common::create_project(&db, owner.id, "CLI", vec![]).await;

    let result = project_service::create_project(
        &db,
        NewProject {
            user_id: owner.id,
            name: "CLI".to_string(),
            description: None,
            github_repo_url: None,
            deployed_url: None,
            tag_ids: vec![],
            new_tag_names: vec![],
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::DuplicateName(_))));
}
