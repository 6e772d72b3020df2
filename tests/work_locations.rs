mod common;

use stackfolio::db::services::job_post_service::{self, NewJobPost};
use stackfolio::db::services::{user_service, work_location_service};
use stackfolio::web::error::AppError;

fn job_post_input(user_id: i32, name: &str, work_location_type_ids: Vec<i32>) -> NewJobPost {
    NewJobPost {
        user_id,
        name: name.to_string(),
        description: None,
        company: None,
        location: None,
        salary_from: None,
        salary_to: None,
        salary_currency: None,
        tag_ids: vec![],
        new_tag_names: vec![],
        work_location_type_ids,
    }
}

#[tokio::test]
async fn defaults_are_seeded_once() {
    let db = common::setup_db().await;

    // The fixture already seeded; a second run must not duplicate rows.
    work_location_service::seed_defaults(&db).await.unwrap();

    let types = work_location_service::list(&db).await.unwrap();
    let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["On site", "Hybrid", "Remote"]);
}

#[tokio::test]
async fn job_post_carries_its_work_location_types() {
    let db = common::setup_db().await;

    let recruiter = common::recruiter_user(&db, "recruiter").await;
    let types = work_location_service::list(&db).await.unwrap();
    let remote = types.iter().find(|t| t.name == "Remote").unwrap();

    let created = job_post_service::create_job_post(
        &db,
        job_post_input(recruiter.id, "Rust Engineer", vec![remote.id]),
    )
    .await
    .unwrap();

    let attached = job_post_service::get_job_post_work_location_types(&db, created.id)
        .await
        .unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].name, "Remote");
}

#[tokio::test]
async fn applying_work_location_types_replaces_the_set() {
    let db = common::setup_db().await;

    let recruiter = common::recruiter_user(&db, "recruiter").await;
    let types = work_location_service::list(&db).await.unwrap();
    let on_site = types.iter().find(|t| t.name == "On site").unwrap();
    let hybrid = types.iter().find(|t| t.name == "Hybrid").unwrap();

    let created = job_post_service::create_job_post(
        &db,
        job_post_input(recruiter.id, "Platform Engineer", vec![on_site.id]),
    )
    .await
    .unwrap();

    job_post_service::apply_work_location_types(&db, created.id, &[hybrid.id])
        .await
        .unwrap();

    let attached = job_post_service::get_job_post_work_location_types(&db, created.id)
        .await
        .unwrap();
    let names: Vec<&str> = attached.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Hybrid"]);
}

#[tokio::test]
async fn unknown_work_location_type_id_is_not_found() {
    let db = common::setup_db().await;

    let recruiter = common::recruiter_user(&db, "recruiter").await;
    let result = job_post_service::create_job_post(
        &db,
        job_post_input(recruiter.id, "Ghost Role", vec![4242]),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn user_preference_is_replaced_in_full() {
    let db = common::setup_db().await;

    let dev = common::tech_user(&db, "dev").await;
    let types = work_location_service::list(&db).await.unwrap();
    let hybrid = types.iter().find(|t| t.name == "Hybrid").unwrap();
    let remote = types.iter().find(|t| t.name == "Remote").unwrap();

    user_service::set_work_location_preferences(&db, dev.id, &[hybrid.id, remote.id])
        .await
        .unwrap();
    let prefs = user_service::get_work_location_preferences(&db, dev.id).await.unwrap();
    assert_eq!(prefs.len(), 2);

    user_service::set_work_location_preferences(&db, dev.id, &[remote.id])
        .await
        .unwrap();
    let prefs = user_service::get_work_location_preferences(&db, dev.id).await.unwrap();
    let names: Vec<&str> = prefs.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Remote"]);
}
