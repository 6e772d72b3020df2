mod common;

use stackfolio::db::services::{project_service, skill_service, tag_service};

#[tokio::test]
async fn derived_set_tracks_project_tags() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let go = common::approved_tag(&db, "Go").await;
    let rust = common::approved_tag(&db, "Rust").await;

    let project = common::create_project(&db, owner.id, "CLI", vec![go.id, rust.id]).await;
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, {
        let mut v = vec![go.id, rust.id];
        v.sort();
        v
    });

    // Dropping Rust from the project drops it from the derived set.
    project_service::apply_tags(&db, project.id, &[go.id], &[]).await.unwrap();
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, vec![go.id]);
}

#[tokio::test]
async fn union_spans_multiple_projects() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let go = common::approved_tag(&db, "Go").await;
    let rust = common::approved_tag(&db, "Rust").await;

    common::create_project(&db, owner.id, "Service", vec![go.id]).await;
    let second = common::create_project(&db, owner.id, "Parser", vec![rust.id]).await;

    let mut expected = vec![go.id, rust.id];
    expected.sort();
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, expected);

    // Deleting one project leaves the other project's tags in place.
    project_service::delete_project(&db, second.id).await.unwrap();
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, vec![go.id]);
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let go = common::approved_tag(&db, "Go").await;
    common::create_project(&db, owner.id, "Service", vec![go.id]).await;

    let first = skill_service::reconcile(&db, owner.id).await.unwrap();
    assert!(first.is_noop(), "create_project already reconciled");

    let second = skill_service::reconcile(&db, owner.id).await.unwrap();
    assert!(second.is_noop());
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, vec![go.id]);
}

#[tokio::test]
async fn unapproved_tags_stay_out_until_approved() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let project = common::create_project(&db, owner.id, "Experiment", vec![]).await;

    // Free-text submission creates the tag unapproved; it shows on the
    // project but not on the owner.
    project_service::apply_tags(&db, project.id, &[], &["Zig".to_string()]).await.unwrap();
    let project_tags = project_service::get_project_tags(&db, project.id).await.unwrap();
    assert_eq!(project_tags.len(), 1);
    assert!(!project_tags[0].is_approved);
    assert!(common::skill_tag_ids(&db, owner.id).await.is_empty());

    // Approval alone does not rewrite history; the next reconciliation does.
    let zig = tag_service::set_approval(&db, project_tags[0].id, true).await.unwrap();
    assert!(common::skill_tag_ids(&db, owner.id).await.is_empty());

    let outcome = skill_service::reconcile(&db, owner.id).await.unwrap();
    assert_eq!(outcome.added, 1);
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, vec![zig.id]);
}

#[tokio::test]
async fn unapproving_a_tag_prunes_on_next_reconcile() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let go = common::approved_tag(&db, "Go").await;
    common::create_project(&db, owner.id, "Service", vec![go.id]).await;
    assert_eq!(common::skill_tag_ids(&db, owner.id).await, vec![go.id]);

    tag_service::set_approval(&db, go.id, false).await.unwrap();
    let outcome = skill_service::reconcile(&db, owner.id).await.unwrap();
    assert_eq!(outcome.removed, 1);
    assert!(common::skill_tag_ids(&db, owner.id).await.is_empty());
}

#[tokio::test]
async fn user_with_no_projects_has_empty_skills() {
    let db = common::setup_db().await;

    let owner = common::tech_user(&db, "dev").await;
    let outcome = skill_service::reconcile(&db, owner.id).await.unwrap();
    assert!(outcome.is_noop());
    assert!(common::skill_tag_ids(&db, owner.id).await.is_empty());
}
