use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info};

use crate::db::entities::{project, project_tag, tag, user};
use crate::db::services::{skill_service, slugify, tag_service, PAGE_SIZE};
use crate::web::error::AppError;

pub struct NewProject {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub github_repo_url: Option<String>,
    pub deployed_url: Option<String>,
    pub tag_ids: Vec<i32>,
    pub new_tag_names: Vec<String>,
}

/// Creates a project for a tech-capable owner and applies its initial tag
/// set. The capability check lives here, at the point of persistence, so no
/// handler can route around it.
pub async fn create_project(
    db: &DatabaseConnection,
    input: NewProject,
) -> Result<project::Model, AppError> {
    let owner = user::Entity::find_by_id(input.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", input.user_id)))?;

    if !owner.capability.has_tech() {
        return Err(AppError::PermissionDenied(
            "Only users with a tech profile can create projects.".to_string(),
        ));
    }

    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Project name cannot be empty.".to_string()));
    }

    let clash = project::Entity::find()
        .filter(project::Column::UserId.eq(owner.id))
        .filter(project::Column::Name.eq(name.clone()))
        .count(db)
        .await?;
    if clash > 0 {
        return Err(AppError::DuplicateName(format!(
            "You already have a project named '{name}'."
        )));
    }

    let now = Utc::now();
    let created = project::ActiveModel {
        user_id: Set(owner.id),
        name: Set(name.clone()),
        slug: Set(slugify(&name)),
        description: Set(input.description),
        github_repo_url: Set(input.github_repo_url),
        deployed_url: Set(input.deployed_url),
        is_active: Set(true),
        view_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    apply_tags(db, created.id, &input.tag_ids, &input.new_tag_names).await?;

    info!(project_id = created.id, user_id = owner.id, "created project");
    Ok(created)
}

/// The tag editor. Resolves the submitted target set, swaps the project's
/// associations over to it in one transaction, garbage-collects whatever
/// fell out, then reconciles the owner's derived skills.
pub async fn apply_tags(
    db: &DatabaseConnection,
    project_id: i32,
    selected_tag_ids: &[i32],
    free_text_names: &[String],
) -> Result<(), AppError> {
    let project = project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;

    let desired = tag_service::resolve_desired_tag_ids(db, selected_tag_ids, free_text_names).await?;

    // Removals and additions commit together; readers never see a half
    // applied tag set.
    let txn = db.begin().await?;

    let current: HashSet<i32> = project_tag::Entity::find()
        .select_only()
        .column(project_tag::Column::TagId)
        .filter(project_tag::Column::ProjectId.eq(project_id))
        .into_tuple()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let to_remove: Vec<i32> = current.iter().filter(|id| !desired.contains(*id)).copied().collect();
    let to_add: Vec<i32> = desired.iter().filter(|id| !current.contains(*id)).copied().collect();

    if !to_remove.is_empty() {
        project_tag::Entity::delete_many()
            .filter(project_tag::Column::ProjectId.eq(project_id))
            .filter(project_tag::Column::TagId.is_in(to_remove.clone()))
            .exec(&txn)
            .await?;
    }

    if !to_add.is_empty() {
        let rows = to_add.iter().map(|tag_id| project_tag::ActiveModel {
            project_id: Set(project_id),
            tag_id: Set(*tag_id),
        });
        project_tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([project_tag::Column::ProjectId, project_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    for tag_id in &to_remove {
        tag_service::delete_if_unreferenced(db, *tag_id).await;
    }

    // Post-commit trigger; a failure here is retryable by re-running
    // reconcile for the owner.
    if let Err(err) = skill_service::reconcile(db, project.user_id).await {
        error!(user_id = project.user_id, error = %err, "post-commit reconciliation failed");
        return Err(err);
    }

    Ok(())
}

/// Deletes a project, garbage-collects its former tags and reconciles the
/// owner captured before the delete.
pub async fn delete_project(db: &DatabaseConnection, project_id: i32) -> Result<(), AppError> {
    let project = project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;

    let former_tags: Vec<i32> = project_tag::Entity::find()
        .select_only()
        .column(project_tag::Column::TagId)
        .filter(project_tag::Column::ProjectId.eq(project_id))
        .into_tuple()
        .all(db)
        .await?;

    project::Entity::delete_by_id(project_id).exec(db).await?;

    for tag_id in former_tags {
        tag_service::delete_if_unreferenced(db, tag_id).await;
    }

    if let Err(err) = skill_service::reconcile(db, project.user_id).await {
        error!(user_id = project.user_id, error = %err, "post-commit reconciliation failed");
        return Err(err);
    }

    info!(project_id, user_id = project.user_id, "deleted project");
    Ok(())
}

pub async fn get_project(
    db: &DatabaseConnection,
    project_id: i32,
) -> Result<project::Model, AppError> {
    project::Entity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}

/// The project's raw tag set, unapproved tags included (the owner sees
/// those even though they never reach the derived skill set).
pub async fn get_project_tags(
    db: &DatabaseConnection,
    project_id: i32,
) -> Result<Vec<tag::Model>, AppError> {
    let project = get_project(db, project_id).await?;
    Ok(project
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}

/// Active projects, newest first, fixed page size.
pub async fn list_projects(
    db: &DatabaseConnection,
    page: u64,
) -> Result<(Vec<project::Model>, u64), AppError> {
    let page = page.max(1);
    let paginator = project::Entity::find()
        .filter(project::Column::IsActive.eq(true))
        .order_by_desc(project::Column::CreatedAt)
        .paginate(db, PAGE_SIZE);
    let total_pages = paginator.num_pages().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok((items, total_pages))
}

/// Detail read as used by the project page: bumps the view counter first so
/// the returned model carries the post-increment count.
pub async fn view_project(
    db: &DatabaseConnection,
    project_id: i32,
) -> Result<(project::Model, Vec<tag::Model>), AppError> {
    increment_view_count(db, project_id).await?;
    let project = get_project(db, project_id).await?;
    let tags = get_project_tags(db, project_id).await?;
    Ok((project, tags))
}

pub async fn increment_view_count(
    db: &DatabaseConnection,
    project_id: i32,
) -> Result<(), AppError> {
    project::Entity::update_many()
        .col_expr(
            project::Column::ViewCount,
            Expr::col(project::Column::ViewCount).add(1),
        )
        .filter(project::Column::Id.eq(project_id))
        .exec(db)
        .await?;
    Ok(())
}
