use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::{
    job_post, job_post_tag, job_post_work_location_type, tag, user, work_location_type,
};
use crate::db::services::{tag_service, work_location_service, PAGE_SIZE};
use crate::web::error::AppError;

pub struct NewJobPost {
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub salary_currency: Option<String>,
    pub tag_ids: Vec<i32>,
    pub new_tag_names: Vec<String>,
    pub work_location_type_ids: Vec<i32>,
}

/// Creates a job post for a recruiter-capable owner. Same save-time
/// capability rule as projects, enforced at persistence.
pub async fn create_job_post(
    db: &DatabaseConnection,
    input: NewJobPost,
) -> Result<job_post::Model, AppError> {
    let owner = user::Entity::find_by_id(input.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", input.user_id)))?;

    if !owner.capability.has_recruiter() {
        return Err(AppError::PermissionDenied(
            "Only users with a recruiter profile can create job posts.".to_string(),
        ));
    }

    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Job title cannot be empty.".to_string()));
    }

    let now = Utc::now();
    let created = job_post::ActiveModel {
        user_id: Set(owner.id),
        name: Set(name),
        description: Set(input.description),
        company: Set(input.company),
        location: Set(input.location),
        salary_from: Set(input.salary_from),
        salary_to: Set(input.salary_to),
        salary_currency: Set(input.salary_currency),
        is_active: Set(true),
        view_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    apply_tags(db, created.id, &input.tag_ids, &input.new_tag_names).await?;
    apply_work_location_types(db, created.id, &input.work_location_type_ids).await?;

    info!(job_post_id = created.id, user_id = owner.id, "created job post");
    Ok(created)
}

/// Replaces the job post's advertised work arrangements with the submitted
/// set. Closed lookup table, so unknown ids are `NotFound` and nothing is
/// garbage-collected.
pub async fn apply_work_location_types(
    db: &DatabaseConnection,
    job_post_id: i32,
    work_location_type_ids: &[i32],
) -> Result<(), AppError> {
    job_post::Entity::find_by_id(job_post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {job_post_id} not found")))?;

    let desired = work_location_service::validate_ids(db, work_location_type_ids).await?;

    let txn = db.begin().await?;

    let current: HashSet<i32> = job_post_work_location_type::Entity::find()
        .select_only()
        .column(job_post_work_location_type::Column::WorkLocationTypeId)
        .filter(job_post_work_location_type::Column::JobPostId.eq(job_post_id))
        .into_tuple()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let to_remove: Vec<i32> = current.iter().filter(|id| !desired.contains(*id)).copied().collect();
    let to_add: Vec<i32> = desired.iter().filter(|id| !current.contains(*id)).copied().collect();

    if !to_remove.is_empty() {
        job_post_work_location_type::Entity::delete_many()
            .filter(job_post_work_location_type::Column::JobPostId.eq(job_post_id))
            .filter(job_post_work_location_type::Column::WorkLocationTypeId.is_in(to_remove))
            .exec(&txn)
            .await?;
    }

    if !to_add.is_empty() {
        let rows = to_add.iter().map(|id| job_post_work_location_type::ActiveModel {
            job_post_id: Set(job_post_id),
            work_location_type_id: Set(*id),
        });
        job_post_work_location_type::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    job_post_work_location_type::Column::JobPostId,
                    job_post_work_location_type::Column::WorkLocationTypeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(())
}

pub async fn get_job_post_work_location_types(
    db: &DatabaseConnection,
    job_post_id: i32,
) -> Result<Vec<work_location_type::Model>, AppError> {
    let job_post = get_job_post(db, job_post_id).await?;
    Ok(job_post
        .find_related(work_location_type::Entity)
        .order_by_asc(work_location_type::Column::Id)
        .all(db)
        .await?)
}

/// Tag editor for job posts. Same diff-and-swap as projects but with no
/// reconciliation step: the derived skill invariant only covers projects.
pub async fn apply_tags(
    db: &DatabaseConnection,
    job_post_id: i32,
    selected_tag_ids: &[i32],
    free_text_names: &[String],
) -> Result<(), AppError> {
    job_post::Entity::find_by_id(job_post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {job_post_id} not found")))?;

    let desired = tag_service::resolve_desired_tag_ids(db, selected_tag_ids, free_text_names).await?;

    let txn = db.begin().await?;

    let current: HashSet<i32> = job_post_tag::Entity::find()
        .select_only()
        .column(job_post_tag::Column::TagId)
        .filter(job_post_tag::Column::JobPostId.eq(job_post_id))
        .into_tuple()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let to_remove: Vec<i32> = current.iter().filter(|id| !desired.contains(*id)).copied().collect();
    let to_add: Vec<i32> = desired.iter().filter(|id| !current.contains(*id)).copied().collect();

    if !to_remove.is_empty() {
        job_post_tag::Entity::delete_many()
            .filter(job_post_tag::Column::JobPostId.eq(job_post_id))
            .filter(job_post_tag::Column::TagId.is_in(to_remove.clone()))
            .exec(&txn)
            .await?;
    }

    if !to_add.is_empty() {
        let rows = to_add.iter().map(|tag_id| job_post_tag::ActiveModel {
            job_post_id: Set(job_post_id),
            tag_id: Set(*tag_id),
        });
        job_post_tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    job_post_tag::Column::JobPostId,
                    job_post_tag::Column::TagId,
                ])
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

    Ok(())
}

pub async fn delete_job_post(db: &DatabaseConnection, job_post_id: i32) -> Result<(), AppError> {
    let job_post = job_post::Entity::find_by_id(job_post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {job_post_id} not found")))?;

    let former_tags: Vec<i32> = job_post_tag::Entity::find()
        .select_only()
        .column(job_post_tag::Column::TagId)
        .filter(job_post_tag::Column::JobPostId.eq(job_post_id))
        .into_tuple()
        .all(db)
        .await?;

    job_post::Entity::delete_by_id(job_post_id).exec(db).await?;

    for tag_id in former_tags {
        tag_service::delete_if_unreferenced(db, tag_id).await;
    }

    info!(job_post_id, user_id = job_post.user_id, "deleted job post");
    Ok(())
}

pub async fn get_job_post(
    db: &DatabaseConnection,
    job_post_id: i32,
) -> Result<job_post::Model, AppError> {
    job_post::Entity::find_by_id(job_post_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {job_post_id} not found")))
}

pub async fn get_job_post_tags(
    db: &DatabaseConnection,
    job_post_id: i32,
) -> Result<Vec<tag::Model>, AppError> {
    let job_post = get_job_post(db, job_post_id).await?;
    Ok(job_post
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}

/// Active job posts, newest first, fixed page size.
pub async fn list_job_posts(
    db: &DatabaseConnection,
    page: u64,
) -> Result<(Vec<job_post::Model>, u64), AppError> {
    let page = page.max(1);
    let paginator = job_post::Entity::find()
        .filter(job_post::Column::IsActive.eq(true))
        .order_by_desc(job_post::Column::CreatedAt)
        .paginate(db, PAGE_SIZE);
    let total_pages = paginator.num_pages().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok((items, total_pages))
}

/// Detail read for the job post page; the counter moves before the fetch so
/// the response is not one view behind.
pub async fn view_job_post(
    db: &DatabaseConnection,
    job_post_id: i32,
) -> Result<(job_post::Model, Vec<tag::Model>, Vec<work_location_type::Model>), AppError> {
    increment_view_count(db, job_post_id).await?;
    let job_post = get_job_post(db, job_post_id).await?;
    let tags = get_job_post_tags(db, job_post_id).await?;
    let work_location_types = get_job_post_work_location_types(db, job_post_id).await?;
    Ok((job_post, tags, work_location_types))
}

pub async fn increment_view_count(
    db: &DatabaseConnection,
    job_post_id: i32,
) -> Result<(), AppError> {
    job_post::Entity::update_many()
        .col_expr(
            job_post::Column::ViewCount,
            Expr::col(job_post::Column::ViewCount).add(1),
        )
        .filter(job_post::Column::Id.eq(job_post_id))
        .exec(db)
        .await?;
    Ok(())
}
