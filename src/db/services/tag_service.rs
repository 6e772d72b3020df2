use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::db::entities::{job_post_tag, project_tag, tag};
use crate::web::error::AppError;

/// A tag together with how many projects and job posts currently carry it.
/// Used by the moderation screen.
#[derive(Serialize, Debug)]
pub struct TagWithCounts {
    pub id: i32,
    pub name: String,
    pub is_approved: bool,
    pub project_count: i64,
    pub job_post_count: i64,
}

/// Looks a tag up by exact, case-sensitive name, creating it unapproved when
/// absent. Two concurrent calls for the same new name yield one row: the
/// unique constraint on `name` decides the winner and the loser re-fetches.
pub async fn resolve_or_create<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<tag::Model, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Tag name cannot be empty.".to_string()));
    }

    if let Some(existing) = find_by_name(db, name).await? {
        return Ok(existing);
    }

    insert_unapproved(db, name).await
}

/// The write half of `resolve_or_create`, after the lookup has missed. When
/// the insert loses a create race it hits the unique constraint and comes
/// back with the winner's row instead.
async fn insert_unapproved<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<tag::Model, AppError> {
    let now = Utc::now();
    let candidate = tag::ActiveModel {
        name: Set(name.to_string()),
        is_approved: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match candidate.insert(db).await {
        Ok(created) => {
            debug!(tag = %created.name, id = created.id, "created unapproved tag");
            Ok(created)
        }
        Err(err) if is_unique_violation(&err) => {
            find_by_name(db, name).await?.ok_or_else(|| {
                AppError::DatabaseError(format!(
                    "tag '{name}' missing after losing the create race"
                ))
            })
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<tag::Model>, AppError> {
    Ok(tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// All approved tags, name order, for facet display.
pub async fn list_approved<C: ConnectionTrait>(db: &C) -> Result<Vec<tag::Model>, AppError> {
    Ok(tag::Entity::find()
        .filter(tag::Column::IsApproved.eq(true))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}

/// Every tag with its reference counts, name order.
pub async fn list_all_with_counts<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<TagWithCounts>, AppError> {
    let tags = tag::Entity::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?;

    let project_counts: HashMap<i32, i64> = project_tag::Entity::find()
        .select_only()
        .column(project_tag::Column::TagId)
        .column_as(project_tag::Column::ProjectId.count(), "refs")
        .group_by(project_tag::Column::TagId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let job_post_counts: HashMap<i32, i64> = job_post_tag::Entity::find()
        .select_only()
        .column(job_post_tag::Column::TagId)
        .column_as(job_post_tag::Column::JobPostId.count(), "refs")
        .group_by(job_post_tag::Column::TagId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(tags
        .into_iter()
        .map(|t| TagWithCounts {
            project_count: project_counts.get(&t.id).copied().unwrap_or(0),
            job_post_count: job_post_counts.get(&t.id).copied().unwrap_or(0),
            id: t.id,
            name: t.name,
            is_approved: t.is_approved,
        })
        .collect())
}

/// Moderation: approve or unapprove a tag.
pub async fn set_approval<C: ConnectionTrait>(
    db: &C,
    tag_id: i32,
    approved: bool,
) -> Result<tag::Model, AppError> {
    let existing = tag::Entity::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {tag_id} not found")))?;

    if existing.is_approved == approved {
        return Ok(existing);
    }

    let mut active: tag::ActiveModel = existing.into();
    active.is_approved = Set(approved);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Moderation: rename a tag. Colliding with an existing name is surfaced to
/// the administrator as `DuplicateName`.
pub async fn rename<C: ConnectionTrait>(
    db: &C,
    tag_id: i32,
    new_name: &str,
) -> Result<tag::Model, AppError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(AppError::InvalidInput("Tag name cannot be empty.".to_string()));
    }

    let existing = tag::Entity::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {tag_id} not found")))?;

    if existing.name == new_name {
        return Ok(existing);
    }

    let mut active: tag::ActiveModel = existing.into();
    active.name = Set(new_name.to_string());
    active.updated_at = Set(Utc::now());
    match active.update(db).await {
        Ok(updated) => Ok(updated),
        Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateName(format!(
            "A tag named '{new_name}' already exists."
        ))),
        Err(err) => Err(err.into()),
    }
}

/// Opportunistic garbage collection: drops the tag when nothing references
/// it any more. Never fails the caller; a reference appearing between the
/// check and the delete hits the RESTRICT foreign key and is absorbed here.
pub async fn delete_if_unreferenced<C: ConnectionTrait>(db: &C, tag_id: i32) -> bool {
    match try_delete_unreferenced(db, tag_id).await {
        Ok(deleted) => {
            if deleted {
                debug!(tag_id, "garbage-collected unreferenced tag");
            }
            deleted
        }
        Err(err) => {
            warn!(tag_id, error = %err, "tag garbage collection skipped");
            false
        }
    }
}

async fn try_delete_unreferenced<C: ConnectionTrait>(db: &C, tag_id: i32) -> Result<bool, DbErr> {
    let project_refs = project_tag::Entity::find()
        .filter(project_tag::Column::TagId.eq(tag_id))
        .count(db)
        .await?;
    if project_refs > 0 {
        return Ok(false);
    }

    let job_post_refs = job_post_tag::Entity::find()
        .filter(job_post_tag::Column::TagId.eq(tag_id))
        .count(db)
        .await?;
    if job_post_refs > 0 {
        return Ok(false);
    }

    let result = tag::Entity::delete_by_id(tag_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Resolves a tag-editor submission into the target tag id set: referenced
/// ids must already exist (`NotFound` otherwise), free-text names are
/// trimmed, blanks dropped, and the rest created unapproved when new.
pub(crate) async fn resolve_desired_tag_ids<C: ConnectionTrait>(
    db: &C,
    selected_tag_ids: &[i32],
    free_text_names: &[String],
) -> Result<BTreeSet<i32>, AppError> {
    let mut desired: BTreeSet<i32> = BTreeSet::new();

    let requested: BTreeSet<i32> = selected_tag_ids.iter().copied().collect();
    if !requested.is_empty() {
        let known: Vec<i32> = tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::Id.is_in(requested.clone()))
            .into_tuple()
            .all(db)
            .await?;
        if known.len() != requested.len() {
            let known: BTreeSet<i32> = known.into_iter().collect();
            let missing: Vec<i32> = requested.difference(&known).copied().collect();
            return Err(AppError::NotFound(format!("Unknown tag ids: {missing:?}")));
        }
        desired.extend(requested);
    }

    for name in free_text_names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        desired.insert(resolve_or_create(db, trimmed).await?.id);
    }

    Ok(desired)
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
