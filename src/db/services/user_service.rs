use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::db::entities::{tag, user, user_work_location_type, work_location_type};
use crate::db::enums::Capability;
use crate::db::services::{slugify, tag_service, work_location_service};
use crate::web::error::AppError;

pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub work_title: Option<String>,
    pub company: Option<String>,
    pub capability: Capability,
}

pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, AppError> {
    if input.email.is_empty() || input.username.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and username are required.".to_string(),
        ));
    }
    if input.first_name.is_empty() || input.last_name.is_empty() {
        return Err(AppError::InvalidInput(
            "First and last name are required.".to_string(),
        ));
    }

    let now = Utc::now();
    let candidate = user::ActiveModel {
        email: Set(input.email),
        username: Set(input.username.clone()),
        slug: Set(slugify(&input.username)),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        bio: Set(input.bio),
        work_title: Set(input.work_title),
        company: Set(input.company),
        capability: Set(input.capability),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match candidate.insert(db).await {
        Ok(created) => {
            info!(user_id = created.id, username = %created.username, "created user");
            Ok(created)
        }
        Err(err) if tag_service::is_unique_violation(&err) => Err(AppError::DuplicateName(
            "Email, username or slug is already registered.".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// The user's derived skill set, name order. Read-only by design; writes go
/// through reconciliation.
pub async fn get_user_skills(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<tag::Model>, AppError> {
    let user = get_user(db, user_id).await?;
    Ok(user
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}

/// Replaces the user's preferred work arrangements with the submitted set.
pub async fn set_work_location_preferences(
    db: &DatabaseConnection,
    user_id: i32,
    work_location_type_ids: &[i32],
) -> Result<(), AppError> {
    get_user(db, user_id).await?;
    let desired = work_location_service::validate_ids(db, work_location_type_ids).await?;

    let current: HashSet<i32> = user_work_location_type::Entity::find()
        .select_only()
        .column(user_work_location_type::Column::WorkLocationTypeId)
        .filter(user_work_location_type::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let to_remove: Vec<i32> = current.iter().filter(|id| !desired.contains(*id)).copied().collect();
    let to_add: Vec<i32> = desired.iter().filter(|id| !current.contains(*id)).copied().collect();

    if !to_remove.is_empty() {
        user_work_location_type::Entity::delete_many()
            .filter(user_work_location_type::Column::UserId.eq(user_id))
            .filter(user_work_location_type::Column::WorkLocationTypeId.is_in(to_remove))
            .exec(db)
            .await?;
    }

    if !to_add.is_empty() {
        let rows = to_add.iter().map(|id| user_work_location_type::ActiveModel {
            user_id: Set(user_id),
            work_location_type_id: Set(*id),
        });
        user_work_location_type::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    user_work_location_type::Column::UserId,
                    user_work_location_type::Column::WorkLocationTypeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}

pub async fn get_work_location_preferences(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<work_location_type::Model>, AppError> {
    let user = get_user(db, user_id).await?;
    Ok(user
        .find_related(work_location_type::Entity)
        .order_by_asc(work_location_type::Column::Id)
        .all(db)
        .await?)
}

/// Grants or revokes profile capabilities. Changing capability does not
/// touch existing rows; the derived skill set only moves on the next
/// reconciliation.
pub async fn set_capability(
    db: &DatabaseConnection,
    user_id: i32,
    capability: Capability,
) -> Result<user::Model, AppError> {
    let existing = get_user(db, user_id).await?;
    if existing.capability == capability {
        return Ok(existing);
    }
    let mut active: user::ActiveModel = existing.into();
    active.capability = Set(capability);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}
