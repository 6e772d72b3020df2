use std::collections::BTreeSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::db::entities::work_location_type;
use crate::web::error::AppError;

/// The fixture values every deployment carries.
pub const DEFAULT_NAMES: [&str; 3] = ["On site", "Hybrid", "Remote"];

/// Inserts the default work location types, skipping ones already present.
/// Safe to run on every startup.
pub async fn seed_defaults<C: ConnectionTrait>(db: &C) -> Result<(), AppError> {
    let rows = DEFAULT_NAMES.iter().map(|name| work_location_type::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    });
    work_location_type::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::column(work_location_type::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// All work location types in fixture order, for selection controls.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<work_location_type::Model>, AppError> {
    Ok(work_location_type::Entity::find()
        .order_by_asc(work_location_type::Column::Id)
        .all(db)
        .await?)
}

/// Rejects ids that do not name an existing work location type. Unlike
/// tags there is no free-text path; the lookup table is closed.
pub(crate) async fn validate_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<BTreeSet<i32>, AppError> {
    let requested: BTreeSet<i32> = ids.iter().copied().collect();
    if requested.is_empty() {
        return Ok(requested);
    }

    let known: Vec<i32> = work_location_type::Entity::find()
        .select_only()
        .column(work_location_type::Column::Id)
        .filter(work_location_type::Column::Id.is_in(requested.clone()))
        .into_tuple()
        .all(db)
        .await?;
    if known.len() != requested.len() {
        let known: BTreeSet<i32> = known.into_iter().collect();
        let missing: Vec<i32> = requested.difference(&known).copied().collect();
        return Err(AppError::NotFound(format!(
            "Unknown work location type ids: {missing:?}"
        )));
    }
    Ok(requested)
}
