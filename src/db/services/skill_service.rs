use std::collections::HashSet;

use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::debug;

use crate::db::entities::{project, project_tag, tag, user_tag};
use crate::web::error::AppError;

/// What a reconciliation run actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Recomputes a user's derived skill set as the union of approved tags
/// across their active projects, then persists only the difference against
/// the stored set. Running it twice in a row writes nothing the second time.
pub async fn reconcile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<ReconcileOutcome, AppError> {
    let project_ids: Vec<i32> = project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::UserId.eq(user_id))
        .filter(project::Column::IsActive.eq(true))
        .into_tuple()
        .all(db)
        .await?;

    let desired: HashSet<i32> = if project_ids.is_empty() {
        HashSet::new()
    } else {
        tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::IsApproved.eq(true))
            .filter(
                tag::Column::Id.in_subquery(
                    Query::select()
                        .column(project_tag::Column::TagId)
                        .from(project_tag::Entity)
                        .and_where(project_tag::Column::ProjectId.is_in(project_ids))
                        .to_owned(),
                ),
            )
            .into_tuple()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let current: HashSet<i32> = user_tag::Entity::find()
        .select_only()
        .column(user_tag::Column::TagId)
        .filter(user_tag::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let to_remove: Vec<i32> = current.difference(&desired).copied().collect();
    let to_add: Vec<i32> = desired.difference(&current).copied().collect();

    if !to_remove.is_empty() {
        user_tag::Entity::delete_many()
            .filter(user_tag::Column::UserId.eq(user_id))
            .filter(user_tag::Column::TagId.is_in(to_remove.clone()))
            .exec(db)
            .await?;
    }

    if !to_add.is_empty() {
        let rows = to_add.iter().map(|tag_id| user_tag::ActiveModel {
            user_id: Set(user_id),
            tag_id: Set(*tag_id),
        });
        user_tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([user_tag::Column::UserId, user_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    let outcome = ReconcileOutcome {
        added: to_add.len(),
        removed: to_remove.len(),
    };
    if !outcome.is_noop() {
        debug!(
            user_id,
            added = outcome.added,
            removed = outcome.removed,
            "reconciled derived skill set"
        );
    }
    Ok(outcome)
}
