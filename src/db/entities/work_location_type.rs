use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work location lookup (on site / hybrid / remote). Job posts advertise
/// the arrangements they offer; users record the ones they prefer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_location_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::job_post::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_post_work_location_type::Relation::JobPost.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::job_post_work_location_type::Relation::WorkLocationType.def().rev())
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_work_location_type::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_work_location_type::Relation::WorkLocationType.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
