use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::Capability;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub work_title: Option<String>,
    pub company: Option<String>,
    pub capability: Capability,
    pub is_active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project::Entity")]
    Project,
    #[sea_orm(has_many = "super::job_post::Entity")]
    JobPost,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::job_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPost.def()
    }
}

// The user's derived skill set, maintained by reconciliation.
impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_tag::Relation::User.def().rev())
    }
}

// Preferred work arrangements, edited directly by the user.
impl Related<super::work_location_type::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_work_location_type::Relation::WorkLocationType.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::user_work_location_type::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
