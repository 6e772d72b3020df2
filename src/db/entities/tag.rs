use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub is_approved: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_tag::Relation::Project.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::project_tag::Relation::Tag.def().rev())
    }
}

impl Related<super::job_post::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_post_tag::Relation::JobPost.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::job_post_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
