use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_post_work_location_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_post_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub work_location_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_post::Entity",
        from = "Column::JobPostId",
        to = "super::job_post::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    JobPost,
    #[sea_orm(
        belongs_to = "super::work_location_type::Entity",
        from = "Column::WorkLocationTypeId",
        to = "super::work_location_type::Column::Id",
        on_delete = "Restrict",
        on_update = "Cascade"
    )]
    WorkLocationType,
}

impl Related<super::job_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobPost.def()
    }
}

impl Related<super::work_location_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLocationType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
