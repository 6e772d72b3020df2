use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's preferred work arrangements.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_work_location_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub work_location_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::work_location_type::Entity",
        from = "Column::WorkLocationTypeId",
        to = "super::work_location_type::Column::Id",
        on_delete = "Restrict",
        on_update = "Cascade"
    )]
    WorkLocationType,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::work_location_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLocationType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
