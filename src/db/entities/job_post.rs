use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub salary_currency: Option<String>,
    pub is_active: bool,
    pub view_count: i32,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_post_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::job_post_tag::Relation::JobPost.def().rev())
    }
}

impl Related<super::work_location_type::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_post_work_location_type::Relation::WorkLocationType.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::job_post_work_location_type::Relation::JobPost.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
