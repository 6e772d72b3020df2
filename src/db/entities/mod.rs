//! SeaORM entities, one module per table.

pub mod job_post;
pub mod job_post_tag;
pub mod job_post_work_location_type;
pub mod project;
pub mod project_tag;
pub mod tag;
pub mod user;
pub mod user_tag;
pub mod user_work_location_type;
pub mod work_location_type;

pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;

    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;

    pub use super::project::Entity as Project;
    pub use super::project::Model as ProjectModel;

    pub use super::project_tag::Entity as ProjectTag;
    pub use super::project_tag::Model as ProjectTagModel;

    pub use super::user_tag::Entity as UserTag;
    pub use super::user_tag::Model as UserTagModel;

    pub use super::job_post::Entity as JobPost;
    pub use super::job_post::Model as JobPostModel;

    pub use super::job_post_tag::Entity as JobPostTag;
    pub use super::job_post_tag::Model as JobPostTagModel;

    pub use super::work_location_type::Entity as WorkLocationType;
    pub use super::work_location_type::Model as WorkLocationTypeModel;

    pub use super::job_post_work_location_type::Entity as JobPostWorkLocationType;
    pub use super::job_post_work_location_type::Model as JobPostWorkLocationTypeModel;

    pub use super::user_work_location_type::Entity as UserWorkLocationType;
    pub use super::user_work_location_type::Model as UserWorkLocationTypeModel;
}
