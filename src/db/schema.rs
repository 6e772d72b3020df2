use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::db::entities::{
    job_post, job_post_tag, job_post_work_location_type, project, project_tag, tag, user,
    user_tag, user_work_location_type, work_location_type,
};

/// Creates every table if it does not exist yet. Referenced tables are
/// created before the join tables that point at them.
pub async fn create_all_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, tag::Entity).await?;
    create_table(db, work_location_type::Entity).await?;
    create_table(db, project::Entity).await?;
    create_table(db, job_post::Entity).await?;
    create_table(db, project_tag::Entity).await?;
    create_table(db, user_tag::Entity).await?;
    create_table(db, job_post_tag::Entity).await?;
    create_table(db, job_post_work_location_type::Entity).await?;
    create_table(db, user_work_location_type::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
