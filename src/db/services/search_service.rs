use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::db::entities::{job_post, job_post_tag, project, project_tag, tag, user, user_tag};
use crate::db::services::{tag_service, PAGE_SIZE};
use crate::web::error::AppError;

/// Which entity type a search runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    Users,
    Projects,
    JobPosts,
}

impl SearchTarget {
    /// Unrecognized selector values fall back to the user listing. The
    /// permissive default is deliberate and covered by tests.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "projects" => SearchTarget::Projects,
            "job_posts" | "job-posts" | "jobposts" => SearchTarget::JobPosts,
            _ => SearchTarget::Users,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatchMode {
    All,
    Any,
}

impl TagMatchMode {
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => TagMatchMode::All,
            _ => TagMatchMode::Any,
        }
    }
}

pub struct SearchQuery {
    pub q: String,
    pub target: SearchTarget,
    pub tag_names: Vec<String>,
    pub mode: TagMatchMode,
    /// 1-indexed; pages past the end come back empty.
    pub page: u64,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum SearchItems {
    Users(Vec<user::Model>),
    Projects(Vec<project::Model>),
    JobPosts(Vec<job_post::Model>),
}

/// A result page plus everything the search UI needs to re-render its
/// controls: the selector state and the full approved-tag facet list.
#[derive(Serialize, Debug)]
pub struct SearchResults {
    pub target: SearchTarget,
    pub query: String,
    pub mode: TagMatchMode,
    pub selected_tags: Vec<tag::Model>,
    pub facets: Vec<tag::Model>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub items: SearchItems,
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    query: SearchQuery,
) -> Result<SearchResults, AppError> {
    let q = query.q.trim().to_string();
    let page = query.page.max(1);

    // Unknown tag names silently contribute no constraint; the resolved
    // tags keep the caller's order for display.
    let requested: Vec<String> = {
        let mut seen = Vec::new();
        for name in &query.tag_names {
            let trimmed = name.trim();
            if !trimmed.is_empty() && !seen.iter().any(|s: &String| s == trimmed) {
                seen.push(trimmed.to_string());
            }
        }
        seen
    };
    let selected_tags: Vec<tag::Model> = if requested.is_empty() {
        Vec::new()
    } else {
        let found = tag::Entity::find()
            .filter(tag::Column::Name.is_in(requested.clone()))
            .all(db)
            .await?;
        requested
            .iter()
            .filter_map(|name| found.iter().find(|t| &t.name == name).cloned())
            .collect()
    };
    let tag_ids: Vec<i32> = selected_tags.iter().map(|t| t.id).collect();

    let facets = tag_service::list_approved(db).await?;

    let (items, total_items, total_pages) = match query.target {
        SearchTarget::Users => {
            let (models, items, pages) = search_users(db, &q, &tag_ids, query.mode, page).await?;
            (SearchItems::Users(models), items, pages)
        }
        SearchTarget::Projects => {
            let (models, items, pages) = search_projects(db, &q, &tag_ids, query.mode, page).await?;
            (SearchItems::Projects(models), items, pages)
        }
        SearchTarget::JobPosts => {
            let (models, items, pages) = search_job_posts(db, &q, &tag_ids, query.mode, page).await?;
            (SearchItems::JobPosts(models), items, pages)
        }
    };

    Ok(SearchResults {
        target: query.target,
        query: q,
        mode: query.mode,
        selected_tags,
        facets,
        page,
        page_size: PAGE_SIZE,
        total_items,
        total_pages,
        items,
    })
}

async fn search_users<C: ConnectionTrait>(
    db: &C,
    q: &str,
    tag_ids: &[i32],
    mode: TagMatchMode,
    page: u64,
) -> Result<(Vec<user::Model>, u64, u64), AppError> {
    let mut find = user::Entity::find().filter(user::Column::IsActive.eq(true));

    if !q.is_empty() {
        find = find.filter(
            Condition::any()
                .add(contains_ci((user::Entity, user::Column::FirstName), q))
                .add(contains_ci((user::Entity, user::Column::LastName), q))
                .add(contains_ci((user::Entity, user::Column::Bio), q)),
        );
    }

    // Users are matched on the derived skill set.
    match mode {
        TagMatchMode::All => {
            for tag_id in tag_ids {
                find = find.filter(
                    user::Column::Id.in_subquery(
                        Query::select()
                            .column(user_tag::Column::UserId)
                            .from(user_tag::Entity)
                            .and_where(user_tag::Column::TagId.eq(*tag_id))
                            .to_owned(),
                    ),
                );
            }
        }
        TagMatchMode::Any => {
            if !tag_ids.is_empty() {
                find = find.filter(
                    user::Column::Id.in_subquery(
                        Query::select()
                            .column(user_tag::Column::UserId)
                            .from(user_tag::Entity)
                            .and_where(user_tag::Column::TagId.is_in(tag_ids.to_vec()))
                            .to_owned(),
                    ),
                );
            }
        }
    }

    let paginator = find.order_by_asc(user::Column::Id).paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;
    Ok((models, totals.number_of_items, totals.number_of_pages))
}

async fn search_projects<C: ConnectionTrait>(
    db: &C,
    q: &str,
    tag_ids: &[i32],
    mode: TagMatchMode,
    page: u64,
) -> Result<(Vec<project::Model>, u64, u64), AppError> {
    let mut find = project::Entity::find().filter(project::Column::IsActive.eq(true));

    if !q.is_empty() {
        find = find.filter(
            Condition::any()
                .add(contains_ci((project::Entity, project::Column::Name), q))
                .add(contains_ci((project::Entity, project::Column::Description), q)),
        );
    }

    match mode {
        // One narrowing subquery per tag: conjunctive, and it composes with
        // the paginator instead of materializing candidate sets.
        TagMatchMode::All => {
            for tag_id in tag_ids {
                find = find.filter(
                    project::Column::Id.in_subquery(
                        Query::select()
                            .column(project_tag::Column::ProjectId)
                            .from(project_tag::Entity)
                            .and_where(project_tag::Column::TagId.eq(*tag_id))
                            .to_owned(),
                    ),
                );
            }
        }
        TagMatchMode::Any => {
            if !tag_ids.is_empty() {
                find = find.filter(
                    project::Column::Id.in_subquery(
                        Query::select()
                            .column(project_tag::Column::ProjectId)
                            .from(project_tag::Entity)
                            .and_where(project_tag::Column::TagId.is_in(tag_ids.to_vec()))
                            .to_owned(),
                    ),
                );
            }
        }
    }

    let paginator = find
        .order_by_desc(project::Column::CreatedAt)
        .paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;
    Ok((models, totals.number_of_items, totals.number_of_pages))
}

async fn search_job_posts<C: ConnectionTrait>(
    db: &C,
    q: &str,
    tag_ids: &[i32],
    mode: TagMatchMode,
    page: u64,
) -> Result<(Vec<job_post::Model>, u64, u64), AppError> {
    let mut find = job_post::Entity::find().filter(job_post::Column::IsActive.eq(true));

    if !q.is_empty() {
        find = find.filter(
            Condition::any()
                .add(contains_ci((job_post::Entity, job_post::Column::Name), q))
                .add(contains_ci((job_post::Entity, job_post::Column::Description), q)),
        );
    }

    match mode {
        TagMatchMode::All => {
            for tag_id in tag_ids {
                find = find.filter(
                    job_post::Column::Id.in_subquery(
                        Query::select()
                            .column(job_post_tag::Column::JobPostId)
                            .from(job_post_tag::Entity)
                            .and_where(job_post_tag::Column::TagId.eq(*tag_id))
                            .to_owned(),
                    ),
                );
            }
        }
        TagMatchMode::Any => {
            if !tag_ids.is_empty() {
                find = find.filter(
                    job_post::Column::Id.in_subquery(
                        Query::select()
                            .column(job_post_tag::Column::JobPostId)
                            .from(job_post_tag::Entity)
                            .and_where(job_post_tag::Column::TagId.is_in(tag_ids.to_vec()))
                            .to_owned(),
                    ),
                );
            }
        }
    }

    let paginator = find
        .order_by_desc(job_post::Column::CreatedAt)
        .paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;
    Ok((models, totals.number_of_items, totals.number_of_pages))
}

/// Case-insensitive substring match, portable across Postgres and SQLite:
/// `lower(col) LIKE '%needle%' ESCAPE '\'`. The needle is a literal, so
/// `%`, `_` and `\` are escaped before they reach the pattern.
fn contains_ci<T: IntoColumnRef>(col: T, needle: &str) -> SimpleExpr {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = LikeExpr::new(format!("%{escaped}%")).escape('\\');
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}
