/// Administration tools: user approval queue and the all-posts dashboard
/// listing. Everything here requires a capability; role checks never appear
/// inline.
use super::blog::{PostJson, PostListQuery};
use super::error::ApiError;
use super::login::SessionUser;
use crate::blog::{self, PostFilters};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users;
use crate::permission::Capability;
use crate::user;
use actix_web::{delete, get, post, web, Responder};
use sea_orm::{entity::*, query::*};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_all_posts)
        .service(list_users)
        .service(approve_user)
        .service(destroy_user);
}

/// Dashboard listing: every post in any state, with the same optional
/// filters as the public listing plus an explicit `published` filter.
#[get("/api/admin/blog-posts")]
pub async fn list_all_posts(
    client: ClientCtx,
    query: web::Query<PostListQuery>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ViewUnpublished)?;

    let filters = PostFilters {
        search: query.search.clone(),
        author: query.author.clone(),
        published: query
            .published
            .as_deref()
            .and_then(|value| value.parse::<bool>().ok()),
    };

    let posts = blog::list(get_db_pool(), &filters).await?;
    Ok(web::Json(
        posts.into_iter().map(PostJson::from).collect::<Vec<_>>(),
    ))
}

/// All accounts, oldest first, for the approval queue.
#[get("/api/admin/users")]
pub async fn list_users(client: ClientCtx) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ManageUsers)?;

    let accounts = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(get_db_pool())
        .await?;

    Ok(web::Json(
        accounts
            .iter()
            .map(SessionUser::from)
            .collect::<Vec<_>>(),
    ))
}

/// Approve a pending account so it may author content. Approving twice is
/// harmless.
#[post("/api/admin/users/{user_id}/approve")]
pub async fn approve_user(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ManageUsers)?;

    let account = user::approve(get_db_pool(), path.into_inner()).await?;
    log::info!("User approved: {} (user_id: {})", account.username, account.id);
    Ok(web::Json(SessionUser::from(&account)))
}

/// Delete an account. The bootstrap admin is always refused; owned posts
/// keep their display name and staff profiles stay in the directory.
#[delete("/api/admin/users/{user_id}")]
pub async fn destroy_user(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ManageUsers)?;

    let user_id = path.into_inner();
    user::delete(get_db_pool(), user_id).await?;
    log::info!("User deleted (user_id: {})", user_id);
    Ok(web::Json(json!({ "message": "User deleted successfully" })))
}
