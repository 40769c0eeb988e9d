use super::error::ApiError;
use crate::comments::{self, CommentChanges, CommentNode, CommentWithReplyCount, NewComment};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::comments as comment_orm;
use crate::permission::Capability;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_top_level_comments)
        .service(list_replies)
        .service(create_comment)
        .service(view_comment_tree)
        .service(moderate_comment)
        .service(destroy_comment);
}

/// A comment as returned to clients. `reply_count` counts approved direct
/// replies and is computed per listing, not stored.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentJson {
    pub id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub author_name: String,
    pub content: String,
    pub is_approved: bool,
    pub created_at: chrono::NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<i64>,
}

impl CommentJson {
    fn from_model(comment: comment_orm::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author_name: comment.author_name,
            content: comment.content,
            is_approved: comment.is_approved,
            created_at: comment.created_at,
            reply_count: None,
        }
    }
}

impl From<CommentWithReplyCount> for CommentJson {
    fn from(listed: CommentWithReplyCount) -> Self {
        let mut json = Self::from_model(listed.comment);
        json.reply_count = Some(listed.reply_count);
        json
    }
}

/// A node of the fully expanded moderation tree.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentTreeJson {
    #[serde(flatten)]
    pub comment: CommentJson,
    pub replies: Vec<CommentTreeJson>,
}

impl From<CommentNode> for CommentTreeJson {
    fn from(node: CommentNode) -> Self {
        Self {
            comment: CommentJson::from_model(node.comment),
            replies: node.replies.into_iter().map(CommentTreeJson::from).collect(),
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentFormData {
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub parent_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateCommentFormData {
    pub author_name: Option<String>,
    pub content: Option<String>,
    pub is_approved: Option<bool>,
}

/// Approved top-level comments for a post, newest first. A post with no
/// comments (or an unknown post id) lists as an empty array.
#[get("/api/blog-posts/{post_id}/comments")]
pub async fn list_top_level_comments(path: web::Path<i32>) -> Result<impl Responder, ApiError> {
    let listed = comments::top_level_for_post(get_db_pool(), path.into_inner()).await?;
    Ok(web::Json(
        listed.into_iter().map(CommentJson::from).collect::<Vec<_>>(),
    ))
}

/// Approved replies to one comment, newest first; the next lazy expansion
/// level. 404 when the comment itself is gone.
#[get("/api/comments/{comment_id}/replies")]
pub async fn list_replies(path: web::Path<i32>) -> Result<impl Responder, ApiError> {
    let listed = comments::replies_for(get_db_pool(), path.into_inner()).await?;
    Ok(web::Json(
        listed.into_iter().map(CommentJson::from).collect::<Vec<_>>(),
    ))
}

/// Anyone may comment; no session is required. Content is stored verbatim,
/// embedded newlines included.
#[post("/api/blog-posts/{post_id}/comments")]
pub async fn create_comment(
    path: web::Path<i32>,
    form: web::Json<NewCommentFormData>,
) -> Result<impl Responder, ApiError> {
    form.validate()
        .map_err(|_| ApiError::Validation("Both name and comment are required".to_string()))?;

    let form = form.into_inner();
    let comment = comments::create(
        get_db_pool(),
        path.into_inner(),
        NewComment {
            author_name: form.author_name,
            content: form.content,
            parent_id: form.parent_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(CommentJson::from_model(comment)))
}

/// The whole comment tree of a post, unapproved included, for the
/// moderation dashboard.
#[get("/api/admin/blog-posts/{post_id}/comments")]
pub async fn view_comment_tree(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ModerateComments)?;

    let tree = comments::tree_for_post(get_db_pool(), path.into_inner()).await?;
    Ok(web::Json(
        tree.into_iter().map(CommentTreeJson::from).collect::<Vec<_>>(),
    ))
}

#[put("/api/admin/comments/{comment_id}")]
pub async fn moderate_comment(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<ModerateCommentFormData>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ModerateComments)?;

    let form = form.into_inner();
    let comment = comments::moderate(
        get_db_pool(),
        path.into_inner(),
        CommentChanges {
            author_name: form.author_name,
            content: form.content,
            is_approved: form.is_approved,
        },
    )
    .await?;

    Ok(web::Json(CommentJson::from_model(comment)))
}

/// Deletes the comment and its whole reply subtree so moderation never
/// leaves dangling replies behind.
#[delete("/api/admin/comments/{comment_id}")]
pub async fn destroy_comment(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    client.require_capability(Capability::ModerateComments)?;

    let removed = comments::delete_with_replies(get_db_pool(), path.into_inner()).await?;
    log::info!("Comment subtree deleted ({} rows)", removed);
    Ok(web::Json(json!({ "message": "Comment deleted successfully" })))
}
