use super::error::ApiError;
use super::uploads::{collect_multipart, store_files, UploadForm};
use crate::blog::{self, NewPost, PostChanges, PostFilters};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::blog_posts;
use crate::permission::Capability;
use crate::storage::{MediaKind, StorageBackend};
use crate::user::get_user_id_from_name;
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_posts)
        .service(list_own_posts)
        .service(view_post)
        .service(create_post)
        .service(update_post)
        .service(destroy_post);
}

/// A blog post as returned to clients. URL lists always serialize as arrays
/// in stored order; a post without media gets empty arrays.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJson {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub author_id: Option<i32>,
    pub author_name: String,
    pub is_published: bool,
    pub is_ai_generated: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<blog_posts::Model> for PostJson {
    fn from(post: blog_posts::Model) -> Self {
        Self {
            image_urls: post.image_url_list(),
            video_urls: post.video_url_list(),
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            author_id: post.author_id,
            author_name: post.author_name,
            is_published: post.is_published,
            is_ai_generated: post.is_ai_generated,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct PostListQuery {
    pub search: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
}

#[derive(Validate)]
struct PostInput {
    #[validate(length(min = 1, max = 255))]
    title: String,
    #[validate(length(min = 1))]
    content: String,
    #[validate(length(min = 1, max = 1000))]
    excerpt: String,
}

fn post_vec_json(posts: Vec<blog_posts::Model>) -> Vec<PostJson> {
    posts.into_iter().map(PostJson::from).collect()
}

/// Public listing. Guests only ever see published posts; callers holding
/// the capability may ask for drafts through the `published` filter.
#[get("/api/blog-posts")]
pub async fn list_posts(
    client: ClientCtx,
    query: web::Query<PostListQuery>,
) -> Result<impl Responder, ApiError> {
    let published = if client.can(Capability::ViewUnpublished) {
        match query.published.as_deref() {
            None | Some("all") => None,
            Some(value) => value.parse::<bool>().ok(),
        }
    } else {
        Some(true)
    };

    let filters = PostFilters {
        search: query.search.clone(),
        author: query.author.clone(),
        published,
    };

    let posts = blog::list(get_db_pool(), &filters).await?;
    Ok(web::Json(post_vec_json(posts)))
}

/// Every post the caller owns, drafts included, for the user dashboard.
#[get("/api/blog-posts/mine")]
pub async fn list_own_posts(client: ClientCtx) -> Result<impl Responder, ApiError> {
    let user = client.require_login()?;
    let posts = blog::list_for_owner(get_db_pool(), user.id, &user.username).await?;
    Ok(web::Json(post_vec_json(posts)))
}

/// Post detail. Drafts read as 404 for anyone who is neither the owner nor
/// allowed to view unpublished posts, so their existence is not revealed.
#[get("/api/blog-posts/{post_id}")]
pub async fn view_post(client: ClientCtx, path: web::Path<i32>) -> Result<impl Responder, ApiError> {
    let post = blog::find(get_db_pool(), path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Blog post not found"))?;

    if !post.is_published
        && !client.can(Capability::ViewUnpublished)
        && !client.can_modify_post(&post)
    {
        return Err(ApiError::NotFound("Blog post not found"));
    }

    Ok(web::Json(PostJson::from(post)))
}

/// Resolve who the new post is attributed to. Capability holders may credit
/// any display name; everyone else publishes as themselves.
async fn resolve_attribution(
    client: &ClientCtx,
    form: &UploadForm,
) -> Result<(Option<i32>, String), ApiError> {
    let user = client.require_approved_author()?;

    if client.can(Capability::ManageAnyPost) {
        if let Some(name) = form.text("authorName") {
            if name != user.username {
                let author_id = get_user_id_from_name(get_db_pool(), &name).await;
                return Ok((author_id, name));
            }
        }
    }

    Ok((Some(user.id), user.username.clone()))
}

#[post("/api/blog-posts")]
pub async fn create_post(
    client: ClientCtx,
    payload: Multipart,
    storage: web::Data<dyn StorageBackend>,
) -> Result<impl Responder, ApiError> {
    client.require_approved_author()?;
    let db = get_db_pool();

    let mut form = collect_multipart(payload).await?;

    let input = PostInput {
        title: form.text("title").unwrap_or_default(),
        content: form.raw("content").unwrap_or_default(),
        excerpt: form.text("excerpt").unwrap_or_default(),
    };
    input
        .validate()
        .map_err(|_| ApiError::Validation("Title, content and excerpt are required".to_string()))?;

    let (author_id, author_name) = resolve_attribution(&client, &form).await?;
    let is_published = form.flag("isPublished").unwrap_or(false);
    let is_ai_generated = form.flag("isAiGenerated").unwrap_or(false);

    let images = std::mem::take(&mut form.images);
    let videos = std::mem::take(&mut form.videos);
    let image_urls = store_files(storage.get_ref(), images, MediaKind::Image).await?;
    let video_urls = store_files(storage.get_ref(), videos, MediaKind::Video).await?;

    let post = blog::create(
        db,
        NewPost {
            title: input.title,
            content: input.content,
            excerpt: input.excerpt,
            image_urls,
            video_urls,
            author_id,
            author_name,
            is_published,
            is_ai_generated,
        },
    )
    .await?;

    log::info!("Blog post created: {} ({:?})", post.id, post.title);
    Ok(HttpResponse::Created().json(PostJson::from(post)))
}

#[put("/api/blog-posts/{post_id}")]
pub async fn update_post(
    client: ClientCtx,
    path: web::Path<i32>,
    payload: Multipart,
    storage: web::Data<dyn StorageBackend>,
) -> Result<impl Responder, ApiError> {
    client.require_login()?;
    let db = get_db_pool();

    let post = blog::find(db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Blog post not found"))?;

    if !client.can_modify_post(&post) {
        return Err(ApiError::Forbidden(
            "You do not have permission to update this post",
        ));
    }

    let mut form = collect_multipart(payload).await?;

    let mut changes = PostChanges {
        title: form.text("title"),
        content: form.raw("content").filter(|c| !c.is_empty()),
        excerpt: form.text("excerpt"),
        is_published: form.flag("isPublished"),
        is_ai_generated: form.flag("isAiGenerated"),
        ..Default::default()
    };

    // Re-attribution is reserved for capability holders
    if client.can(Capability::ManageAnyPost) {
        if let Some(name) = form.text("authorName") {
            changes.author_id = Some(get_user_id_from_name(db, &name).await);
            changes.author_name = Some(name);
        }
    }

    // Freshly uploaded files replace the stored list of their kind
    if !form.images.is_empty() {
        let images = std::mem::take(&mut form.images);
        changes.image_urls = Some(store_files(storage.get_ref(), images, MediaKind::Image).await?);
    }
    if !form.videos.is_empty() {
        let videos = std::mem::take(&mut form.videos);
        changes.video_urls = Some(store_files(storage.get_ref(), videos, MediaKind::Video).await?);
    }

    let post = blog::update(db, post, changes).await?;
    Ok(web::Json(PostJson::from(post)))
}

#[delete("/api/blog-posts/{post_id}")]
pub async fn destroy_post(client: ClientCtx, path: web::Path<i32>) -> Result<impl Responder, ApiError> {
    client.require_login()?;
    let db = get_db_pool();

    let post = blog::find(db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Blog post not found"))?;

    if !client.can_modify_post(&post) {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this post",
        ));
    }

    blog::delete(db, post).await?;
    Ok(web::Json(json!({ "message": "Blog post deleted successfully" })))
}
