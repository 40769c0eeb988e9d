//! Blog post lifecycle: drafts, publishing, attribution, media URLs
//!
//! Posts have exactly two states, draft and published, and the flag can be
//! flipped freely in either direction by anyone who may edit the post. Every
//! mutation refreshes `updated_at`, including metadata-only edits. There is
//! no version column; concurrent edits resolve as last-write-wins.

use crate::orm::blog_posts::{self, url_list_json};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, QueryFilter, Select};

/// Filters for post listings. `published: None` means "any state" and is
/// only ever passed by capability-checked callers; the public listing always
/// pins it to `Some(true)`.
#[derive(Debug, Default)]
pub struct PostFilters {
    pub search: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
}

/// Input for a new post. The caller decides the initial publish state.
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub author_id: Option<i32>,
    pub author_name: String,
    pub is_published: bool,
    pub is_ai_generated: bool,
}

/// Partial update. Absent fields keep their stored value; URL lists replace
/// the stored list wholesale when present.
#[derive(Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub video_urls: Option<Vec<String>>,
    pub author_id: Option<Option<i32>>,
    pub author_name: Option<String>,
    pub is_published: Option<bool>,
    pub is_ai_generated: Option<bool>,
}

fn apply_filters(
    mut select: Select<blog_posts::Entity>,
    filters: &PostFilters,
) -> Select<blog_posts::Entity> {
    if let Some(published) = filters.published {
        select = select.filter(blog_posts::Column::IsPublished.eq(published));
    }

    if let Some(ref author) = filters.author {
        select = select.filter(blog_posts::Column::AuthorName.eq(author.as_str()));
    }

    if let Some(ref search) = filters.search {
        select = select.filter(
            Condition::any()
                .add(blog_posts::Column::Title.contains(search))
                .add(blog_posts::Column::Content.contains(search)),
        );
    }

    select
}

/// List posts matching the filters, newest first.
pub async fn list(
    db: &DatabaseConnection,
    filters: &PostFilters,
) -> Result<Vec<blog_posts::Model>, DbErr> {
    apply_filters(blog_posts::Entity::find(), filters)
        .order_by_desc(blog_posts::Column::CreatedAt)
        .order_by_desc(blog_posts::Column::Id)
        .all(db)
        .await
}

/// List every post owned by a user regardless of publish state. Ownership
/// matches the author foreign key, or the exact username for legacy rows
/// without one.
pub async fn list_for_owner(
    db: &DatabaseConnection,
    user_id: i32,
    username: &str,
) -> Result<Vec<blog_posts::Model>, DbErr> {
    blog_posts::Entity::find()
        .filter(
            Condition::any()
                .add(blog_posts::Column::AuthorId.eq(user_id))
                .add(
                    Condition::all()
                        .add(blog_posts::Column::AuthorId.is_null())
                        .add(blog_posts::Column::AuthorName.eq(username)),
                ),
        )
        .order_by_desc(blog_posts::Column::CreatedAt)
        .order_by_desc(blog_posts::Column::Id)
        .all(db)
        .await
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<blog_posts::Model>, DbErr> {
    blog_posts::Entity::find_by_id(id).one(db).await
}

pub async fn create(db: &DatabaseConnection, new: NewPost) -> Result<blog_posts::Model, DbErr> {
    let now = Utc::now().naive_utc();

    let post = blog_posts::ActiveModel {
        title: Set(new.title),
        content: Set(new.content),
        excerpt: Set(new.excerpt),
        image_urls: Set(url_list_json(&new.image_urls)),
        video_urls: Set(url_list_json(&new.video_urls)),
        author_id: Set(new.author_id),
        author_name: Set(new.author_name),
        is_published: Set(new.is_published),
        is_ai_generated: Set(new.is_ai_generated),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    post.insert(db).await
}

/// Apply changes to a post. `updated_at` is refreshed unconditionally, even
/// when the change set turns out to be empty.
pub async fn update(
    db: &DatabaseConnection,
    post: blog_posts::Model,
    changes: PostChanges,
) -> Result<blog_posts::Model, DbErr> {
    let mut active: blog_posts::ActiveModel = post.into();

    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(content) = changes.content {
        active.content = Set(content);
    }
    if let Some(excerpt) = changes.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(urls) = changes.image_urls {
        active.image_urls = Set(url_list_json(&urls));
    }
    if let Some(urls) = changes.video_urls {
        active.video_urls = Set(url_list_json(&urls));
    }
    if let Some(author_id) = changes.author_id {
        active.author_id = Set(author_id);
    }
    if let Some(author_name) = changes.author_name {
        active.author_name = Set(author_name);
    }
    if let Some(is_published) = changes.is_published {
        active.is_published = Set(is_published);
    }
    if let Some(is_ai_generated) = changes.is_ai_generated {
        active.is_ai_generated = Set(is_ai_generated);
    }

    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await
}

/// Delete a post and every comment attached to it. Terminal; there is no
/// archive or undo.
pub async fn delete(db: &DatabaseConnection, post: blog_posts::Model) -> Result<(), DbErr> {
    crate::comments::delete_for_post(db, post.id).await?;
    blog_posts::Entity::delete_many()
        .filter(blog_posts::Column::Id.eq(post.id))
        .exec(db)
        .await?;
    Ok(())
}
