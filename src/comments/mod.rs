//! Comment threading engine
//!
//! Comments form a reply tree scoped to a single post. The public contract
//! is lazy per-level expansion: one query for the top level, one query per
//! expanded comment for its replies. A breadth-first subtree walk exists for
//! moderation views and cascade deletion only.
//!
//! Within a sibling group ordering is newest-created-first. Ties on the
//! timestamp fall back to the id so pagination stays deterministic.

use crate::orm::{blog_posts, comments};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, FromQueryResult, QueryFilter, Select};
use std::collections::{HashMap, HashSet};

/// Errors from comment creation and moderation.
#[derive(Debug)]
pub enum ThreadError {
    /// The target post does not exist
    PostNotFound,
    /// The referenced parent comment does not exist
    ParentNotFound,
    /// The referenced comment does not exist
    CommentNotFound,
    /// The parent comment belongs to a different post
    ParentPostMismatch,
    Db(DbErr),
}

impl std::fmt::Display for ThreadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadError::PostNotFound => write!(f, "Blog post not found"),
            ThreadError::ParentNotFound => write!(f, "Parent comment not found"),
            ThreadError::CommentNotFound => write!(f, "Comment not found"),
            ThreadError::ParentPostMismatch => {
                write!(f, "Parent comment belongs to a different post")
            }
            ThreadError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ThreadError {}

impl From<DbErr> for ThreadError {
    fn from(e: DbErr) -> Self {
        ThreadError::Db(e)
    }
}

/// Input for a new comment. `parent_id` of None creates a top-level comment.
pub struct NewComment {
    pub author_name: String,
    pub content: String,
    pub parent_id: Option<i32>,
}

/// A comment paired with its visible-reply count.
pub struct CommentWithReplyCount {
    pub comment: comments::Model,
    pub reply_count: i64,
}

/// A node in the fully expanded moderation tree.
pub struct CommentNode {
    pub comment: comments::Model,
    pub replies: Vec<CommentNode>,
}

fn newest_first(select: Select<comments::Entity>) -> Select<comments::Entity> {
    select
        .order_by_desc(comments::Column::CreatedAt)
        .order_by_desc(comments::Column::Id)
}

/// List approved top-level comments for a post, newest first, each with the
/// number of approved direct replies. The count is computed per listing, not
/// stored.
pub async fn top_level_for_post(
    db: &DatabaseConnection,
    post_id: i32,
) -> Result<Vec<CommentWithReplyCount>, DbErr> {
    let top = newest_first(
        comments::Entity::find()
            .filter(comments::Column::PostId.eq(post_id))
            .filter(comments::Column::ParentId.is_null())
            .filter(comments::Column::IsApproved.eq(true)),
    )
    .all(db)
    .await?;

    let counts = reply_counts(db, top.iter().map(|c| c.id).collect()).await?;

    Ok(top
        .into_iter()
        .map(|comment| {
            let reply_count = counts.get(&comment.id).copied().unwrap_or(0);
            CommentWithReplyCount {
                comment,
                reply_count,
            }
        })
        .collect())
}

/// List approved replies to a comment, newest first. Returns
/// `CommentNotFound` when the parent itself is gone, so a stale id surfaces
/// as a 404 instead of an empty list.
pub async fn replies_for(
    db: &DatabaseConnection,
    comment_id: i32,
) -> Result<Vec<CommentWithReplyCount>, ThreadError> {
    let parent = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ThreadError::CommentNotFound)?;

    let replies = newest_first(
        comments::Entity::find()
            .filter(comments::Column::PostId.eq(parent.post_id))
            .filter(comments::Column::ParentId.eq(parent.id))
            .filter(comments::Column::IsApproved.eq(true)),
    )
    .all(db)
    .await?;

    let counts = reply_counts(db, replies.iter().map(|c| c.id).collect()).await?;

    Ok(replies
        .into_iter()
        .map(|comment| {
            let reply_count = counts.get(&comment.id).copied().unwrap_or(0);
            CommentWithReplyCount {
                comment,
                reply_count,
            }
        })
        .collect())
}

#[derive(FromQueryResult)]
struct ReplyCountRow {
    parent_id: i32,
    reply_count: i64,
}

/// Count approved direct replies for each of the given comment ids.
async fn reply_counts(
    db: &DatabaseConnection,
    parent_ids: Vec<i32>,
) -> Result<HashMap<i32, i64>, DbErr> {
    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = comments::Entity::find()
        .select_only()
        .column(comments::Column::ParentId)
        .column_as(comments::Column::Id.count(), "reply_count")
        .filter(comments::Column::ParentId.is_in(parent_ids))
        .filter(comments::Column::IsApproved.eq(true))
        .group_by(comments::Column::ParentId)
        .into_model::<ReplyCountRow>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.parent_id, row.reply_count))
        .collect())
}

/// Create a comment on a post, optionally as a reply.
///
/// The post must exist. When a parent id is given, the parent must exist and
/// belong to the same post; cross-post and dangling parents are rejected
/// instead of silently stored.
pub async fn create(
    db: &DatabaseConnection,
    post_id: i32,
    new: NewComment,
) -> Result<comments::Model, ThreadError> {
    blog_posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(ThreadError::PostNotFound)?;

    if let Some(parent_id) = new.parent_id {
        let parent = comments::Entity::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or(ThreadError::ParentNotFound)?;

        if parent.post_id != post_id {
            return Err(ThreadError::ParentPostMismatch);
        }
    }

    let comment = comments::ActiveModel {
        post_id: Set(post_id),
        parent_id: Set(new.parent_id),
        author_name: Set(new.author_name),
        content: Set(new.content),
        is_approved: Set(true),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    Ok(comment.insert(db).await?)
}

/// Moderation update: edit content, author name or the approval flag.
pub struct CommentChanges {
    pub author_name: Option<String>,
    pub content: Option<String>,
    pub is_approved: Option<bool>,
}

pub async fn moderate(
    db: &DatabaseConnection,
    comment_id: i32,
    changes: CommentChanges,
) -> Result<comments::Model, ThreadError> {
    let comment = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ThreadError::CommentNotFound)?;

    let mut active: comments::ActiveModel = comment.into();
    if let Some(author_name) = changes.author_name {
        active.author_name = Set(author_name);
    }
    if let Some(content) = changes.content {
        active.content = Set(content);
    }
    if let Some(is_approved) = changes.is_approved {
        active.is_approved = Set(is_approved);
    }

    Ok(active.update(db).await?)
}

/// Collect every descendant of a comment, level by level. Approval state is
/// ignored here: moderation needs the whole structure. A visited set guards
/// against parent cycles in pre-validation data.
pub async fn fetch_subtree(
    db: &DatabaseConnection,
    root_id: i32,
) -> Result<Vec<comments::Model>, DbErr> {
    let mut collected = Vec::new();
    let mut visited: HashSet<i32> = HashSet::from([root_id]);
    let mut frontier = vec![root_id];

    while !frontier.is_empty() {
        let level = comments::Entity::find()
            .filter(comments::Column::ParentId.is_in(frontier))
            .all(db)
            .await?;

        frontier = level
            .iter()
            .filter(|c| visited.insert(c.id))
            .map(|c| c.id)
            .collect();
        collected.extend(level.into_iter().filter(|c| frontier.contains(&c.id)));
    }

    Ok(collected)
}

/// Delete a comment together with its entire reply subtree, so moderation
/// can never leave orphaned replies behind. Returns the number of rows
/// removed.
pub async fn delete_with_replies(
    db: &DatabaseConnection,
    comment_id: i32,
) -> Result<u64, ThreadError> {
    let comment = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ThreadError::CommentNotFound)?;

    let mut ids: Vec<i32> = fetch_subtree(db, comment.id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.push(comment.id);

    let res = comments::Entity::delete_many()
        .filter(comments::Column::Id.is_in(ids))
        .exec(db)
        .await?;

    Ok(res.rows_affected)
}

/// Remove every comment attached to a post. Used when the post itself is
/// deleted.
pub async fn delete_for_post(db: &DatabaseConnection, post_id: i32) -> Result<u64, DbErr> {
    let res = comments::Entity::delete_many()
        .filter(comments::Column::PostId.eq(post_id))
        .exec(db)
        .await?;

    Ok(res.rows_affected)
}

/// Build the fully expanded tree of all comments on a post, approved or not,
/// for the moderation dashboard. One query, assembled in memory.
pub async fn tree_for_post(
    db: &DatabaseConnection,
    post_id: i32,
) -> Result<Vec<CommentNode>, DbErr> {
    let all = newest_first(comments::Entity::find().filter(comments::Column::PostId.eq(post_id)))
        .all(db)
        .await?;

    let mut children: HashMap<Option<i32>, Vec<comments::Model>> = HashMap::new();
    for comment in all {
        children.entry(comment.parent_id).or_default().push(comment);
    }

    fn build(
        parent: Option<i32>,
        children: &mut HashMap<Option<i32>, Vec<comments::Model>>,
    ) -> Vec<CommentNode> {
        children
            .remove(&parent)
            .unwrap_or_default()
            .into_iter()
            .map(|comment| {
                let replies = build(Some(comment.id), children);
                CommentNode { comment, replies }
            })
            .collect()
    }

    Ok(build(None, &mut children))
}
