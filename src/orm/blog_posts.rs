//! SeaORM Entity for blog_posts table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    /// Ordered JSON array of image URLs, null when the post has none
    #[sea_orm(nullable)]
    pub image_urls: Option<Json>,
    /// Ordered JSON array of video URLs, null when the post has none
    #[sea_orm(nullable)]
    pub video_urls: Option<Json>,
    /// Accountable author. Nullable because legacy rows carried only the
    /// denormalized name; authorization prefers this and falls back to
    /// name matching for rows where it is unset.
    pub author_id: Option<i32>,
    /// Display name for rendering, kept even when `author_id` is set
    pub author_name: String,
    pub is_published: bool,
    pub is_ai_generated: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Model {
    pub fn image_url_list(&self) -> Vec<String> {
        url_list(&self.image_urls)
    }

    pub fn video_url_list(&self) -> Vec<String> {
        url_list(&self.video_urls)
    }
}

fn url_list(value: &Option<Json>) -> Vec<String> {
    value
        .as_ref()
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Encode a URL list for storage. Empty lists are stored as null so a post
/// without media reads back with an absent list, not `[]`.
pub fn url_list_json(urls: &[String]) -> Option<Json> {
    if urls.is_empty() {
        None
    } else {
        Some(serde_json::json!(urls))
    }
}

impl ActiveModelBehavior for ActiveModel {}
