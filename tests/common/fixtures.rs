//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use chrono::Utc;
use greenhouse::orm::users::Role;
use greenhouse::orm::{blog_posts, comments, staff, users};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

/// Test user fixture
pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub password: String, // Plain text password for testing
}

async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Role,
    is_approved: bool,
) -> Result<TestUser, DbErr> {
    let password_hash = greenhouse::session::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;
    let now = Utc::now().naive_utc();

    let user = users::ActiveModel {
        username: Set(username.to_string()),
        password: Set(password_hash),
        role: Set(role),
        is_approved: Set(is_approved),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let user_model = user.insert(db).await?;

    Ok(TestUser {
        id: user_model.id,
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Create an approved regular user with known credentials
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    insert_user(db, username, password, Role::User, true).await
}

/// Create a user still waiting in the approval queue
pub async fn create_pending_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    insert_user(db, username, password, Role::User, false).await
}

/// Create an admin user
pub async fn create_admin_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<TestUser, DbErr> {
    insert_user(db, username, password, Role::Admin, true).await
}

/// Load a user's profile the way the session middleware would
pub async fn load_profile(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<greenhouse::user::Profile, DbErr> {
    greenhouse::user::Profile::get_by_id(db, user_id)
        .await?
        .ok_or_else(|| DbErr::Custom("User not found".to_string()))
}

/// Create a test blog post
pub async fn create_test_post(
    db: &DatabaseConnection,
    author_id: Option<i32>,
    author_name: &str,
    title: &str,
    is_published: bool,
) -> Result<blog_posts::Model, DbErr> {
    let now = Utc::now().naive_utc();

    let post = blog_posts::ActiveModel {
        title: Set(title.to_string()),
        content: Set(format!("Content of {}", title)),
        excerpt: Set(format!("Excerpt of {}", title)),
        image_urls: Set(None),
        video_urls: Set(None),
        author_id: Set(author_id),
        author_name: Set(author_name.to_string()),
        is_published: Set(is_published),
        is_ai_generated: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    post.insert(db).await
}

/// Create a test comment, optionally as a reply and with an explicit
/// creation time for ordering tests
pub async fn create_test_comment(
    db: &DatabaseConnection,
    post_id: i32,
    parent_id: Option<i32>,
    author_name: &str,
    content: &str,
    created_at: Option<chrono::NaiveDateTime>,
) -> Result<comments::Model, DbErr> {
    let comment = comments::ActiveModel {
        post_id: Set(post_id),
        parent_id: Set(parent_id),
        author_name: Set(author_name.to_string()),
        content: Set(content.to_string()),
        is_approved: Set(true),
        created_at: Set(created_at.unwrap_or_else(|| Utc::now().naive_utc())),
        ..Default::default()
    };
    comment.insert(db).await
}

/// Create a test staff profile
pub async fn create_test_staff(
    db: &DatabaseConnection,
    user_id: Option<i32>,
    name: &str,
) -> Result<staff::Model, DbErr> {
    let profile = staff::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        role: Set("Program Coordinator".to_string()),
        bio: Set(format!("{} helps students launch ventures.", name)),
        image_url: Set(None),
        email: Set(None),
        linkedin_url: Set(None),
        is_active: Set(true),
        ..Default::default()
    };
    profile.insert(db).await
}
