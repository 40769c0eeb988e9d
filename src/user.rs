//! User accounts: profiles, registration, approval, deletion, seeding

use crate::constants::BOOTSTRAP_ADMIN_USERNAME;
use crate::orm::users::Role;
use crate::orm::{blog_posts, staff, users};
use chrono::Utc;
use sea_orm::{entity::*, query::*, sea_query::Expr, DatabaseConnection, DbErr, QueryFilter};

/// Errors from account management operations.
#[derive(Debug)]
pub enum AccountError {
    /// Username is already registered
    UsernameTaken,
    /// Referenced user does not exist
    NotFound,
    /// The bootstrap admin account may not be deleted
    ProtectedAccount,
    /// Password hashing failed
    Hash(argon2::password_hash::Error),
    Db(DbErr),
}

impl std::fmt::Display for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountError::UsernameTaken => write!(f, "Username already exists"),
            AccountError::NotFound => write!(f, "User not found"),
            AccountError::ProtectedAccount => {
                write!(f, "The bootstrap admin account cannot be deleted")
            }
            AccountError::Hash(e) => write!(f, "Password hashing failed: {}", e),
            AccountError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<DbErr> for AccountError {
    fn from(e: DbErr) -> Self {
        AccountError::Db(e)
    }
}

/// The authenticated client handed to every authorization check.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub is_approved: bool,
}

impl From<users::Model> for Profile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            is_approved: user.is_approved,
        }
    }
}

impl Profile {
    pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr> {
        Ok(users::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Profile::from))
    }
}

pub async fn get_user_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(name))
        .one(db)
        .await
}

pub async fn get_user_id_from_name(db: &DatabaseConnection, name: &str) -> Option<i32> {
    get_user_by_name(db, name)
        .await
        .unwrap_or(None)
        .map(|user| user.id)
}

/// Register a new account. Registrations always start as unapproved regular
/// users; an admin flips the flag later.
pub async fn register(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<users::Model, AccountError> {
    if get_user_by_name(db, username).await?.is_some() {
        return Err(AccountError::UsernameTaken);
    }

    let hash = crate::session::hash_password(password).map_err(AccountError::Hash)?;
    let now = Utc::now().naive_utc();

    let user = users::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(hash),
        role: Set(Role::User),
        is_approved: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(user.insert(db).await?)
}

/// Approve a pending account. Approving an already-approved account is a
/// no-op that still succeeds.
pub async fn approve(db: &DatabaseConnection, user_id: i32) -> Result<users::Model, AccountError> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AccountError::NotFound)?;

    let mut active: users::ActiveModel = user.into();
    active.is_approved = Set(true);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Delete an account, detaching content it owns. Posts keep their
/// denormalized author name; staff profiles lose the login link but stay in
/// the directory.
pub async fn delete(db: &DatabaseConnection, user_id: i32) -> Result<(), AccountError> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AccountError::NotFound)?;

    if user.username == BOOTSTRAP_ADMIN_USERNAME {
        return Err(AccountError::ProtectedAccount);
    }

    blog_posts::Entity::update_many()
        .col_expr(blog_posts::Column::AuthorId, Expr::value(Option::<i32>::None))
        .filter(blog_posts::Column::AuthorId.eq(user_id))
        .exec(db)
        .await?;

    staff::Entity::update_many()
        .col_expr(staff::Column::UserId, Expr::value(Option::<i32>::None))
        .filter(staff::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    users::Entity::delete_many()
        .filter(users::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Seed the bootstrap admin account and a sample staff profile so a fresh
/// deployment has a working login and a non-empty directory.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    if get_user_by_name(db, BOOTSTRAP_ADMIN_USERNAME).await?.is_some() {
        log::debug!("Bootstrap admin already exists");
        return Ok(());
    }

    let hash = crate::session::hash_password("admin123")
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    let now = Utc::now().naive_utc();

    let admin = users::ActiveModel {
        username: Set(BOOTSTRAP_ADMIN_USERNAME.to_owned()),
        password: Set(hash),
        role: Set(Role::Admin),
        is_approved: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Bootstrap admin created (user_id: {}). Change the default password after first login.",
        admin.id
    );

    let staff_count = staff::Entity::find().count(db).await?;
    if staff_count == 0 {
        staff::ActiveModel {
            user_id: Set(Some(admin.id)),
            name: Set("Admin User".to_owned()),
            role: Set("Administrator".to_owned()),
            bio: Set("System Administrator".to_owned()),
            image_url: Set(None),
            email: Set(Some("admin@example.com".to_owned())),
            linkedin_url: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        log::info!("Sample staff member created");
    }

    Ok(())
}
