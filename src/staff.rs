//! Staff directory: profiles, soft deletion, the one-active-profile rule

use crate::orm::staff;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, QueryFilter};

#[derive(Debug)]
pub enum ProfileError {
    /// Referenced profile does not exist
    NotFound,
    /// The owning user already has an active profile
    DuplicateActiveProfile,
    Db(DbErr),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::NotFound => write!(f, "Staff member not found"),
            ProfileError::DuplicateActiveProfile => {
                write!(f, "An active staff profile already exists for this user")
            }
            ProfileError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<DbErr> for ProfileError {
    fn from(e: DbErr) -> Self {
        ProfileError::Db(e)
    }
}

pub struct NewProfile {
    pub user_id: Option<i32>,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub linkedin_url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// The public directory: active profiles only, oldest entry first.
pub async fn list_active(db: &DatabaseConnection) -> Result<Vec<staff::Model>, DbErr> {
    staff::Entity::find_active()
        .order_by_asc(staff::Column::Id)
        .all(db)
        .await
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<staff::Model>, DbErr> {
    staff::Entity::find_by_id(id).one(db).await
}

pub async fn find_active_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<staff::Model>, DbErr> {
    staff::Entity::find_active()
        .filter(staff::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Create a profile. A linked user may hold at most one active profile;
/// unlinked directory entries are not limited.
pub async fn create(db: &DatabaseConnection, new: NewProfile) -> Result<staff::Model, ProfileError> {
    if let Some(user_id) = new.user_id {
        if find_active_for_user(db, user_id).await?.is_some() {
            return Err(ProfileError::DuplicateActiveProfile);
        }
    }

    let profile = staff::ActiveModel {
        user_id: Set(new.user_id),
        name: Set(new.name),
        role: Set(new.role),
        bio: Set(new.bio),
        image_url: Set(new.image_url),
        email: Set(new.email),
        linkedin_url: Set(new.linkedin_url),
        is_active: Set(true),
        ..Default::default()
    };

    Ok(profile.insert(db).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    profile: staff::Model,
    changes: ProfileChanges,
) -> Result<staff::Model, ProfileError> {
    // Reactivating through an update must not break the one-active rule.
    if changes.is_active == Some(true) && !profile.is_active {
        if let Some(user_id) = profile.user_id {
            if let Some(existing) = find_active_for_user(db, user_id).await? {
                if existing.id != profile.id {
                    return Err(ProfileError::DuplicateActiveProfile);
                }
            }
        }
    }

    let mut active: staff::ActiveModel = profile.into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(role) = changes.role {
        active.role = Set(role);
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(bio);
    }
    if let Some(image_url) = changes.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(linkedin_url) = changes.linkedin_url {
        active.linkedin_url = Set(linkedin_url);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }

    Ok(active.update(db).await?)
}

/// Soft-delete: flip `is_active` off and keep the row. Deactivating an
/// already-inactive profile succeeds and leaves it inactive.
pub async fn deactivate(
    db: &DatabaseConnection,
    profile: staff::Model,
) -> Result<staff::Model, DbErr> {
    let mut active: staff::ActiveModel = profile.into();
    active.is_active = Set(false);
    active.update(db).await
}
