use super::error::ApiError;
use super::uploads::{collect_multipart, store_files, UploadForm};
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::staff as staff_orm;
use crate::permission::Capability;
use crate::staff::{self, NewProfile, ProfileChanges};
use crate::storage::{MediaKind, StorageBackend};
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_staff)
        .service(create_staff)
        .service(update_staff)
        .service(destroy_staff);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffJson {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_active: bool,
}

impl From<staff_orm::Model> for StaffJson {
    fn from(profile: staff_orm::Model) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            name: profile.name,
            role: profile.role,
            bio: profile.bio,
            image_url: profile.image_url,
            email: profile.email,
            linkedin_url: profile.linkedin_url,
            is_active: profile.is_active,
        }
    }
}

#[derive(Validate)]
struct StaffInput {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(length(min = 1, max = 255))]
    role: String,
    #[validate(length(min = 1))]
    bio: String,
}

/// Resolve the uploaded or referenced profile image. A freshly uploaded
/// file wins over an `imageUrl` text field.
async fn resolve_image(
    form: &mut UploadForm,
    storage: &dyn StorageBackend,
) -> Result<Option<String>, ApiError> {
    if form.images.is_empty() {
        return Ok(form.text("imageUrl"));
    }

    let files = std::mem::take(&mut form.images);
    let mut urls = store_files(storage, files, MediaKind::Image).await?;
    Ok(urls.pop())
}

/// The public staff directory: active profiles only.
#[get("/api/staff")]
pub async fn list_staff() -> Result<impl Responder, ApiError> {
    let profiles = staff::list_active(get_db_pool()).await?;
    Ok(web::Json(
        profiles.into_iter().map(StaffJson::from).collect::<Vec<_>>(),
    ))
}

/// An approved user creates a profile for themselves; capability holders may
/// create one for anyone, or an unlinked directory entry.
#[post("/api/staff")]
pub async fn create_staff(
    client: ClientCtx,
    payload: Multipart,
    storage: web::Data<dyn StorageBackend>,
) -> Result<impl Responder, ApiError> {
    let user_id = {
        let user = client.require_approved_author()?;
        user.id
    };
    let db = get_db_pool();

    let mut form = collect_multipart(payload).await?;

    let input = StaffInput {
        name: form.text("name").unwrap_or_default(),
        role: form.text("role").unwrap_or_default(),
        bio: form.raw("bio").unwrap_or_default(),
    };
    input
        .validate()
        .map_err(|_| ApiError::Validation("Name, role and bio are required".to_string()))?;

    let owner = if client.can(Capability::ManageAnyStaff) {
        form.int("userId")
    } else {
        Some(user_id)
    };

    let image_url = resolve_image(&mut form, storage.get_ref()).await?;

    let profile = staff::create(
        db,
        NewProfile {
            user_id: owner,
            name: input.name,
            role: input.role,
            bio: input.bio,
            image_url,
            email: form.text("email"),
            linkedin_url: form.text("linkedinUrl"),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(StaffJson::from(profile)))
}

#[put("/api/staff/{staff_id}")]
pub async fn update_staff(
    client: ClientCtx,
    path: web::Path<i32>,
    payload: Multipart,
    storage: web::Data<dyn StorageBackend>,
) -> Result<impl Responder, ApiError> {
    client.require_login()?;
    let db = get_db_pool();

    let profile = staff::find(db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Staff member not found"))?;

    if !client.can_modify_staff(&profile) {
        return Err(ApiError::Forbidden(
            "You do not have permission to update this staff profile",
        ));
    }

    let mut form = collect_multipart(payload).await?;

    let mut changes = ProfileChanges {
        name: form.text("name"),
        role: form.text("role"),
        bio: form.raw("bio").filter(|b| !b.is_empty()),
        is_active: form.flag("isActive"),
        ..Default::default()
    };

    // A present-but-empty field clears the stored value
    if form.has("email") {
        changes.email = Some(form.text("email"));
    }
    if form.has("linkedinUrl") {
        changes.linkedin_url = Some(form.text("linkedinUrl"));
    }
    if !form.images.is_empty() || form.has("imageUrl") {
        changes.image_url = Some(resolve_image(&mut form, storage.get_ref()).await?);
    }

    let profile = staff::update(db, profile, changes).await?;
    Ok(web::Json(StaffJson::from(profile)))
}

/// Soft delete. Deactivating an already-inactive profile succeeds and keeps
/// it inactive.
#[delete("/api/staff/{staff_id}")]
pub async fn destroy_staff(
    client: ClientCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    client.require_login()?;
    let db = get_db_pool();

    let profile = staff::find(db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Staff member not found"))?;

    if !client.can_modify_staff(&profile) {
        return Err(ApiError::Forbidden(
            "You do not have permission to remove this staff profile",
        ));
    }

    staff::deactivate(db, profile).await?;
    Ok(web::Json(json!({ "message": "Staff member deleted successfully" })))
}
