use super::error::ApiError;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users::{self, Role};
use crate::permission;
use crate::session;
use crate::user::Profile;
use actix_web::{get, post, web, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_login)
        .service(post_logout)
        .service(view_current_user);
}

#[derive(Deserialize)]
pub struct LoginFormData {
    username: String,
    password: String,
}

/// The user shape returned to clients; never includes the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub is_approved: bool,
}

impl From<&Profile> for SessionUser {
    fn from(user: &Profile) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_approved: user.is_approved,
        }
    }
}

impl From<&users::Model> for SessionUser {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_approved: user.is_approved,
        }
    }
}

#[post("/api/auth/login")]
pub async fn post_login(
    cookies: actix_session::Session,
    form: web::Json<LoginFormData>,
) -> Result<impl Responder, ApiError> {
    let db = get_db_pool();
    let username = form.username.trim();
    let password = form.password.trim();

    let user = match crate::user::get_user_by_name(db, username).await? {
        Some(user) => user,
        // Generic message to avoid username enumeration
        None => return Err(ApiError::InvalidCredentials),
    };

    if !session::verify_password(password, &user.password) {
        log::debug!("login failure: bad password for {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    let profile = Profile::from(user);
    if !permission::can_author(Some(&profile)) {
        log::debug!("login rejected: account pending approval: {}", username);
        return Err(ApiError::Forbidden("Account pending approval"));
    }

    session::remember(&cookies, profile.id)
        .map_err(|e| ApiError::Internal(format!("Failed to persist session: {}", e)))?;

    log::info!("User logged in: {} (user_id: {})", profile.username, profile.id);
    Ok(web::Json(SessionUser::from(&profile)))
}

#[post("/api/auth/logout")]
pub async fn post_logout(cookies: actix_session::Session) -> impl Responder {
    session::forget(&cookies);
    web::Json(json!({ "message": "Logged out" }))
}

#[get("/api/user")]
pub async fn view_current_user(client: ClientCtx) -> Result<impl Responder, ApiError> {
    let user = client.require_login()?;
    Ok(web::Json(SessionUser::from(user)))
}
