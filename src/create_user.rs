use crate::db::get_db_pool;
use crate::user;
use crate::web::error::ApiError;
use crate::web::login::SessionUser;
use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RegisterFormData {
    #[validate(length(min = 1, max = 255))]
    username: String,
    #[validate(length(min = 8, max = 1000))]
    password: String,
}

/// Register a new account. Accounts start unapproved and are not logged in;
/// an administrator reviews the approval queue.
#[post("/api/auth/register")]
pub async fn register(form: web::Json<RegisterFormData>) -> Result<impl Responder, ApiError> {
    // Sanitize inputs
    let username = form.username.trim();
    let password = form.password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    form.validate().map_err(|e| {
        log::debug!("User registration validation failed: {}", e);
        ApiError::Validation("Invalid registration data".to_string())
    })?;

    let account = user::register(get_db_pool(), username, password).await?;

    log::info!("New user registered: {} (user_id: {})", account.username, account.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Registration successful. Your account is pending approval from an administrator.",
        "user": SessionUser::from(&account),
    })))
}
