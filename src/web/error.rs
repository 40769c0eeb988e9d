//! JSON API errors.
//!
//! Every failure surfaces as `{"message": "..."}` plus a status code from
//! the fixed taxonomy: 400 validation, 401 authentication, 403
//! authorization, 404 missing resource, 502 upstream collaborator, 500
//! everything else. Errors are terminal per request; nothing retries.

use crate::comments::ThreadError;
use crate::generator::GeneratorError;
use crate::staff::ProfileError;
use crate::storage::StorageError;
use crate::user::AccountError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing required fields
    Validation(String),
    /// Referenced resource does not exist
    NotFound(&'static str),
    /// No session on a gated route
    AuthenticationRequired,
    /// Login rejected
    InvalidCredentials,
    /// Authenticated but insufficient role/ownership/approval
    Forbidden(&'static str),
    /// Media storage or content generation failed
    Upstream(String),
    Database(DbErr),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::AuthenticationRequired => write!(f, "Authentication required"),
            ApiError::InvalidCredentials => write!(f, "Invalid username or password"),
            ApiError::Forbidden(msg) => write!(f, "{}", msg),
            ApiError::Upstream(msg) => write!(f, "{}", msg),
            // Internal detail stays in the log, not the response
            ApiError::Database(_) | ApiError::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AuthenticationRequired | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Database(e) => log::error!("Database error: {}", e),
            ApiError::Internal(msg) => log::error!("Internal error: {}", msg),
            ApiError::Upstream(msg) => log::warn!("Upstream collaborator failure: {}", msg),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        ApiError::Database(e)
    }
}

impl From<ThreadError> for ApiError {
    fn from(e: ThreadError) -> Self {
        match e {
            ThreadError::PostNotFound => ApiError::NotFound("Blog post not found"),
            ThreadError::CommentNotFound => ApiError::NotFound("Comment not found"),
            ThreadError::ParentNotFound => {
                ApiError::Validation("Parent comment not found".to_string())
            }
            ThreadError::ParentPostMismatch => {
                ApiError::Validation("Parent comment belongs to a different post".to_string())
            }
            ThreadError::Db(e) => ApiError::Database(e),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::UsernameTaken => {
                ApiError::Validation("Username already exists".to_string())
            }
            AccountError::NotFound => ApiError::NotFound("User not found"),
            AccountError::ProtectedAccount => {
                ApiError::Forbidden("The bootstrap admin account cannot be deleted")
            }
            AccountError::Hash(e) => ApiError::Internal(format!("Password hashing failed: {}", e)),
            AccountError::Db(e) => ApiError::Database(e),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound => ApiError::NotFound("Staff member not found"),
            ProfileError::DuplicateActiveProfile => ApiError::Validation(
                "An active staff profile already exists for this user".to_string(),
            ),
            ProfileError::Db(e) => ApiError::Database(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => ApiError::NotFound("File not found"),
            StorageError::InvalidRange(msg) => ApiError::Validation(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<GeneratorError> for ApiError {
    fn from(e: GeneratorError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}
