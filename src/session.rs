//! Password hashing and cookie-session authentication
//!
//! The Argon2 instance is keyed with the `SALT` secret so password hashes
//! are not portable between deployments. Sessions store only the user id;
//! the profile is re-read from the database on every request.

use crate::db::get_db_pool;
use crate::user::Profile;
use actix_session::Session;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use once_cell::sync::OnceCell;

/// Session key under which the authenticated user id is stored
const UID_KEY: &str = "uid";

static SALT: OnceCell<String> = OnceCell::new();
static ARGON2: OnceCell<Argon2<'static>> = OnceCell::new();

/// Initialize the process-wide Argon2 instance. Must be called before any
/// password is hashed or verified.
pub fn init() {
    let salt = SALT.get_or_init(|| match std::env::var("SALT") {
        Ok(v) => v,
        Err(err) => {
            log::warn!(
                "SALT was invalid ({:?}); generated an ephemeral pepper. \
                 Password hashes will not survive a restart without a stable SALT.",
                err
            );
            SaltString::generate(&mut OsRng).as_str().to_owned()
        }
    });

    let argon2 = Argon2::new_with_secret(
        salt.as_bytes(),
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::default(),
    )
    .expect("SALT is not usable as an Argon2 secret.");

    let _ = ARGON2.set(argon2);
}

pub fn get_argon2() -> &'static Argon2<'static> {
    ARGON2.get().expect("Argon2 is not initialized.")
}

/// Hash a plaintext password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash is unparseable: {}", e);
            false
        }
    }
}

/// Resolve the session cookie to a user profile. None is a guest.
pub async fn authenticate_client_by_session(session: &Session) -> Option<Profile> {
    let uid = match session.get::<i32>(UID_KEY) {
        Ok(Some(uid)) => uid,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Unreadable session cookie: {}", e);
            return None;
        }
    };

    match Profile::get_by_id(get_db_pool(), uid).await {
        Ok(profile) => profile,
        Err(e) => {
            log::error!("Failed to load user {} for session: {}", uid, e);
            None
        }
    }
}

/// Record a successful login in the session.
pub fn remember(session: &Session, user_id: i32) -> Result<(), actix_session::SessionInsertError> {
    session.renew();
    session.insert(UID_KEY, user_id)
}

/// Drop the session entirely.
pub fn forget(session: &Session) {
    session.purge();
}
