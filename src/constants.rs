//! Application-wide constants

/// Username of the seeded administrator account.
/// This account can never be deleted through the user-management endpoints,
/// so the site always has at least one working admin login.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Route prefix under which locally stored uploads are served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Generated excerpts are capped at this many characters
pub const EXCERPT_MAX_LEN: usize = 200;
