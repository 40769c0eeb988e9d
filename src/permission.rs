//! Capability-based authorization
//!
//! Handlers never compare role strings directly; they ask whether the
//! current client holds a capability. Ownership checks (post author, staff
//! profile owner) live here too so the rules are testable without a running
//! HTTP stack.

use crate::orm::users::Role;
use crate::orm::{blog_posts, staff};
use crate::user::Profile;

/// Things a client may be allowed to do beyond what any visitor can.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Usable regardless of the stored approval flag
    BypassApproval,
    /// See draft posts in listings and detail reads
    ViewUnpublished,
    /// Edit or delete any post regardless of ownership
    ManageAnyPost,
    /// Edit or deactivate any staff profile regardless of ownership
    ManageAnyStaff,
    /// Update and delete comments
    ModerateComments,
    /// Approve and delete user accounts
    ManageUsers,
}

/// The single place where roles grant capabilities.
pub fn role_can(role: Role, capability: Capability) -> bool {
    match role {
        Role::Admin => true,
        Role::User => match capability {
            Capability::BypassApproval
            | Capability::ViewUnpublished
            | Capability::ManageAnyPost
            | Capability::ManageAnyStaff
            | Capability::ModerateComments
            | Capability::ManageUsers => false,
        },
    }
}

/// May this client author content (posts, staff profiles)?
/// Admins are usable regardless of approval bookkeeping.
pub fn can_author(client: Option<&Profile>) -> bool {
    match client {
        Some(user) => user.is_approved || role_can(user.role, Capability::BypassApproval),
        None => false,
    }
}

/// May this client edit or delete the given post?
///
/// Ownership prefers the author foreign key; rows predating it fall back to
/// an exact author-name match against the username. The fallback is a
/// migration shim, not permanent design.
pub fn can_modify_post(client: Option<&Profile>, post: &blog_posts::Model) -> bool {
    let user = match client {
        Some(user) => user,
        None => return false,
    };

    if role_can(user.role, Capability::ManageAnyPost) {
        return true;
    }

    match post.author_id {
        Some(author_id) => author_id == user.id,
        None => post.author_name == user.username,
    }
}

/// May this client edit or deactivate the given staff profile?
pub fn can_modify_staff(client: Option<&Profile>, profile: &staff::Model) -> bool {
    let user = match client {
        Some(user) => user,
        None => return false,
    };

    if role_can(user.role, Capability::ManageAnyStaff) {
        return true;
    }

    profile.user_id == Some(user.id)
}
