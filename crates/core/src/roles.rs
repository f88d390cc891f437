//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_HACKER: &str = "hacker";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Roles whose accounts take part in application review.
pub const REVIEWER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// Position of a role in the `hacker < admin < super_admin` hierarchy.
///
/// Unknown roles rank below every known role so they never pass a check.
pub fn role_level(role: &str) -> u8 {
    match role {
        ROLE_HACKER => 1,
        ROLE_ADMIN => 2,
        ROLE_SUPER_ADMIN => 3,
        _ => 0,
    }
}

/// Whether `role` grants at least the permissions of `minimum`.
pub fn has_at_least(role: &str, minimum: &str) -> bool {
    role_level(role) >= role_level(minimum) && role_level(role) > 0
}

/// Whether accounts with this role review applications.
pub fn is_reviewer_role(role: &str) -> bool {
    REVIEWER_ROLES.contains(&role)
}

/// New reviewer accounts join batch assignment automatically only when they
/// are plain admins. Super-admins opt in by hand.
pub fn default_assignment_enabled(role: &str) -> bool {
    role == ROLE_ADMIN
}
