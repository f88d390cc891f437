//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires `admin` or `super_admin`.
//! - [`rbac::RequireSuperAdmin`] -- Requires `super_admin`.

pub mod auth;
pub mod rbac;
