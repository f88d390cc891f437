//! Pure domain logic for the applicant portal.
//!
//! Nothing in this crate performs I/O. The `db` crate persists what is
//! modelled here and the `api` crate exposes it over HTTP.

pub mod application;
pub mod assignment;
pub mod error;
pub mod pagination;
pub mod quota;
pub mod review;
pub mod roles;
pub mod settings;
pub mod types;
pub mod workforce;
