//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes that module supports

pub mod application;
pub mod review;
pub mod status;
pub mod user;
pub mod workforce;
