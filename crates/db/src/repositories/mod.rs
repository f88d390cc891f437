//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods meant to run inside a
//! caller's transaction take `&mut PgConnection` instead.

pub mod application_repo;
pub mod review_repo;
pub mod setting_repo;
pub mod user_repo;
pub mod workforce_repo;

pub use application_repo::ApplicationRepo;
pub use review_repo::ReviewRepo;
pub use setting_repo::SettingRepo;
pub use user_repo::UserRepo;
pub use workforce_repo::WorkforceRepo;
