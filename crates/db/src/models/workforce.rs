//! Read model for the workforce registry view.

use portal_core::types::DbId;
use serde::Serialize;

/// A reviewer account together with its effective assignment flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkforceMember {
    pub reviewer_id: DbId,
    pub email: String,
    pub role: String,
    pub enabled: bool,
}
