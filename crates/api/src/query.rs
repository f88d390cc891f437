//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for the admin application list
/// (`?cursor=&status=&limit=&direction=`).
///
/// Values arrive raw and are validated in the handler so every failure maps
/// to the standard JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    pub cursor: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub direction: Option<String>,
}
