//! Route definitions for the applicant's own application.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// Any authenticated user.
///
/// ```text
/// GET    /me           -> get_my_application
/// PATCH  /me           -> update_my_application
/// POST   /me/submit    -> submit_my_application
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(applications::get_my_application).patch(applications::update_my_application),
        )
        .route("/me/submit", post(applications::submit_my_application))
}
