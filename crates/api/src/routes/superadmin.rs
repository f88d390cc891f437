//! Route definitions for the `/superadmin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_applications, reviews, settings};
use crate::state::AppState;

/// Routes mounted at `/superadmin`.
///
/// All routes require the `super_admin` role.
///
/// ```text
/// POST   /applications/assign              -> assign_reviews
/// PUT    /applications/{id}/status         -> set_application_status
/// GET    /settings/saquestions             -> get_questions
/// PUT    /settings/saquestions             -> update_questions
/// GET    /settings/reviews-per-app         -> get_reviews_per_application
/// PUT    /settings/reviews-per-app         -> update_reviews_per_application
/// GET    /settings/review-assignment       -> get_own_assignment
/// PUT    /settings/review-assignment       -> update_own_assignment
/// GET    /settings/workforce               -> list_workforce
/// PUT    /settings/workforce/{id}          -> update_workforce_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications/assign", post(reviews::assign_reviews))
        .route(
            "/applications/{id}/status",
            put(admin_applications::set_application_status),
        )
        .route(
            "/settings/saquestions",
            get(settings::get_questions).put(settings::update_questions),
        )
        .route(
            "/settings/reviews-per-app",
            get(settings::get_reviews_per_application)
                .put(settings::update_reviews_per_application),
        )
        .route(
            "/settings/review-assignment",
            get(settings::get_own_assignment).put(settings::update_own_assignment),
        )
        .route("/settings/workforce", get(settings::list_workforce))
        .route(
            "/settings/workforce/{id}",
            put(settings::update_workforce_member),
        )
}
