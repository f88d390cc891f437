//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{admin_applications, reviews};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role or above (enforced by handler
/// extractors).
///
/// ```text
/// GET    /applications                -> list_applications
/// GET    /applications/stats          -> application_stats
/// GET    /applications/{id}           -> get_application
/// GET    /applications/{id}/reviews   -> application_reviews
/// GET    /applications/{id}/notes     -> application_notes
/// GET    /reviews/next                -> next_review
/// GET    /reviews/pending             -> pending_reviews
/// GET    /reviews/completed           -> completed_reviews
/// PUT    /reviews/{id}                -> submit_vote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications", get(admin_applications::list_applications))
        .route(
            "/applications/stats",
            get(admin_applications::application_stats),
        )
        .route("/applications/{id}", get(admin_applications::get_application))
        .route(
            "/applications/{id}/reviews",
            get(admin_applications::application_reviews),
        )
        .route(
            "/applications/{id}/notes",
            get(admin_applications::application_notes),
        )
        .route("/reviews/next", get(reviews::next_review))
        .route("/reviews/pending", get(reviews::pending_reviews))
        .route("/reviews/completed", get(reviews::completed_reviews))
        .route("/reviews/{id}", put(reviews::submit_vote))
}
