pub mod admin;
pub mod applications;
pub mod health;
pub mod superadmin;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /applications/me                                 get (creates draft), patch
/// /applications/me/submit                          submit draft (POST)
///
/// /admin/applications                              list (?cursor, status, limit, direction)
/// /admin/applications/stats                        counts per status
/// /admin/applications/{id}                         application + questions
/// /admin/applications/{id}/reviews                 every assignment record
/// /admin/applications/{id}/notes                   reviewer notes
/// /admin/reviews/next                              claim next application (GET)
/// /admin/reviews/pending                           own pending reviews
/// /admin/reviews/completed                         own completed reviews
/// /admin/reviews/{id}                              submit vote (PUT)
///
/// /superadmin/applications/assign                  batch rebalance (POST)
/// /superadmin/applications/{id}/status             record decision (PUT)
/// /superadmin/settings/saquestions                 get, replace questions
/// /superadmin/settings/reviews-per-app             get, set quota
/// /superadmin/settings/review-assignment           get, set own flag
/// /superadmin/settings/workforce                   roster with flags
/// /superadmin/settings/workforce/{id}              set reviewer flag (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/applications", applications::router())
        .nest("/admin", admin::router())
        .nest("/superadmin", superadmin::router())
}
