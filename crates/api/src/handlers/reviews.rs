//! Handlers for reviewer assignments (`/admin/reviews`) and the batch
//! rebalance (`/superadmin/applications/assign`).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::review::{validate_notes, validate_vote, NOTHING_TO_REVIEW};
use portal_core::types::DbId;
use portal_db::models::review::SubmitVote;
use portal_db::repositories::{ReviewRepo, SettingRepo};
use serde::Serialize;

use super::with_deadline;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a batch rebalance.
#[derive(Debug, Serialize)]
pub struct RebalanceResponse {
    pub reviews_created: u64,
}

// ---------------------------------------------------------------------------
// Reviewer queue
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/reviews/next
///
/// Claim the next application needing review. Returns 404 when nothing is
/// left for this reviewer.
pub async fn next_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let quota = SettingRepo::reviews_per_application(&state.pool).await?;
    let review = with_deadline(
        "assign_next",
        state.config.assign_next_deadline(),
        ReviewRepo::assign_next(
            &state.pool,
            admin.user_id,
            quota,
            state.config.assign_next_deadline(),
        ),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Exhausted(NOTHING_TO_REVIEW.into())))?;

    tracing::info!(
        user_id = admin.user_id,
        application_id = review.application_id,
        review_id = review.id,
        "Review handed out",
    );

    Ok(Json(DataResponse { data: review }))
}

/// GET /api/v1/admin/reviews/pending
pub async fn pending_reviews(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewRepo::list_pending(&state.pool, admin.user_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/admin/reviews/completed
pub async fn completed_reviews(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewRepo::list_completed(&state.pool, admin.user_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// PUT /api/v1/admin/reviews/{id}
///
/// Record the caller's vote. A record owned by another reviewer is reported
/// as not found.
pub async fn submit_vote(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitVote>,
) -> AppResult<impl IntoResponse> {
    validate_vote(&input.vote)?;
    validate_notes(input.notes.as_deref())?;

    let review = ReviewRepo::submit_vote(&state.pool, id, admin.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ApplicationReview",
            id,
        }))?;

    tracing::info!(
        user_id = admin.user_id,
        review_id = id,
        application_id = review.application_id,
        vote = %input.vote,
        "Review vote recorded",
    );

    Ok(Json(DataResponse { data: review }))
}

// ---------------------------------------------------------------------------
// Batch rebalance
// ---------------------------------------------------------------------------

/// POST /api/v1/superadmin/applications/assign
///
/// Bring every submitted application up to the configured quota across the
/// enabled workforce. Safe to call repeatedly; a converged ledger yields 0.
pub async fn assign_reviews(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let quota = SettingRepo::reviews_per_application(&state.pool).await?;
    let outcome = with_deadline(
        "rebalance",
        state.config.rebalance_deadline(),
        ReviewRepo::rebalance(&state.pool, quota, state.config.rebalance_deadline()),
    )
    .await?;

    tracing::info!(
        user_id = admin.user_id,
        quota,
        reviews_created = outcome.reviews_created,
        reviews_evicted = outcome.reviews_evicted,
        "Review rebalance finished",
    );

    Ok(Json(DataResponse {
        data: RebalanceResponse {
            reviews_created: outcome.reviews_created,
        },
    }))
}
