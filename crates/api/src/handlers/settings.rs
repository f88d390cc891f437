//! Handlers for super-admin settings (`/superadmin/settings`).
//!
//! Covers the short-answer question set, the review quota and the
//! workforce registry.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::quota::validate_reviews_per_application;
use portal_core::roles::is_reviewer_role;
use portal_core::settings::{validate_questions, ShortAnswerQuestion};
use portal_core::types::DbId;
use portal_db::repositories::{SettingRepo, UserRepo, WorkforceRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body and response for the review quota endpoints.
#[derive(Debug, Deserialize, Serialize)]
pub struct ReviewsPerApplication {
    pub reviews_per_application: i32,
}

/// Body and response for a single reviewer's assignment flag.
#[derive(Debug, Deserialize, Serialize)]
pub struct AssignmentFlag {
    pub enabled: bool,
}

/// Response for a flag change.
#[derive(Debug, Serialize)]
pub struct AssignmentFlagUpdate {
    pub reviewer_id: DbId,
    pub enabled: bool,
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// Short-answer questions
// ---------------------------------------------------------------------------

/// GET /api/v1/superadmin/settings/saquestions
pub async fn get_questions(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let questions = SettingRepo::short_answer_questions(&state.pool).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// PUT /api/v1/superadmin/settings/saquestions
///
/// Replace the whole question set.
pub async fn update_questions(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(mut questions): Json<Vec<ShortAnswerQuestion>>,
) -> AppResult<impl IntoResponse> {
    validate_questions(&questions)?;
    questions.sort_by_key(|q| q.display_order);
    SettingRepo::set_short_answer_questions(&state.pool, &questions).await?;

    tracing::info!(
        user_id = admin.user_id,
        count = questions.len(),
        "Short-answer questions updated",
    );

    Ok(Json(DataResponse { data: questions }))
}

// ---------------------------------------------------------------------------
// Review quota
// ---------------------------------------------------------------------------

/// GET /api/v1/superadmin/settings/reviews-per-app
pub async fn get_reviews_per_application(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let quota = SettingRepo::reviews_per_application(&state.pool).await?;
    Ok(Json(DataResponse {
        data: ReviewsPerApplication {
            reviews_per_application: quota,
        },
    }))
}

/// PUT /api/v1/superadmin/settings/reviews-per-app
///
/// Takes effect on the next rebalance or pull-next. Existing records above
/// a lowered quota are left alone.
pub async fn update_reviews_per_application(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<ReviewsPerApplication>,
) -> AppResult<impl IntoResponse> {
    validate_reviews_per_application(input.reviews_per_application)?;
    SettingRepo::set_reviews_per_application(&state.pool, input.reviews_per_application).await?;

    tracing::info!(
        user_id = admin.user_id,
        reviews_per_application = input.reviews_per_application,
        "Review quota updated",
    );

    Ok(Json(DataResponse { data: input }))
}

// ---------------------------------------------------------------------------
// Workforce registry
// ---------------------------------------------------------------------------

/// GET /api/v1/superadmin/settings/review-assignment
///
/// The caller's own effective assignment flag.
pub async fn get_own_assignment(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let enabled = WorkforceRepo::is_enabled(&state.pool, admin.user_id, &admin.role).await?;
    Ok(Json(DataResponse {
        data: AssignmentFlag { enabled },
    }))
}

/// PUT /api/v1/superadmin/settings/review-assignment
pub async fn update_own_assignment(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Json(input): Json<AssignmentFlag>,
) -> AppResult<impl IntoResponse> {
    let update = set_flag(&state, admin.user_id, input.enabled).await?;

    tracing::info!(
        user_id = admin.user_id,
        enabled = update.enabled,
        changed = update.changed,
        "Own review assignment flag updated",
    );

    Ok(Json(DataResponse { data: update }))
}

/// GET /api/v1/superadmin/settings/workforce
///
/// Every reviewer account with its effective flag.
pub async fn list_workforce(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let members = WorkforceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// PUT /api/v1/superadmin/settings/workforce/{id}
///
/// Set any reviewer's flag. Returns 404 for unknown users and 400 for
/// accounts that do not review.
pub async fn update_workforce_member(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(reviewer_id): Path<DbId>,
    Json(input): Json<AssignmentFlag>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, reviewer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: reviewer_id,
        }))?;
    if !is_reviewer_role(&user.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {reviewer_id} has role '{}' and does not review applications",
            user.role
        ))));
    }

    let update = set_flag(&state, reviewer_id, input.enabled).await?;

    tracing::info!(
        user_id = admin.user_id,
        reviewer_id,
        enabled = update.enabled,
        changed = update.changed,
        "Reviewer assignment flag updated",
    );

    Ok(Json(DataResponse { data: update }))
}

async fn set_flag(
    state: &AppState,
    reviewer_id: DbId,
    enabled: bool,
) -> AppResult<AssignmentFlagUpdate> {
    let changed = WorkforceRepo::set_enabled(&state.pool, reviewer_id, enabled).await?;
    Ok(AssignmentFlagUpdate {
        reviewer_id,
        enabled,
        changed,
    })
}
