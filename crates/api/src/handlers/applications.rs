//! Handlers for the applicant's own application (`/applications/me`).
//!
//! Every authenticated user owns at most one application. It is created as
//! a draft on first access and becomes read-only once submitted.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use portal_core::error::CoreError;
use portal_core::settings::missing_short_answers;
use portal_db::models::application::{Application, UpdateApplication};
use portal_db::models::status::ApplicationStatus;
use portal_db::repositories::{ApplicationRepo, SettingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const MIN_AGE: i16 = 1;
const MAX_AGE: i16 = 150;

/// GET /api/v1/applications/me
///
/// Return the caller's application, creating an empty draft on first access.
pub async fn get_my_application(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let application = ApplicationRepo::get_or_create_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: application }))
}

/// PATCH /api/v1/applications/me
///
/// Apply a partial update to the caller's draft. Returns 409 once the
/// application has been submitted.
pub async fn update_my_application(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateApplication>,
) -> AppResult<impl IntoResponse> {
    validate_update(&input)?;

    let current = ApplicationRepo::get_or_create_for_user(&state.pool, user.user_id).await?;
    ensure_draft(&current)?;

    let application = ApplicationRepo::update_draft(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(already_submitted)?;

    tracing::info!(
        user_id = user.user_id,
        application_id = application.id,
        "Application draft updated",
    );

    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/applications/me/submit
///
/// Submit the caller's draft once every required field, acknowledgement and
/// required short answer is present.
pub async fn submit_my_application(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let current = ApplicationRepo::get_or_create_for_user(&state.pool, user.user_id).await?;
    ensure_draft(&current)?;

    let questions = SettingRepo::short_answer_questions(&state.pool).await?;
    let mut missing = current.missing_required_fields();
    missing.extend(missing_short_answers(
        &questions,
        &current.short_answer_responses,
    ));
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        ))));
    }

    let application = ApplicationRepo::submit(&state.pool, current.id)
        .await?
        .ok_or_else(already_submitted)?;

    tracing::info!(
        user_id = user.user_id,
        application_id = application.id,
        "Application submitted",
    );

    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_update(input: &UpdateApplication) -> Result<(), AppError> {
    if let Some(age) = input.age {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}"
            ))));
        }
    }
    if input.hackathons_attended_count.is_some_and(|n| n < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "hackathons_attended_count must not be negative".into(),
        )));
    }
    if input
        .short_answer_responses
        .as_ref()
        .is_some_and(|v| !v.is_object())
    {
        return Err(AppError::Core(CoreError::Validation(
            "short_answer_responses must be an object keyed by question id".into(),
        )));
    }
    Ok(())
}

fn ensure_draft(application: &Application) -> Result<(), AppError> {
    if application.status_id == ApplicationStatus::Draft.id() {
        Ok(())
    } else {
        Err(already_submitted())
    }
}

fn already_submitted() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Application has already been submitted".into(),
    ))
}
