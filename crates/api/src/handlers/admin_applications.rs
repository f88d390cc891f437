//! Handlers for reading and deciding applications (`/admin/applications`,
//! `/superadmin/applications/{id}/status`).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use portal_core::application::{validate_decision, validate_status};
use portal_core::error::CoreError;
use portal_core::pagination::{validate_page_limit, ApplicationCursor, PageDirection};
use portal_core::settings::ShortAnswerQuestion;
use portal_core::types::DbId;
use portal_db::models::application::Application;
use portal_db::models::status::ApplicationStatus;
use portal_db::repositories::{ApplicationRepo, ReviewRepo, SettingRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::query::ApplicationListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// An application together with the question set it is answered against.
#[derive(Debug, Serialize)]
pub struct ApplicationDetail {
    pub application: Application,
    pub questions: Vec<ShortAnswerQuestion>,
}

/// Request body for `PUT /superadmin/applications/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// GET /api/v1/admin/applications
///
/// Keyset-paginated listing, newest first. Every query parameter is
/// validated before the database is touched.
pub async fn list_applications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<impl IntoResponse> {
    let cursor = params
        .cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(ApplicationCursor::decode)
        .transpose()?;

    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(name) => {
            validate_status(name)?;
            ApplicationStatus::from_name(name)
        }
        None => None,
    };

    let limit = validate_page_limit(params.limit)?;

    let direction = match params.direction.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => PageDirection::parse(raw)?,
        None => PageDirection::default(),
    };

    let page = ApplicationRepo::list(&state.pool, status, cursor, direction, limit).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/admin/applications/stats
pub async fn application_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = ApplicationRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/applications/{id}
///
/// The full application plus the configured short-answer questions, so the
/// reviewer can read answers against their prompts.
pub async fn get_application(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))?;
    let questions = SettingRepo::short_answer_questions(&state.pool).await?;

    Ok(Json(DataResponse {
        data: ApplicationDetail {
            application,
            questions,
        },
    }))
}

/// GET /api/v1/admin/applications/{id}/reviews
///
/// Every assignment record for the application, pending and completed.
pub async fn application_reviews(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let reviews = ReviewRepo::list_for_application(&state.pool, id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/admin/applications/{id}/notes
///
/// Non-empty reviewer notes without the votes attached.
pub async fn application_notes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_exists(&state, id).await?;
    let notes = ReviewRepo::notes_for_application(&state.pool, id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// PUT /api/v1/superadmin/applications/{id}/status
///
/// Record a decision on a submitted application. Returns 409 when the
/// application exists but is not awaiting a decision.
pub async fn set_application_status(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    validate_decision(&input.status)?;
    let status = ApplicationStatus::from_name(&input.status).ok_or_else(|| {
        AppError::InternalError(format!("status '{}' is not seeded", input.status))
    })?;

    let Some(application) = ApplicationRepo::set_status(&state.pool, id, status).await? else {
        ensure_exists(&state, id).await?;
        return Err(AppError::Core(CoreError::Conflict(
            "Only submitted applications can receive a decision".into(),
        )));
    };

    tracing::info!(
        user_id = admin.user_id,
        application_id = id,
        status = status.name(),
        "Application decision recorded",
    );

    Ok(Json(DataResponse { data: application }))
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))
}
