//! Integration tests for the application lifecycle and cursor listing.

use portal_core::pagination::{ApplicationCursor, PageDirection};
use portal_core::types::DbId;
use portal_db::models::application::UpdateApplication;
use portal_db::models::status::ApplicationStatus;
use portal_db::models::user::CreateUser;
use portal_db::repositories::{ApplicationRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn applicant(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            external_id: format!("idp|{name}"),
            email: format!("{name}@example.com"),
            role: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Create `n` drafts; returns their ids newest first.
async fn seed_applications(pool: &PgPool, n: usize) -> Vec<DbId> {
    let mut ids = Vec::new();
    for i in 0..n {
        let user_id = applicant(pool, &format!("hacker{i}")).await;
        ids.push(ApplicationRepo::create(pool, user_id).await.unwrap().id);
    }
    ids.reverse();
    ids
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> DbId) -> Vec<DbId> {
    items.iter().map(id).collect()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_or_create_returns_same_draft(pool: PgPool) {
    let user_id = applicant(&pool, "alice").await;

    let first = ApplicationRepo::get_or_create_for_user(&pool, user_id).await.unwrap();
    let second = ApplicationRepo::get_or_create_for_user(&pool, user_id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.status, "draft");
    assert_eq!(first.reviews_assigned, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_create_violates_unique_user(pool: PgPool) {
    let user_id = applicant(&pool, "alice").await;
    ApplicationRepo::create(&pool, user_id).await.unwrap();

    let err = ApplicationRepo::create(&pool, user_id).await.unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_applications_user")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_applies_only_to_drafts(pool: PgPool) {
    let user_id = applicant(&pool, "alice").await;
    let app = ApplicationRepo::create(&pool, user_id).await.unwrap();

    let patch = UpdateApplication {
        first_name: Some("Alice".to_string()),
        dietary_restrictions: Some(vec!["vegan".to_string()]),
        ..Default::default()
    };
    let updated = ApplicationRepo::update_draft(&pool, user_id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("Alice"));
    assert_eq!(updated.dietary_restrictions, vec!["vegan".to_string()]);
    assert!(updated.missing_required_fields().contains(&"last_name".to_string()));
    assert!(!updated.missing_required_fields().contains(&"first_name".to_string()));

    let submitted = ApplicationRepo::submit(&pool, app.id).await.unwrap().unwrap();
    assert_eq!(submitted.status, "submitted");
    assert!(submitted.submitted_at.is_some());

    assert!(ApplicationRepo::update_draft(&pool, user_id, &patch).await.unwrap().is_none());
    assert!(ApplicationRepo::submit(&pool, app.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn decisions_require_submitted_status(pool: PgPool) {
    let user_id = applicant(&pool, "alice").await;
    let app = ApplicationRepo::create(&pool, user_id).await.unwrap();

    let draft = ApplicationRepo::set_status(&pool, app.id, ApplicationStatus::Accepted)
        .await
        .unwrap();
    assert!(draft.is_none());

    ApplicationRepo::submit(&pool, app.id).await.unwrap();
    let accepted = ApplicationRepo::set_status(&pool, app.id, ApplicationStatus::Accepted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, "accepted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_count_each_status(pool: PgPool) {
    let ids = seed_applications(&pool, 3).await;
    ApplicationRepo::submit(&pool, ids[0]).await.unwrap();
    ApplicationRepo::submit(&pool, ids[1]).await.unwrap();
    ApplicationRepo::set_status(&pool, ids[1], ApplicationStatus::Rejected)
        .await
        .unwrap();

    let stats = ApplicationRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.draft, 1);
    assert_eq!(stats.submitted, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.accepted, 0);
}

// ---------------------------------------------------------------------------
// Cursor listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn forward_pages_walk_newest_to_oldest(pool: PgPool) {
    let all = seed_applications(&pool, 5).await;

    let first = ApplicationRepo::list(&pool, None, None, PageDirection::Forward, 2)
        .await
        .unwrap();
    assert_eq!(ids(&first.items, |a| a.id), all[0..2].to_vec());
    assert!(first.has_more);
    assert!(first.prev_cursor.is_none());

    let cursor = ApplicationCursor::decode(first.next_cursor.as_deref().unwrap()).unwrap();
    let second = ApplicationRepo::list(&pool, None, Some(cursor), PageDirection::Forward, 2)
        .await
        .unwrap();
    assert_eq!(ids(&second.items, |a| a.id), all[2..4].to_vec());
    assert!(second.prev_cursor.is_some());

    let cursor = ApplicationCursor::decode(second.next_cursor.as_deref().unwrap()).unwrap();
    let third = ApplicationRepo::list(&pool, None, Some(cursor), PageDirection::Forward, 2)
        .await
        .unwrap();
    assert_eq!(ids(&third.items, |a| a.id), all[4..5].to_vec());
    assert!(!third.has_more);
    assert!(third.next_cursor.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn backward_from_prev_cursor_returns_previous_page(pool: PgPool) {
    seed_applications(&pool, 5).await;

    let first = ApplicationRepo::list(&pool, None, None, PageDirection::Forward, 2)
        .await
        .unwrap();
    let cursor = ApplicationCursor::decode(first.next_cursor.as_deref().unwrap()).unwrap();
    let second = ApplicationRepo::list(&pool, None, Some(cursor), PageDirection::Forward, 2)
        .await
        .unwrap();

    let cursor = ApplicationCursor::decode(second.prev_cursor.as_deref().unwrap()).unwrap();
    let back = ApplicationRepo::list(&pool, None, Some(cursor), PageDirection::Backward, 2)
        .await
        .unwrap();
    assert_eq!(ids(&back.items, |a| a.id), ids(&first.items, |a| a.id));
    // Nothing is newer than the first page.
    assert!(!back.has_more);
    assert!(back.prev_cursor.is_none());
    assert!(back.next_cursor.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn backward_without_cursor_is_first_page(pool: PgPool) {
    let all = seed_applications(&pool, 3).await;

    let page = ApplicationRepo::list(&pool, None, None, PageDirection::Backward, 2)
        .await
        .unwrap();
    assert_eq!(ids(&page.items, |a| a.id), all[0..2].to_vec());
    assert!(page.has_more);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_filter_limits_rows(pool: PgPool) {
    let all = seed_applications(&pool, 4).await;
    ApplicationRepo::submit(&pool, all[1]).await.unwrap();
    ApplicationRepo::submit(&pool, all[3]).await.unwrap();

    let page = ApplicationRepo::list(
        &pool,
        Some(ApplicationStatus::Submitted),
        None,
        PageDirection::Forward,
        50,
    )
    .await
    .unwrap();
    assert_eq!(ids(&page.items, |a| a.id), vec![all[1], all[3]]);
    assert!(page.items.iter().all(|a| a.status == "submitted"));
    assert!(!page.has_more);
}
