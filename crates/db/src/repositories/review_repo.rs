//! Repository for the `application_reviews` assignment ledger.
//!
//! Two writers hand out assignments:
//!
//! - [`ReviewRepo::rebalance`] redistributes every needy application across
//!   the enabled workforce in one transaction.
//! - [`ReviewRepo::assign_next`] claims a single application for one
//!   reviewer, skipping rows another transaction holds.
//!
//! Both insert with `ON CONFLICT DO NOTHING` against
//! `uq_application_reviews_application_reviewer`, so racing writers never
//! produce a duplicate pair or an error. `applications.reviews_assigned` is
//! recounted by a trigger on every insert and delete.

use std::collections::HashMap;
use std::time::Duration;

use portal_core::assignment::{plan_assignments, NeedyApplication};
use portal_core::roles::REVIEWER_ROLES;
use portal_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::review::{
    ApplicationReview, RebalanceOutcome, ReviewWithApplication, ReviewerNote, SubmitVote,
};
use crate::models::status::ApplicationStatus;
use crate::repositories::WorkforceRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, application_id, reviewer_id, vote, notes, \
                        assigned_at, reviewed_at, created_at, updated_at";

/// Columns for a reviewer's own queue; expects `r` and `a` aliases.
const QUEUE_COLUMNS: &str = "r.id, r.application_id, r.vote, r.notes, r.assigned_at, \
    r.reviewed_at, a.first_name, a.last_name, a.university, a.major, a.submitted_at";

/// Provides assignment and vote operations on review records.
pub struct ReviewRepo;

impl ReviewRepo {
    /* --------------------------------------------------------------------------
    Assignment
    -------------------------------------------------------------------------- */

    /// Bring every submitted application up to `quota` assignments.
    ///
    /// Runs as one transaction:
    /// 1. Lock the workforce registry and backfill missing reviewers.
    /// 2. Delete pending records held by disabled reviewers.
    /// 3. Order enabled reviewers by pending load, then account age.
    /// 4. Lock submitted applications below quota, fewest reviews first.
    /// 5. Plan round-robin attempts and insert them, ignoring conflicts.
    ///
    /// `deadline` bounds every statement and lock wait. Any failure rolls
    /// back the whole batch.
    pub async fn rebalance(
        pool: &PgPool,
        quota: i32,
        deadline: Duration,
    ) -> Result<RebalanceOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        apply_deadline(&mut tx, deadline).await?;

        let roster = WorkforceRepo::sync(&mut tx).await?;

        let disabled = roster.disabled_ids();
        let reviews_evicted = if disabled.is_empty() {
            0
        } else {
            sqlx::query(
                "DELETE FROM application_reviews
                 WHERE vote IS NULL AND reviewer_id = ANY($1)",
            )
            .bind(&disabled)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };
        tracing::debug!(reviews_evicted, disabled = disabled.len(), "Evicted pending reviews");

        let reviewers = eligible_reviewers(&mut tx, &roster.enabled_ids()).await?;
        if reviewers.is_empty() {
            tx.commit().await?;
            tracing::info!(reviews_evicted, "No eligible reviewers, nothing assigned");
            return Ok(RebalanceOutcome {
                reviews_created: 0,
                reviews_evicted,
            });
        }

        let needy = needy_applications(&mut tx, quota).await?;
        tracing::debug!(
            reviewers = reviewers.len(),
            applications = needy.len(),
            quota,
            "Planning assignments"
        );

        let planned = plan_assignments(&reviewers, &needy, quota);
        let reviews_created = if planned.is_empty() {
            0
        } else {
            let application_ids: Vec<DbId> = planned.iter().map(|p| p.application_id).collect();
            let reviewer_ids: Vec<DbId> = planned.iter().map(|p| p.reviewer_id).collect();
            sqlx::query(
                "INSERT INTO application_reviews (application_id, reviewer_id)
                 SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[])
                 ON CONFLICT ON CONSTRAINT uq_application_reviews_application_reviewer DO NOTHING",
            )
            .bind(&application_ids)
            .bind(&reviewer_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        tx.commit().await?;

        tracing::info!(
            reviews_created,
            reviews_evicted,
            attempted = planned.len(),
            quota,
            "Batch rebalance complete"
        );
        Ok(RebalanceOutcome {
            reviews_created,
            reviews_evicted,
        })
    }

    /// Claim one application for `reviewer_id`.
    ///
    /// Picks the submitted application with the fewest assignments (oldest
    /// submission first) that is below `quota`, not authored by the reviewer
    /// and not already assigned to them. Rows locked by a concurrent claim
    /// are skipped rather than waited on. Returns `None` when nothing is
    /// available.
    pub async fn assign_next(
        pool: &PgPool,
        reviewer_id: DbId,
        quota: i32,
        deadline: Duration,
    ) -> Result<Option<ApplicationReview>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        apply_deadline(&mut tx, deadline).await?;

        let candidate: Option<(DbId,)> = sqlx::query_as(
            "SELECT a.id FROM applications a
             WHERE a.status_id = $1
               AND a.reviews_assigned < $2
               AND a.user_id <> $3
               AND NOT EXISTS (
                   SELECT 1 FROM application_reviews r
                   WHERE r.application_id = a.id AND r.reviewer_id = $3
               )
             ORDER BY a.reviews_assigned ASC, a.submitted_at ASC, a.id ASC
             LIMIT 1
             FOR UPDATE SKIP LOCKED",
        )
        .bind(ApplicationStatus::Submitted.id())
        .bind(quota)
        .bind(reviewer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((application_id,)) = candidate else {
            tracing::debug!(reviewer_id, "No application available to claim");
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO application_reviews (application_id, reviewer_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_application_reviews_application_reviewer DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, ApplicationReview>(&insert)
            .bind(application_id)
            .bind(reviewer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let review = match inserted {
            Some(review) => review,
            None => {
                let select = format!(
                    "SELECT {COLUMNS} FROM application_reviews
                     WHERE application_id = $1 AND reviewer_id = $2"
                );
                sqlx::query_as::<_, ApplicationReview>(&select)
                    .bind(application_id)
                    .bind(reviewer_id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        tracing::info!(reviewer_id, application_id, review_id = review.id, "Review claimed");
        Ok(Some(review))
    }

    /* --------------------------------------------------------------------------
    Votes and queries
    -------------------------------------------------------------------------- */

    /// Record a vote on the reviewer's own record.
    ///
    /// Returns `None` if the record does not exist or belongs to someone
    /// else. Re-voting overwrites the previous vote.
    pub async fn submit_vote(
        pool: &PgPool,
        review_id: DbId,
        reviewer_id: DbId,
        input: &SubmitVote,
    ) -> Result<Option<ApplicationReview>, sqlx::Error> {
        let query = format!(
            "UPDATE application_reviews
             SET vote = $3, notes = $4, reviewed_at = NOW()
             WHERE id = $1 AND reviewer_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationReview>(&query)
            .bind(review_id)
            .bind(reviewer_id)
            .bind(&input.vote)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// The reviewer's records without a vote, oldest assignment first.
    pub async fn list_pending(
        pool: &PgPool,
        reviewer_id: DbId,
    ) -> Result<Vec<ReviewWithApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {QUEUE_COLUMNS}
             FROM application_reviews r
             JOIN applications a ON a.id = r.application_id
             WHERE r.reviewer_id = $1 AND r.vote IS NULL
             ORDER BY r.assigned_at ASC, r.id ASC"
        );
        sqlx::query_as::<_, ReviewWithApplication>(&query)
            .bind(reviewer_id)
            .fetch_all(pool)
            .await
    }

    /// The reviewer's voted records, most recent vote first.
    pub async fn list_completed(
        pool: &PgPool,
        reviewer_id: DbId,
    ) -> Result<Vec<ReviewWithApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {QUEUE_COLUMNS}
             FROM application_reviews r
             JOIN applications a ON a.id = r.application_id
             WHERE r.reviewer_id = $1 AND r.vote IS NOT NULL
             ORDER BY r.reviewed_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, ReviewWithApplication>(&query)
            .bind(reviewer_id)
            .fetch_all(pool)
            .await
    }

    /// Every record for one application, pending and voted.
    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ApplicationReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM application_reviews
             WHERE application_id = $1
             ORDER BY assigned_at ASC, id ASC"
        );
        sqlx::query_as::<_, ApplicationReview>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    /// Non-empty reviewer notes for one application.
    pub async fn notes_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ReviewerNote>, sqlx::Error> {
        sqlx::query_as::<_, ReviewerNote>(
            "SELECT r.reviewer_id, u.email AS reviewer_email, r.notes, r.reviewed_at
             FROM application_reviews r
             JOIN users u ON u.id = r.reviewer_id
             WHERE r.application_id = $1
               AND r.notes IS NOT NULL AND r.notes <> ''
             ORDER BY r.reviewed_at ASC NULLS LAST, r.id ASC",
        )
        .bind(application_id)
        .fetch_all(pool)
        .await
    }
}

/// Bound statement and lock waits for the rest of the transaction.
async fn apply_deadline(conn: &mut PgConnection, deadline: Duration) -> Result<(), sqlx::Error> {
    let millis = deadline.as_millis().to_string();
    sqlx::query(
        "SELECT set_config('statement_timeout', $1, true),
                set_config('lock_timeout', $1, true)",
    )
    .bind(&millis)
    .execute(conn)
    .await?;
    Ok(())
}

/// Enabled reviewer accounts, least pending load first.
async fn eligible_reviewers(
    conn: &mut PgConnection,
    enabled: &[DbId],
) -> Result<Vec<DbId>, sqlx::Error> {
    if enabled.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<(DbId,)> = sqlx::query_as(
        "SELECT u.id
         FROM users u
         LEFT JOIN application_reviews r ON r.reviewer_id = u.id AND r.vote IS NULL
         WHERE u.id = ANY($1) AND u.role = ANY($2)
         GROUP BY u.id, u.created_at
         ORDER BY COUNT(r.id) ASC, u.created_at ASC, u.id ASC",
    )
    .bind(enabled)
    .bind(REVIEWER_ROLES)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Lock submitted applications below quota together with their current
/// reviewers.
async fn needy_applications(
    conn: &mut PgConnection,
    quota: i32,
) -> Result<Vec<NeedyApplication>, sqlx::Error> {
    let rows: Vec<(DbId, DbId, i32)> = sqlx::query_as(
        "SELECT id, user_id, reviews_assigned
         FROM applications
         WHERE status_id = $1 AND reviews_assigned < $2
         ORDER BY reviews_assigned ASC, submitted_at ASC, id ASC
         FOR UPDATE",
    )
    .bind(ApplicationStatus::Submitted.id())
    .bind(quota)
    .fetch_all(&mut *conn)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = rows.iter().map(|(id, _, _)| *id).collect();
    let pairs: Vec<(DbId, DbId)> = sqlx::query_as(
        "SELECT application_id, reviewer_id FROM application_reviews
         WHERE application_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut holders: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (application_id, reviewer_id) in pairs {
        holders.entry(application_id).or_default().push(reviewer_id);
    }

    Ok(rows
        .into_iter()
        .map(|(application_id, author_id, reviews_assigned)| NeedyApplication {
            application_id,
            author_id,
            reviews_assigned,
            assigned_reviewers: holders.remove(&application_id).unwrap_or_default(),
        })
        .collect())
}
