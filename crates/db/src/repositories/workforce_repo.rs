//! Persistence for the workforce registry document.
//!
//! The registry is a single `settings` row. Every read-modify-write goes
//! through [`WorkforceRepo::lock`], which holds the row lock until the
//! caller's transaction ends.

use portal_core::settings::KEY_REVIEW_ASSIGNMENT_ENABLED;
use portal_core::types::DbId;
use portal_core::workforce::{RosterEncoding, WorkforceRoster};
use sqlx::{PgConnection, PgPool};

use crate::models::workforce::WorkforceMember;
use crate::repositories::{SettingRepo, UserRepo};

/// Reads and writes the per-reviewer assignment flags.
pub struct WorkforceRepo;

impl WorkforceRepo {
    /// Lock and decode the registry inside the caller's transaction.
    ///
    /// The row is created empty first if missing, so two first-time writers
    /// still serialize on the same lock.
    pub async fn lock(conn: &mut PgConnection) -> Result<WorkforceRoster, sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, '[]'::jsonb)
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(KEY_REVIEW_ASSIGNMENT_ENABLED)
        .execute(&mut *conn)
        .await?;

        let (value,): (serde_json::Value,) =
            sqlx::query_as("SELECT value FROM settings WHERE key = $1 FOR UPDATE")
                .bind(KEY_REVIEW_ASSIGNMENT_ENABLED)
                .fetch_one(&mut *conn)
                .await?;

        decode(&value)
    }

    /// Write the roster back in the current encoding.
    pub async fn store(conn: &mut PgConnection, roster: &WorkforceRoster) -> Result<(), sqlx::Error> {
        SettingRepo::upsert(conn, KEY_REVIEW_ASSIGNMENT_ENABLED, &roster.encode()).await
    }

    /// Lock the registry and backfill entries for reviewer accounts that
    /// have none. Writes only when something was added.
    pub async fn sync(conn: &mut PgConnection) -> Result<WorkforceRoster, sqlx::Error> {
        let mut roster = Self::lock(conn).await?;
        let reviewers = UserRepo::list_reviewers(conn).await?;

        if roster.sync(reviewers.iter().map(|u| (u.id, u.role.as_str()))) {
            tracing::debug!(entries = roster.entries().len(), "Backfilled workforce registry");
            Self::store(conn, &roster).await?;
        }
        Ok(roster)
    }

    /// Set one reviewer's flag in its own transaction.
    ///
    /// Returns whether the stored document changed.
    pub async fn set_enabled(
        pool: &PgPool,
        reviewer_id: DbId,
        enabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut roster = Self::sync(&mut tx).await?;
        let changed = roster.set_enabled(reviewer_id, enabled);
        if changed {
            Self::store(&mut tx, &roster).await?;
        }

        tx.commit().await?;
        tracing::info!(reviewer_id, enabled, changed, "Workforce flag updated");
        Ok(changed)
    }

    /// Every reviewer account with its effective flag. Does not write.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkforceMember>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let roster = Self::read(&mut conn).await?;
        let reviewers = UserRepo::list_reviewers(&mut conn).await?;

        Ok(reviewers
            .into_iter()
            .map(|u| WorkforceMember {
                enabled: roster.effective_enabled(u.id, &u.role),
                reviewer_id: u.id,
                email: u.email,
                role: u.role,
            })
            .collect())
    }

    /// A single reviewer's effective flag. Does not write.
    pub async fn is_enabled(
        pool: &PgPool,
        reviewer_id: DbId,
        role: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let roster = Self::read(&mut conn).await?;
        Ok(roster.effective_enabled(reviewer_id, role))
    }

    /// Unlocked read. A missing row is an empty roster.
    async fn read(conn: &mut PgConnection) -> Result<WorkforceRoster, sqlx::Error> {
        match SettingRepo::get(conn, KEY_REVIEW_ASSIGNMENT_ENABLED).await? {
            Some(value) => decode(&value),
            None => Ok(WorkforceRoster::default()),
        }
    }
}

fn decode(value: &serde_json::Value) -> Result<WorkforceRoster, sqlx::Error> {
    let (roster, encoding) =
        WorkforceRoster::decode(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    if encoding == RosterEncoding::Legacy {
        tracing::warn!(
            entries = roster.entries().len(),
            "Workforce registry uses the legacy id-list encoding; it will be rewritten on the next change"
        );
    }
    Ok(roster)
}
