//! Repository for the `users` table.

use portal_core::roles::{is_reviewer_role, REVIEWER_ROLES, ROLE_HACKER};
use portal_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, User};
use crate::repositories::WorkforceRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, email, role, created_at, updated_at";

/// Provides account lookups and creation.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A reviewer account gets its workforce registry entry in the same
    /// transaction, so it never exists without one.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (external_id, email, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(input.role.as_deref().unwrap_or(ROLE_HACKER))
            .fetch_one(&mut *tx)
            .await?;

        if is_reviewer_role(&user.role) {
            let mut roster = WorkforceRepo::lock(&mut tx).await?;
            if roster.sync([(user.id, user.role.as_str())]) {
                WorkforceRepo::store(&mut tx, &roster).await?;
            }
        }

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by identity-provider subject.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE external_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve an identity-provider subject, creating the account on first
    /// sight.
    ///
    /// Two first requests for the same subject can race; the loser of the
    /// `uq_users_external_id` insert reads the winner's row.
    pub async fn find_or_create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        if let Some(user) = Self::find_by_external_id(pool, &input.external_id).await? {
            return Ok(user);
        }

        match Self::create(pool, input).await {
            Ok(user) => {
                tracing::info!(
                    user_id = user.id,
                    role = %user.role,
                    "Provisioned account on first login"
                );
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("uq_users_external_id") =>
            {
                Self::find_by_external_id(pool, &input.external_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Every admin and super-admin account, oldest first.
    pub async fn list_reviewers(conn: &mut PgConnection) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = ANY($1)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(REVIEWER_ROLES)
            .fetch_all(conn)
            .await
    }
}
