//! Repository for the key/value `settings` table.

use portal_core::quota::{clamp_reviews_per_application, DEFAULT_REVIEWS_PER_APPLICATION};
use portal_core::settings::{
    ShortAnswerQuestion, KEY_REVIEWS_PER_APPLICATION, KEY_SHORT_ANSWER_QUESTIONS,
};
use sqlx::{PgExecutor, PgPool};

/// Reads and writes JSON setting documents.
pub struct SettingRepo;

impl SettingRepo {
    /// Fetch a raw setting value. `None` if the key was never written.
    pub async fn get<'e>(
        executor: impl PgExecutor<'e>,
        key: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Insert or replace a setting value.
    pub async fn upsert<'e>(
        executor: impl PgExecutor<'e>,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Current review quota, defaulted when unset and clamped into range.
    pub async fn reviews_per_application(pool: &PgPool) -> Result<i32, sqlx::Error> {
        let value = Self::get(pool, KEY_REVIEWS_PER_APPLICATION).await?;
        let quota = match value.as_ref().and_then(|v| v.as_i64()) {
            Some(n) => clamp_reviews_per_application(n),
            None => {
                if value.is_some() {
                    tracing::warn!(?value, "Non-integer review quota stored, using default");
                }
                DEFAULT_REVIEWS_PER_APPLICATION
            }
        };
        Ok(quota)
    }

    /// Persist a review quota. The caller validates the range first.
    pub async fn set_reviews_per_application(pool: &PgPool, quota: i32) -> Result<(), sqlx::Error> {
        Self::upsert(pool, KEY_REVIEWS_PER_APPLICATION, &serde_json::json!(quota)).await
    }

    /// Configured short-answer questions ordered by `display_order`.
    pub async fn short_answer_questions(
        pool: &PgPool,
    ) -> Result<Vec<ShortAnswerQuestion>, sqlx::Error> {
        let Some(value) = Self::get(pool, KEY_SHORT_ANSWER_QUESTIONS).await? else {
            return Ok(Vec::new());
        };
        let mut questions: Vec<ShortAnswerQuestion> =
            serde_json::from_value(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        questions.sort_by_key(|q| q.display_order);
        Ok(questions)
    }

    /// Replace the whole question set. The caller validates it first.
    pub async fn set_short_answer_questions(
        pool: &PgPool,
        questions: &[ShortAnswerQuestion],
    ) -> Result<(), sqlx::Error> {
        let value = serde_json::to_value(questions).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        Self::upsert(pool, KEY_SHORT_ANSWER_QUESTIONS, &value).await
    }
}
