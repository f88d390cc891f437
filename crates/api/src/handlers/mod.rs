pub mod admin_applications;
pub mod applications;
pub mod reviews;
pub mod settings;

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Slack on top of a database deadline so the server-side timeout normally
/// fires first and rolls the transaction back itself.
const DEADLINE_GRACE: Duration = Duration::from_secs(1);

/// Run a repository call under a wall-clock deadline.
///
/// On expiry the future is dropped, which rolls back any open transaction,
/// and the caller gets a retryable 503.
pub(crate) async fn with_deadline<T, F>(
    operation: &'static str,
    deadline: Duration,
    fut: F,
) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline + DEADLINE_GRACE, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::Timeout(format!(
            "{operation} exceeded {}s",
            deadline.as_secs()
        ))),
    }
}
