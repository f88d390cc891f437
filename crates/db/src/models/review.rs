//! Review assignment models.

use portal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `application_reviews` table.
///
/// `vote` is `None` while the assignment is pending.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationReview {
    pub id: DbId,
    pub application_id: DbId,
    pub reviewer_id: DbId,
    pub vote: Option<String>,
    pub notes: Option<String>,
    pub assigned_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A reviewer's own record joined with the application summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithApplication {
    pub id: DbId,
    pub application_id: DbId,
    pub vote: Option<String>,
    pub notes: Option<String>,
    pub assigned_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub submitted_at: Option<Timestamp>,
}

/// Non-empty reviewer notes for one application, without the vote.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewerNote {
    pub reviewer_id: DbId,
    pub reviewer_email: String,
    pub notes: String,
    pub reviewed_at: Option<Timestamp>,
}

/// DTO for submitting a vote on an assigned review.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitVote {
    pub vote: String,
    pub notes: Option<String>,
}

/// Result of one batch rebalance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebalanceOutcome {
    /// Assignment records inserted.
    pub reviews_created: u64,
    /// Pending records removed from disabled reviewers.
    pub reviews_evicted: u64,
}
