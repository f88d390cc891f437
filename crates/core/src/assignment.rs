//! Round-robin planning for batch review assignment.
//!
//! The batch rebalancer hands this module the eligible reviewers (already
//! ordered least-loaded first) and the needy applications (already ordered
//! fewest-reviews first). Planning is pure: it decides which
//! `(application, reviewer)` pairs to attempt, and the caller inserts them.
//!
//! A single rotation cursor is shared across every application in the batch,
//! so consecutive slots land on consecutive reviewers and load spreads
//! evenly. The cursor advances once per reviewer examined, including the
//! ones that get skipped.

use std::collections::HashSet;

use crate::types::DbId;

/// A submitted application whose assigned-review count is below quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedyApplication {
    pub application_id: DbId,
    /// The applicant. Never assigned as a reviewer of their own application.
    pub author_id: DbId,
    pub reviews_assigned: i32,
    /// Reviewers that already hold a record for this application.
    pub assigned_reviewers: Vec<DbId>,
}

impl NeedyApplication {
    /// How many more assignments this application needs under `quota`.
    pub fn slots_needed(&self, quota: i32) -> usize {
        (quota - self.reviews_assigned).max(0) as usize
    }
}

/// One assignment the rebalancer should try to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAssignment {
    pub application_id: DbId,
    pub reviewer_id: DbId,
}

/// Walks the eligible reviewer list with a rotating cursor.
#[derive(Debug)]
pub struct RoundRobinPlanner<'a> {
    reviewers: &'a [DbId],
    cursor: usize,
}

impl<'a> RoundRobinPlanner<'a> {
    pub fn new(reviewers: &'a [DbId]) -> Self {
        Self {
            reviewers,
            cursor: 0,
        }
    }

    /// Current cursor position in the reviewer list.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Plan the missing slots for one application.
    ///
    /// Each slot takes the next reviewer in rotation that is neither the
    /// author nor already holding the application. When a full turn of the
    /// list finds nobody, the remaining slots stay unfilled.
    pub fn plan(&mut self, application: &NeedyApplication, quota: i32) -> Vec<PlannedAssignment> {
        let mut planned = Vec::new();
        if self.reviewers.is_empty() {
            return planned;
        }

        let mut holders: HashSet<DbId> = application.assigned_reviewers.iter().copied().collect();

        for _ in 0..application.slots_needed(quota) {
            let Some(reviewer_id) = self.next_candidate(application.author_id, &holders) else {
                break;
            };
            holders.insert(reviewer_id);
            planned.push(PlannedAssignment {
                application_id: application.application_id,
                reviewer_id,
            });
        }
        planned
    }

    fn next_candidate(&mut self, author_id: DbId, holders: &HashSet<DbId>) -> Option<DbId> {
        for _ in 0..self.reviewers.len() {
            let reviewer_id = self.reviewers[self.cursor];
            self.cursor = (self.cursor + 1) % self.reviewers.len();

            if reviewer_id == author_id || holders.contains(&reviewer_id) {
                continue;
            }
            return Some(reviewer_id);
        }
        None
    }
}

/// Plan a whole batch with one shared rotation.
pub fn plan_assignments(
    reviewers: &[DbId],
    applications: &[NeedyApplication],
    quota: i32,
) -> Vec<PlannedAssignment> {
    let mut planner = RoundRobinPlanner::new(reviewers);
    applications
        .iter()
        .flat_map(|app| planner.plan(app, quota))
        .collect()
}
