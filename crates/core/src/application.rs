//! Application lifecycle names and decision validation.
//!
//! ```text
//! draft --submit--> submitted --decide--> accepted | rejected | waitlisted
//! ```
//!
//! Only `submitted` applications are eligible for review assignment.

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_WAITLISTED: &str = "waitlisted";

/// All status names, in lookup-table order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_ACCEPTED,
    STATUS_REJECTED,
    STATUS_WAITLISTED,
];

/// Statuses a submitted application can be moved to by a decision.
pub const DECISION_STATUSES: &[&str] = &[STATUS_ACCEPTED, STATUS_REJECTED, STATUS_WAITLISTED];

/// Validate a status filter value.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate the target of a decision on a submitted application.
pub fn validate_decision(status: &str) -> Result<(), CoreError> {
    if DECISION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid decision '{status}'. Must be one of: {}",
            DECISION_STATUSES.join(", ")
        )))
    }
}

/// Collect the names of profile fields that are still unset.
///
/// Each entry pairs a field name with whether it has a value.
pub fn missing_fields<'a>(fields: impl IntoIterator<Item = (&'a str, bool)>) -> Vec<String> {
    fields
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_validate() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("pending").is_err());
    }

    #[test]
    fn decisions_exclude_draft_and_submitted() {
        assert!(validate_decision(STATUS_ACCEPTED).is_ok());
        assert!(validate_decision(STATUS_WAITLISTED).is_ok());
        assert!(validate_decision(STATUS_DRAFT).is_err());
        assert!(validate_decision(STATUS_SUBMITTED).is_err());
    }

    #[test]
    fn missing_fields_keeps_order() {
        let missing = missing_fields([("first_name", true), ("age", false), ("major", false)]);
        assert_eq!(missing, vec!["age".to_string(), "major".to_string()]);
    }
}
