//! Review vote constants and validation functions.
//!
//! Votes are stored as text on `application_reviews.vote`; a `NULL` vote
//! means the assignment is still pending.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a reviewer's notes.
pub const MAX_NOTES_LENGTH: usize = 1_000;

pub const VOTE_ACCEPT: &str = "accept";
pub const VOTE_REJECT: &str = "reject";
pub const VOTE_WAITLIST: &str = "waitlist";

/// All valid vote values.
pub const VALID_VOTES: &[&str] = &[VOTE_ACCEPT, VOTE_REJECT, VOTE_WAITLIST];

/// Message returned when Pull-Next finds nothing to hand out.
pub const NOTHING_TO_REVIEW: &str = "no applications need review";

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate that a vote string is one of the accepted values.
pub fn validate_vote(vote: &str) -> Result<(), CoreError> {
    if VALID_VOTES.contains(&vote) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid vote '{vote}'. Must be one of: {}",
            VALID_VOTES.join(", ")
        )))
    }
}

/// Validate optional reviewer notes.
pub fn validate_notes(notes: Option<&str>) -> Result<(), CoreError> {
    match notes {
        Some(text) if text.chars().count() > MAX_NOTES_LENGTH => Err(CoreError::Validation(
            format!("Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_valid_votes_accepted() {
        for vote in VALID_VOTES {
            assert!(validate_vote(vote).is_ok());
        }
    }

    #[test]
    fn test_invalid_vote_rejected() {
        assert_matches!(validate_vote("maybe"), Err(CoreError::Validation(_)));
        assert_matches!(validate_vote("ACCEPT"), Err(CoreError::Validation(_)));
        assert_matches!(validate_vote(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_notes_length() {
        assert!(validate_notes(None).is_ok());
        assert!(validate_notes(Some("")).is_ok());
        assert!(validate_notes(Some(&"x".repeat(MAX_NOTES_LENGTH))).is_ok());

        let result = validate_notes(Some(&"x".repeat(MAX_NOTES_LENGTH + 1)));
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }
}
