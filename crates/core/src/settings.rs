//! Keys and document shapes stored in the generic `settings` table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Configurable short-answer questions shown to applicants.
pub const KEY_SHORT_ANSWER_QUESTIONS: &str = "short_answer_questions";

/// Review quota (a JSON integer).
pub const KEY_REVIEWS_PER_APPLICATION: &str = "reviews_per_application";

/// Workforce registry document.
pub const KEY_REVIEW_ASSIGNMENT_ENABLED: &str = "review_assignment_enabled";

const MAX_QUESTION_ID_LEN: usize = 50;
const MAX_QUESTION_LEN: usize = 500;

/// A single configurable short-answer question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortAnswerQuestion {
    pub id: String,
    pub question: String,
    pub required: bool,
    pub display_order: i32,
}

/// Validate a full replacement set of questions.
///
/// Rules:
/// - `id` is 1..=50 characters and unique within the set.
/// - `question` is 1..=500 characters.
/// - `display_order` is non-negative.
pub fn validate_questions(questions: &[ShortAnswerQuestion]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for q in questions {
        let id_len = q.id.chars().count();
        if id_len == 0 || id_len > MAX_QUESTION_ID_LEN {
            return Err(CoreError::Validation(format!(
                "Question id must be 1 to {MAX_QUESTION_ID_LEN} characters"
            )));
        }
        let text_len = q.question.chars().count();
        if text_len == 0 || text_len > MAX_QUESTION_LEN {
            return Err(CoreError::Validation(format!(
                "Question '{}' must be 1 to {MAX_QUESTION_LEN} characters",
                q.id
            )));
        }
        if q.display_order < 0 {
            return Err(CoreError::Validation(format!(
                "Question '{}' has a negative display_order",
                q.id
            )));
        }
        if !seen.insert(q.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate question ID: {}",
                q.id
            )));
        }
    }
    Ok(())
}

/// List required questions without a non-blank answer, as
/// `short_answer:<id>` entries.
///
/// `responses` is the applicant's `{question_id: answer}` object. Anything
/// that is not such an object counts as no answers at all.
pub fn missing_short_answers(
    questions: &[ShortAnswerQuestion],
    responses: &serde_json::Value,
) -> Vec<String> {
    let answers: HashMap<String, String> =
        serde_json::from_value(responses.clone()).unwrap_or_default();

    questions
        .iter()
        .filter(|q| q.required)
        .filter(|q| {
            answers
                .get(&q.id)
                .map(|a| a.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|q| format!("short_answer:{}", q.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: &str, required: bool) -> ShortAnswerQuestion {
        ShortAnswerQuestion {
            id: id.to_string(),
            question: format!("Tell us about {id}"),
            required,
            display_order: 0,
        }
    }

    #[test]
    fn valid_questions_pass() {
        assert!(validate_questions(&[question("why", true), question("fun", false)]).is_ok());
        assert!(validate_questions(&[]).is_ok());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = validate_questions(&[question("why", true), question("why", false)]).unwrap_err();
        assert!(err.to_string().contains("duplicate question ID: why"));
    }

    #[test]
    fn empty_question_text_rejected() {
        let mut q = question("why", true);
        q.question.clear();
        assert!(validate_questions(&[q]).is_err());
    }

    #[test]
    fn negative_display_order_rejected() {
        let mut q = question("why", true);
        q.display_order = -1;
        assert!(validate_questions(&[q]).is_err());
    }

    #[test]
    fn blank_required_answers_are_missing() {
        let questions = [question("why", true), question("how", true), question("fun", false)];
        let responses = json!({"why": "because", "how": "   "});
        assert_eq!(
            missing_short_answers(&questions, &responses),
            vec!["short_answer:how".to_string()]
        );
    }

    #[test]
    fn malformed_responses_count_as_unanswered() {
        let questions = [question("why", true)];
        assert_eq!(
            missing_short_answers(&questions, &json!([1, 2])),
            vec!["short_answer:why".to_string()]
        );
    }
}
