//! Applicant application models.

use portal_core::application::missing_fields;
use portal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `applications` table, with the status name resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub status_id: StatusId,
    pub status: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_e164: Option<String>,
    pub age: Option<i16>,
    pub country_of_residence: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub level_of_study: Option<String>,

    pub short_answer_responses: serde_json::Value,

    pub hackathons_attended_count: Option<i16>,
    pub software_experience_level: Option<String>,
    pub heard_about: Option<String>,
    pub shirt_size: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub accommodations: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,

    pub ack_application: bool,
    pub ack_mlh_coc: bool,
    pub ack_mlh_privacy: bool,
    pub opt_in_mlh_emails: bool,

    pub reviews_assigned: i32,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    /// Profile fields and acknowledgements required before submission.
    ///
    /// Short-answer questions are checked separately against the configured
    /// question set.
    pub fn missing_required_fields(&self) -> Vec<String> {
        fn set(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        missing_fields([
            ("first_name", set(&self.first_name)),
            ("last_name", set(&self.last_name)),
            ("phone_e164", set(&self.phone_e164)),
            ("age", self.age.is_some()),
            ("country_of_residence", set(&self.country_of_residence)),
            ("gender", set(&self.gender)),
            ("race", set(&self.race)),
            ("ethnicity", set(&self.ethnicity)),
            ("university", set(&self.university)),
            ("major", set(&self.major)),
            ("level_of_study", set(&self.level_of_study)),
            ("hackathons_attended_count", self.hackathons_attended_count.is_some()),
            ("software_experience_level", set(&self.software_experience_level)),
            ("heard_about", set(&self.heard_about)),
            ("shirt_size", set(&self.shirt_size)),
            ("ack_application", self.ack_application),
            ("ack_mlh_coc", self.ack_mlh_coc),
            ("ack_mlh_privacy", self.ack_mlh_privacy),
        ])
    }
}

/// DTO for patching a draft. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_e164: Option<String>,
    pub age: Option<i16>,
    pub country_of_residence: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub level_of_study: Option<String>,
    pub short_answer_responses: Option<serde_json::Value>,
    pub hackathons_attended_count: Option<i16>,
    pub software_experience_level: Option<String>,
    pub heard_about: Option<String>,
    pub shirt_size: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub accommodations: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub ack_application: Option<bool>,
    pub ack_mlh_coc: Option<bool>,
    pub ack_mlh_privacy: Option<bool>,
    pub opt_in_mlh_emails: Option<bool>,
}

/// Lightweight row for the admin list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationListItem {
    pub id: DbId,
    pub user_id: DbId,
    pub email: String,
    pub status: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Application counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub draft: i64,
    pub submitted: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub waitlisted: i64,
}
