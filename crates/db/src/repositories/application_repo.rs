//! Repository for the `applications` table.

use portal_core::pagination::{assemble_page, ApplicationCursor, Page, PageDirection};
use portal_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{
    Application, ApplicationListItem, ApplicationStats, UpdateApplication,
};
use crate::models::status::ApplicationStatus;

/// Column list shared across queries to avoid repetition.
///
/// The status name is resolved with a scalar subquery so the list also works
/// in `RETURNING` clauses.
const COLUMNS: &str = "id, user_id, status_id, \
    (SELECT s.name FROM application_statuses s WHERE s.id = status_id) AS status, \
    first_name, last_name, phone_e164, age, country_of_residence, gender, race, ethnicity, \
    university, major, level_of_study, short_answer_responses, \
    hackathons_attended_count, software_experience_level, heard_about, \
    shirt_size, dietary_restrictions, accommodations, github, linkedin, website, \
    ack_application, ack_mlh_coc, ack_mlh_privacy, opt_in_mlh_emails, \
    reviews_assigned, submitted_at, created_at, updated_at";

/// Column list for the admin listing; expects `a`, `u` and `s` aliases.
const LIST_COLUMNS: &str = "a.id, a.user_id, u.email, s.name AS status, \
    a.first_name, a.last_name, a.university, a.submitted_at, a.created_at";

/// Provides application lifecycle operations and the admin listing.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Find an application by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the application owned by a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE user_id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create an empty draft for a user.
    ///
    /// Fails with a unique violation on `uq_applications_user` if the user
    /// already has one.
    pub async fn create(pool: &PgPool, user_id: DbId) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (user_id, status_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .bind(ApplicationStatus::Draft.id())
            .fetch_one(pool)
            .await
    }

    /// Return the user's application, creating a draft on first access.
    pub async fn get_or_create_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query(
            "INSERT INTO applications (user_id, status_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_applications_user DO NOTHING",
        )
        .bind(user_id)
        .bind(ApplicationStatus::Draft.id())
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM applications WHERE user_id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Patch the user's draft. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the user has no application or it is no longer a
    /// draft.
    pub async fn update_draft(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone_e164 = COALESCE($5, phone_e164),
                age = COALESCE($6, age),
                country_of_residence = COALESCE($7, country_of_residence),
                gender = COALESCE($8, gender),
                race = COALESCE($9, race),
                ethnicity = COALESCE($10, ethnicity),
                university = COALESCE($11, university),
                major = COALESCE($12, major),
                level_of_study = COALESCE($13, level_of_study),
                short_answer_responses = COALESCE($14, short_answer_responses),
                hackathons_attended_count = COALESCE($15, hackathons_attended_count),
                software_experience_level = COALESCE($16, software_experience_level),
                heard_about = COALESCE($17, heard_about),
                shirt_size = COALESCE($18, shirt_size),
                dietary_restrictions = COALESCE($19, dietary_restrictions),
                accommodations = COALESCE($20, accommodations),
                github = COALESCE($21, github),
                linkedin = COALESCE($22, linkedin),
                website = COALESCE($23, website),
                ack_application = COALESCE($24, ack_application),
                ack_mlh_coc = COALESCE($25, ack_mlh_coc),
                ack_mlh_privacy = COALESCE($26, ack_mlh_privacy),
                opt_in_mlh_emails = COALESCE($27, opt_in_mlh_emails)
             WHERE user_id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(user_id)
            .bind(ApplicationStatus::Draft.id())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_e164)
            .bind(input.age)
            .bind(&input.country_of_residence)
            .bind(&input.gender)
            .bind(&input.race)
            .bind(&input.ethnicity)
            .bind(&input.university)
            .bind(&input.major)
            .bind(&input.level_of_study)
            .bind(&input.short_answer_responses)
            .bind(input.hackathons_attended_count)
            .bind(&input.software_experience_level)
            .bind(&input.heard_about)
            .bind(&input.shirt_size)
            .bind(&input.dietary_restrictions)
            .bind(&input.accommodations)
            .bind(&input.github)
            .bind(&input.linkedin)
            .bind(&input.website)
            .bind(input.ack_application)
            .bind(input.ack_mlh_coc)
            .bind(input.ack_mlh_privacy)
            .bind(input.opt_in_mlh_emails)
            .fetch_optional(pool)
            .await
    }

    /// Move a draft to `submitted` and stamp `submitted_at`.
    ///
    /// Returns `None` if the application is not a draft.
    pub async fn submit(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status_id = $2, submitted_at = NOW()
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(ApplicationStatus::Submitted.id())
            .bind(ApplicationStatus::Draft.id())
            .fetch_optional(pool)
            .await
    }

    /// Record a decision on a submitted application.
    ///
    /// Returns `None` if the application is not currently `submitted`.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(status.id())
            .bind(ApplicationStatus::Submitted.id())
            .fetch_optional(pool)
            .await
    }

    /// Keyset-paginated admin listing, newest first.
    ///
    /// Fetches one row past `limit` to learn whether more rows exist. A
    /// backward request without a cursor has nothing to go back from and is
    /// served as the first forward page.
    pub async fn list(
        pool: &PgPool,
        status: Option<ApplicationStatus>,
        cursor: Option<ApplicationCursor>,
        direction: PageDirection,
        limit: i64,
    ) -> Result<Page<ApplicationListItem>, sqlx::Error> {
        let direction = match (direction, cursor) {
            (PageDirection::Backward, None) => PageDirection::Forward,
            (d, _) => d,
        };

        let (seek, order) = match direction {
            PageDirection::Forward => ("<", "DESC"),
            PageDirection::Backward => (">", "ASC"),
        };

        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM applications a
             JOIN users u ON u.id = a.user_id
             JOIN application_statuses s ON s.id = a.status_id
             WHERE ($1::SMALLINT IS NULL OR a.status_id = $1)
               AND ($2::TIMESTAMPTZ IS NULL OR (a.created_at, a.id) {seek} ($2, $3::BIGINT))
             ORDER BY a.created_at {order}, a.id {order}
             LIMIT $4"
        );
        let rows = sqlx::query_as::<_, ApplicationListItem>(&query)
            .bind(status.map(ApplicationStatus::id))
            .bind(cursor.map(|c| c.created_at))
            .bind(cursor.map(|c| c.id))
            .bind(limit + 1)
            .fetch_all(pool)
            .await?;

        Ok(assemble_page(
            rows,
            limit as usize,
            direction,
            cursor.is_some(),
            |row| ApplicationCursor::new(row.created_at, row.id),
        ))
    }

    /// Counts per status plus the overall total.
    pub async fn stats(pool: &PgPool) -> Result<ApplicationStats, sqlx::Error> {
        sqlx::query_as::<_, ApplicationStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status_id = $1) AS draft,
                COUNT(*) FILTER (WHERE status_id = $2) AS submitted,
                COUNT(*) FILTER (WHERE status_id = $3) AS accepted,
                COUNT(*) FILTER (WHERE status_id = $4) AS rejected,
                COUNT(*) FILTER (WHERE status_id = $5) AS waitlisted
             FROM applications",
        )
        .bind(ApplicationStatus::Draft.id())
        .bind(ApplicationStatus::Submitted.id())
        .bind(ApplicationStatus::Accepted.id())
        .bind(ApplicationStatus::Rejected.id())
        .bind(ApplicationStatus::Waitlisted.id())
        .fetch_one(pool)
        .await
    }
}
