//! Review quota policy: how many reviews each submitted application needs.

use crate::error::CoreError;

/// Quota used when no value has been configured yet.
pub const DEFAULT_REVIEWS_PER_APPLICATION: i32 = 3;

/// Smallest accepted quota.
pub const MIN_REVIEWS_PER_APPLICATION: i32 = 1;

/// Largest accepted quota.
pub const MAX_REVIEWS_PER_APPLICATION: i32 = 10;

/// Validate a quota before it is written.
pub fn validate_reviews_per_application(value: i32) -> Result<(), CoreError> {
    if !(MIN_REVIEWS_PER_APPLICATION..=MAX_REVIEWS_PER_APPLICATION).contains(&value) {
        return Err(CoreError::Validation(format!(
            "reviews_per_application must be between {MIN_REVIEWS_PER_APPLICATION} \
             and {MAX_REVIEWS_PER_APPLICATION}, got {value}"
        )));
    }
    Ok(())
}

/// Bring a stored quota back into range.
///
/// Writes are validated, so an out-of-range value can only come from a
/// hand-edited settings row.
pub fn clamp_reviews_per_application(value: i64) -> i32 {
    value.clamp(
        MIN_REVIEWS_PER_APPLICATION as i64,
        MAX_REVIEWS_PER_APPLICATION as i64,
    ) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_accepted() {
        assert!(validate_reviews_per_application(1).is_ok());
        assert!(validate_reviews_per_application(3).is_ok());
        assert!(validate_reviews_per_application(10).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(validate_reviews_per_application(0).is_err());
        assert!(validate_reviews_per_application(11).is_err());
        assert!(validate_reviews_per_application(-2).is_err());
    }

    #[test]
    fn clamp_restores_range() {
        assert_eq!(clamp_reviews_per_application(0), 1);
        assert_eq!(clamp_reviews_per_application(4), 4);
        assert_eq!(clamp_reviews_per_application(500), 10);
    }
}
