//! Core services.
//!
//! Every operation takes the verified [`Caller`](crate::Caller) and checks
//! ownership against it before touching storage. Records owned by someone
//! else are reported as not found.

mod accounts;
mod categories;
mod foods;
mod links;
mod moods;
mod tags;

pub use accounts::{AccountService, Session};
pub use categories::CategoryService;
pub use foods::{EntryView, FoodDraft, FoodService, FoodView};
pub use moods::{MoodDraft, MoodService, MoodView};
pub use tags::TagService;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::{DomainError, RepoError};

/// Trim a required text field, rejecting blank input.
pub(crate) fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Map a storage error, reporting a uniqueness violation with `message`.
pub(crate) fn unique(err: RepoError, message: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Conflict(message.to_string()),
        other => other.into(),
    }
}

/// The UTC half-open interval covering `day`.
pub(crate) fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + TimeDelta::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Breakfast ").unwrap(), "Breakfast");
        assert!(matches!(
            required("name", "   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_day_bounds_span_one_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let (from, to) = day_bounds(day);
        assert_eq!(from.to_rfc3339(), "2024-03-09T00:00:00+00:00");
        assert_eq!(to - from, TimeDelta::days(1));
    }
}
