use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Mood entity - a journal entry.
///
/// Moods are soft-deleted: `deleted_at` is set and the entry drops out of
/// listings but can still be fetched by id by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub id: i64,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Mood {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewMood {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub emoji: String,
}
