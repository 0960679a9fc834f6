use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Tag entity - a user-owned label that other users may see when public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub user_id: UserId,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Whether `user` may read or link this tag.
    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.user_id == user || self.is_public
    }
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub user_id: UserId,
    pub is_public: bool,
}

/// Mutable fields of a tag.
#[derive(Debug, Clone)]
pub struct TagChanges {
    pub name: String,
    pub is_public: bool,
}
