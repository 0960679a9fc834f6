//! Persistence ports.
//!
//! Implementations must enforce uniqueness themselves and report a violation
//! as [`RepoError::Constraint`]; the services' own existence checks only give
//! better error messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Category, Food, FoodChanges, FoodEntry, Mood, NewCategory, NewFood, NewFoodEntry, NewMood,
    NewTag, NewUser, Tag, TagChanges, User, UserId,
};
use crate::error::RepoError;

/// Generic repository trait defining lookups and removal by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID, regardless of owner.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Link rows pointing at it go with it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Repository of records carrying an owning user.
#[async_trait]
pub trait OwnedRepository<T>: BaseRepository<T, i64> {
    /// Find a record by id only if `owner` owns it.
    async fn find_owned(&self, owner: UserId, id: i64) -> Result<Option<T>, RepoError>;

    /// List the records `owner` can see in listings.
    async fn list_owned(&self, owner: UserId) -> Result<Vec<T>, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn update_username(&self, id: UserId, username: &str) -> Result<User, RepoError>;

    /// Store the app password digest. The login password is untouched.
    async fn set_app_password(&self, id: UserId, hash: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryRepository: OwnedRepository<Category> {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Category>, RepoError>;

    async fn create(&self, category: NewCategory) -> Result<Category, RepoError>;

    async fn rename(&self, id: i64, name: &str) -> Result<Category, RepoError>;

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait TagRepository: OwnedRepository<Tag> {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn create(&self, tag: NewTag) -> Result<Tag, RepoError>;

    async fn update(&self, id: i64, changes: TagChanges) -> Result<Tag, RepoError>;

    /// Public tags owned by anyone other than `viewer`.
    async fn list_public(&self, viewer: UserId) -> Result<Vec<Tag>, RepoError>;

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError>;
}

#[async_trait]
pub trait MoodRepository: OwnedRepository<Mood> {
    async fn create(&self, mood: NewMood) -> Result<Mood, RepoError>;

    /// Mark a mood deleted; it stays fetchable by id.
    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> Result<Mood, RepoError>;

    /// Active moods of `owner` created in `[from, to)`.
    async fn list_created_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Mood>, RepoError>;
}

#[async_trait]
pub trait FoodRepository: OwnedRepository<Food> {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Food>, RepoError>;

    async fn create(&self, food: NewFood) -> Result<Food, RepoError>;

    async fn update(&self, id: i64, changes: FoodChanges) -> Result<Food, RepoError>;

    async fn record_entry(&self, entry: NewFoodEntry) -> Result<FoodEntry, RepoError>;

    /// Entries of `owner` consumed in `[from, to)`, oldest first.
    async fn entries_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, RepoError>;

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Food>, RepoError>;
}

/// The many-to-many associations between records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Mood (left) to Category (right).
    MoodCategory,
    /// Mood (left) to Tag (right).
    MoodTag,
    /// Food (left) to Category (right).
    FoodCategory,
}

/// Storage of association rows. Endpoint ownership is checked by the caller.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Insert a link; an existing identical link is a [`RepoError::Constraint`].
    async fn link(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError>;

    /// Remove a link; a missing link is [`RepoError::NotFound`].
    async fn unlink(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError>;

    async fn is_linked(&self, kind: LinkKind, left: i64, right: i64) -> Result<bool, RepoError>;

    /// Right-hand ids linked to `left`.
    async fn linked(&self, kind: LinkKind, left: i64) -> Result<Vec<i64>, RepoError>;

    /// Left-hand ids linked to `right`.
    async fn linked_to(&self, kind: LinkKind, right: i64) -> Result<Vec<i64>, RepoError>;

    /// Remove every link of `left`, returning how many were removed.
    async fn unlink_all(&self, kind: LinkKind, left: i64) -> Result<u64, RepoError>;
}
