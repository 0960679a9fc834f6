//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use moodlog_core::domain::{
    Category, Food, FoodChanges, FoodEntry, Mood, NewCategory, NewFood, NewFoodEntry, NewMood,
    NewTag, NewUser, Tag, TagChanges, User, UserId,
};
use moodlog_core::error::RepoError;
use moodlog_core::ports::{
    CategoryRepository, FoodRepository, MoodRepository, TagRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::food::{self, Entity as FoodEntity};
use super::entity::food_entry::{self, Entity as FoodEntryEntity};
use super::entity::mood::{self, Entity as MoodEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{OwnedEntity, PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL mood repository.
pub type PostgresMoodRepository = PostgresBaseRepository<MoodEntity>;

/// PostgreSQL food repository, including consumption entries.
pub type PostgresFoodRepository = PostgresBaseRepository<FoodEntity>;

fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

impl OwnedEntity for CategoryEntity {
    fn id_column() -> Self::Column {
        category::Column::Id
    }

    fn owner_column() -> Self::Column {
        category::Column::UserId
    }
}

impl OwnedEntity for TagEntity {
    fn id_column() -> Self::Column {
        tag::Column::Id
    }

    fn owner_column() -> Self::Column {
        tag::Column::UserId
    }
}

impl OwnedEntity for MoodEntity {
    fn id_column() -> Self::Column {
        mood::Column::Id
    }

    fn owner_column() -> Self::Column {
        mood::Column::UserId
    }

    fn listing_condition(owner: i64) -> Condition {
        Condition::all()
            .add(mood::Column::UserId.eq(owner))
            .add(mood::Column::DeletedAt.is_null())
    }
}

impl OwnedEntity for FoodEntity {
    fn id_column() -> Self::Column {
        food::Column::Id
    }

    fn owner_column() -> Self::Column {
        food::Column::UserId
    }
}

/// Mask a username for logging to avoid PII in logs.
fn mask(username: &str) -> String {
    match username.chars().next() {
        Some(first) if username.chars().count() > 1 => format!("{first}***"),
        _ => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %mask(username), "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let now = now();
        let model = user::ActiveModel {
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            app_password_hash: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update_username(&self, id: UserId, username: &str) -> Result<User, RepoError> {
        let model = UserEntity::find_by_id(id.get())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.username = Set(username.to_string());
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn set_app_password(&self, id: UserId, hash: &str) -> Result<(), RepoError> {
        let model = UserEntity::find_by_id(id.get())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.app_password_hash = Set(Some(hash.to_string()));
        active.updated_at = Set(now());

        active.update(&self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::UserId.eq(owner.get()))
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let now = now();
        let model = category::ActiveModel {
            name: Set(new.name),
            user_id: Set(new.user_id.get()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        tracing::debug!(category_id = model.id, user_id = model.user_id, "Category created");
        Ok(model.into())
    }

    async fn rename(&self, id: i64, name: &str) -> Result<Category, RepoError> {
        let model = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: category::ActiveModel = model.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Category>, RepoError> {
        self.find_many_by_id(ids).await
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::UserId.eq(owner.get()))
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewTag) -> Result<Tag, RepoError> {
        let now = now();
        let model = tag::ActiveModel {
            name: Set(new.name),
            user_id: Set(new.user_id.get()),
            is_public: Set(new.is_public),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, changes: TagChanges) -> Result<Tag, RepoError> {
        let model = TagEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: tag::ActiveModel = model.into();
        active.name = Set(changes.name);
        active.is_public = Set(changes.is_public);
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn list_public(&self, viewer: UserId) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::IsPublic.eq(true))
            .filter(tag::Column::UserId.ne(viewer.get()))
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError> {
        self.find_many_by_id(ids).await
    }
}

#[async_trait]
impl MoodRepository for PostgresMoodRepository {
    async fn create(&self, new: NewMood) -> Result<Mood, RepoError> {
        let now = now();
        let model = mood::ActiveModel {
            user_id: Set(new.user_id.get()),
            title: Set(new.title),
            description: Set(new.description),
            emoji: Set(new.emoji),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> Result<Mood, RepoError> {
        let model = MoodEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: mood::ActiveModel = model.into();
        active.deleted_at = Set(Some(at.fixed_offset()));
        active.updated_at = Set(at.fixed_offset());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn list_created_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Mood>, RepoError> {
        let result = MoodEntity::find()
            .filter(MoodEntity::listing_condition(owner.get()))
            .filter(mood::Column::CreatedAt.gte(from.fixed_offset()))
            .filter(mood::Column::CreatedAt.lt(to.fixed_offset()))
            .order_by_desc(mood::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FoodRepository for PostgresFoodRepository {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Food>, RepoError> {
        let result = FoodEntity::find()
            .filter(food::Column::UserId.eq(owner.get()))
            .filter(food::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewFood) -> Result<Food, RepoError> {
        let now = now();
        let model = food::ActiveModel {
            name: Set(new.name),
            calories: Set(new.calories),
            user_id: Set(new.user_id.get()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i64, changes: FoodChanges) -> Result<Food, RepoError> {
        let model = FoodEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: food::ActiveModel = model.into();
        active.name = Set(changes.name);
        active.calories = Set(changes.calories);
        active.updated_at = Set(now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn record_entry(&self, entry: NewFoodEntry) -> Result<FoodEntry, RepoError> {
        let model = food_entry::ActiveModel {
            user_id: Set(entry.user_id.get()),
            food_id: Set(entry.food_id),
            quantity: Set(entry.quantity),
            consumed_at: Set(now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn entries_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, RepoError> {
        let result = FoodEntryEntity::find()
            .filter(food_entry::Column::UserId.eq(owner.get()))
            .filter(food_entry::Column::ConsumedAt.gte(from.fixed_offset()))
            .filter(food_entry::Column::ConsumedAt.lt(to.fixed_offset()))
            .order_by_asc(food_entry::Column::ConsumedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Food>, RepoError> {
        self.find_many_by_id(ids).await
    }
}
