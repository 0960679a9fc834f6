//! PostgreSQL storage of the many-to-many link tables.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use moodlog_core::error::RepoError;
use moodlog_core::ports::{LinkKind, LinkRepository};

use super::entity::{food_category, mood_category, mood_tag};
use super::postgres_base::map_db_err;

/// A two-column link table keyed by both ends.
trait LinkTable: EntityTrait {
    fn left() -> Self::Column;

    fn right() -> Self::Column;

    fn row(left: i64, right: i64) -> Self::ActiveModel;
}

impl LinkTable for mood_category::Entity {
    fn left() -> Self::Column {
        mood_category::Column::MoodId
    }

    fn right() -> Self::Column {
        mood_category::Column::CategoryId
    }

    fn row(left: i64, right: i64) -> Self::ActiveModel {
        mood_category::ActiveModel {
            mood_id: Set(left),
            category_id: Set(right),
        }
    }
}

impl LinkTable for mood_tag::Entity {
    fn left() -> Self::Column {
        mood_tag::Column::MoodId
    }

    fn right() -> Self::Column {
        mood_tag::Column::TagId
    }

    fn row(left: i64, right: i64) -> Self::ActiveModel {
        mood_tag::ActiveModel {
            mood_id: Set(left),
            tag_id: Set(right),
        }
    }
}

impl LinkTable for food_category::Entity {
    fn left() -> Self::Column {
        food_category::Column::FoodId
    }

    fn right() -> Self::Column {
        food_category::Column::CategoryId
    }

    fn row(left: i64, right: i64) -> Self::ActiveModel {
        food_category::ActiveModel {
            food_id: Set(left),
            category_id: Set(right),
        }
    }
}

async fn insert<E: LinkTable>(db: &DbConn, left: i64, right: i64) -> Result<(), RepoError>
where
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    E::insert(E::row(left, right))
        .exec_without_returning(db)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

async fn remove<E: LinkTable>(db: &DbConn, left: i64, right: i64) -> Result<(), RepoError> {
    let result = E::delete_many()
        .filter(E::left().eq(left))
        .filter(E::right().eq(right))
        .exec(db)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected == 0 {
        return Err(RepoError::NotFound);
    }
    Ok(())
}

async fn exists<E: LinkTable>(db: &DbConn, left: i64, right: i64) -> Result<bool, RepoError>
where
    E::Model: Sync,
{
    let count = E::find()
        .filter(E::left().eq(left))
        .filter(E::right().eq(right))
        .count(db)
        .await
        .map_err(map_db_err)?;
    Ok(count > 0)
}

async fn select_where<E: LinkTable>(
    db: &DbConn,
    wanted: E::Column,
    key: E::Column,
    value: i64,
) -> Result<Vec<i64>, RepoError> {
    E::find()
        .select_only()
        .column(wanted)
        .filter(key.eq(value))
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(map_db_err)
}

async fn rights_of<E: LinkTable>(db: &DbConn, left: i64) -> Result<Vec<i64>, RepoError> {
    select_where::<E>(db, E::right(), E::left(), left).await
}

async fn lefts_of<E: LinkTable>(db: &DbConn, right: i64) -> Result<Vec<i64>, RepoError> {
    select_where::<E>(db, E::left(), E::right(), right).await
}

async fn remove_all<E: LinkTable>(db: &DbConn, left: i64) -> Result<u64, RepoError> {
    let result = E::delete_many()
        .filter(E::left().eq(left))
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected)
}

/// Dispatch a generic link-table helper on the table for `kind`.
macro_rules! per_table {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            LinkKind::MoodCategory => $func::<mood_category::Entity>($($arg),*).await,
            LinkKind::MoodTag => $func::<mood_tag::Entity>($($arg),*).await,
            LinkKind::FoodCategory => $func::<food_category::Entity>($($arg),*).await,
        }
    };
}

/// PostgreSQL link repository over `mood_categories`, `mood_tags` and
/// `food_categories`.
pub struct PostgresLinkRepository {
    db: DbConn,
}

impl PostgresLinkRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkRepository for PostgresLinkRepository {
    async fn link(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError> {
        per_table!(kind, insert(&self.db, left, right))
    }

    async fn unlink(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError> {
        per_table!(kind, remove(&self.db, left, right))
    }

    async fn is_linked(&self, kind: LinkKind, left: i64, right: i64) -> Result<bool, RepoError> {
        per_table!(kind, exists(&self.db, left, right))
    }

    async fn linked(&self, kind: LinkKind, left: i64) -> Result<Vec<i64>, RepoError> {
        per_table!(kind, rights_of(&self.db, left))
    }

    async fn linked_to(&self, kind: LinkKind, right: i64) -> Result<Vec<i64>, RepoError> {
        per_table!(kind, lefts_of(&self.db, right))
    }

    async fn unlink_all(&self, kind: LinkKind, left: i64) -> Result<u64, RepoError> {
        per_table!(kind, remove_all(&self.db, left))
    }
}
