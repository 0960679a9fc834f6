use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PrimaryKeyTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use moodlog_core::domain::UserId;
use moodlog_core::error::RepoError;
use moodlog_core::ports::{BaseRepository, OwnedRepository};

/// Map a SeaORM error, keeping unique violations distinguishable.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => return RepoError::NotFound,
        _ => {}
    }

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => RepoError::Connection(err.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => {
            let err_str = other.to_string();
            // Drivers that do not expose an error code still say so in the message.
            if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                RepoError::Constraint(err_str)
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}

/// A table whose rows carry an owning user.
pub trait OwnedEntity: EntityTrait {
    fn id_column() -> Self::Column;

    fn owner_column() -> Self::Column;

    /// Which of an owner's rows appear in listings.
    fn listing_condition(owner: i64) -> Condition {
        Condition::all().add(Self::owner_column().eq(owner))
    }
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> PostgresBaseRepository<E>
where
    E: OwnedEntity,
{
    /// Fetch rows by id, in id order, regardless of owner.
    pub(crate) async fn find_many_by_id<T>(&self, ids: &[i64]) -> Result<Vec<T>, RepoError>
    where
        T: From<E::Model>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = E::find()
            .filter(E::id_column().is_in(ids.iter().copied()))
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl<E, T> OwnedRepository<T> for PostgresBaseRepository<E>
where
    E: OwnedEntity,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_owned(&self, owner: UserId, id: i64) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .filter(E::owner_column().eq(owner.get()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_owned(&self, owner: UserId) -> Result<Vec<T>, RepoError> {
        let result = E::find()
            .filter(E::listing_condition(owner.get()))
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
