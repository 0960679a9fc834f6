//! Storage of users and journal records.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_links;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};
#[cfg(feature = "postgres")]
pub use sea_orm::DbConn;
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_links::PostgresLinkRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresFoodRepository, PostgresMoodRepository,
    PostgresTagRepository, PostgresUserRepository,
};
