//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenService};
pub use repository::{
    BaseRepository, CategoryRepository, FoodRepository, LinkKind, LinkRepository,
    MoodRepository, OwnedRepository, TagRepository, UserRepository,
};
