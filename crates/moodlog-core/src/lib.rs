//! # Moodlog Core
//!
//! The domain layer of the mood/food journal backend.
//! This crate contains the identity and ownership rules with zero infrastructure
//! dependencies: storage, hashing and token signing are reached through [`ports`].

pub mod domain;
pub mod error;
pub mod identity;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use identity::{AuthContextResolver, Caller};
