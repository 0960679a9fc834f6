//! # Moodlog Shared
//!
//! Request and response bodies of the journal API, shared by the server and
//! any Rust client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, MessageResponse};
