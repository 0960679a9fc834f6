//! SeaORM entities, one module per table.

pub mod category;
pub mod food;
pub mod food_category;
pub mod food_entry;
pub mod mood;
pub mod mood_category;
pub mod mood_tag;
pub mod tag;
pub mod user;
