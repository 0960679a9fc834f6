//! Domain entities - the core business objects.

mod category;
mod food;
mod mood;
mod tag;
mod user;

pub use category::{Category, NewCategory};
pub use food::{Food, FoodChanges, FoodEntry, NewFood, NewFoodEntry};
pub use mood::{Mood, NewMood};
pub use tag::{NewTag, Tag, TagChanges};
pub use user::{NewUser, User, UserId};
