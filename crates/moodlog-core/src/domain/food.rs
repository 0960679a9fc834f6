use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Food entity - a user-owned food with its calorie count.
///
/// `(name, user_id)` is unique; categories are attached through links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub calories: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub calories: i32,
    pub user_id: UserId,
}

/// Mutable fields of a food.
#[derive(Debug, Clone)]
pub struct FoodChanges {
    pub name: String,
    pub calories: i32,
}

/// One consumption of a food by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub user_id: UserId,
    pub food_id: i64,
    pub quantity: i32,
    pub consumed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub user_id: UserId,
    pub food_id: i64,
    pub quantity: i32,
}
