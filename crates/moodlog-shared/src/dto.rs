//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub has_app_password: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
}

/// Body of the app password endpoints and of account deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPasswordRequest {
    pub app_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPasswordStatus {
    pub is_set: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of `GET /api/tags`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagListQuery {
    #[serde(default)]
    pub include_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodRequest {
    pub title: String,
    pub description: String,
    pub emoji: String,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// A mood with its tags and categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub tags: Vec<TagResponse>,
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRequest {
    pub name: String,
    pub calories: i32,
    pub category_id: i64,
}

/// Body of `POST /api/foods/multiple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFoodRequest {
    pub foods: Vec<FoodRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFoodRequest {
    pub name: String,
    pub calories: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodResponse {
    pub id: i64,
    pub name: String,
    pub calories: i32,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub categories: Vec<CategoryResponse>,
}

/// Query string of `GET /api/foods`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodListQuery {
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryRequest {
    pub quantity: i32,
}

/// A consumption entry with the name and calories of its food.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryResponse {
    pub id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub calories: i32,
    pub quantity: i32,
    pub consumed_at: DateTime<Utc>,
}
