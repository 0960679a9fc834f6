//! Domain values to response bodies.

use moodlog_core::domain::{Category, Tag, User};
use moodlog_core::services::{EntryView, FoodView, MoodView, Session};
use moodlog_shared::dto::{
    AuthResponse, CategoryResponse, FoodEntryResponse, FoodResponse, MoodResponse, TagResponse,
    UserResponse,
};

pub fn auth(session: Session) -> AuthResponse {
    AuthResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id.get(),
        has_app_password: user.has_app_password(),
        username: user.username,
        created_at: user.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        user_id: category.user_id.get(),
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
        user_id: tag.user_id.get(),
        is_public: tag.is_public,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
    }
}

pub fn mood(view: MoodView) -> MoodResponse {
    let MoodView {
        mood,
        tags,
        categories,
    } = view;

    MoodResponse {
        id: mood.id,
        user_id: mood.user_id.get(),
        title: mood.title,
        description: mood.description,
        emoji: mood.emoji,
        created_at: mood.created_at,
        updated_at: mood.updated_at,
        deleted_at: mood.deleted_at,
        tags: tags.into_iter().map(tag).collect(),
        categories: categories.into_iter().map(category).collect(),
    }
}

pub fn food(view: FoodView) -> FoodResponse {
    let FoodView { food, categories } = view;

    FoodResponse {
        id: food.id,
        name: food.name,
        calories: food.calories,
        user_id: food.user_id.get(),
        created_at: food.created_at,
        updated_at: food.updated_at,
        categories: categories.into_iter().map(category).collect(),
    }
}

pub fn entry(view: EntryView) -> FoodEntryResponse {
    FoodEntryResponse {
        id: view.entry.id,
        food_id: view.food.id,
        food_name: view.food.name,
        calories: view.food.calories,
        quantity: view.entry.quantity,
        consumed_at: view.entry.consumed_at,
    }
}
