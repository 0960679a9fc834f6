use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{Category, Food, FoodChanges, FoodEntry, NewFood, NewFoodEntry};
use crate::error::DomainError;
use crate::identity::Caller;
use crate::ports::{
    BaseRepository, CategoryRepository, FoodRepository, LinkKind, LinkRepository,
    OwnedRepository,
};

use super::links::{attach, detach};
use super::{day_bounds, required, unique};

const DUPLICATE: &str = "A food with this name already exists";

/// Input for a new food.
#[derive(Debug, Clone)]
pub struct FoodDraft {
    pub name: String,
    pub calories: i32,
    pub category_id: i64,
}

/// A food with its categories.
#[derive(Debug, Clone)]
pub struct FoodView {
    pub food: Food,
    pub categories: Vec<Category>,
}

/// A consumption entry with the food it refers to.
#[derive(Debug, Clone)]
pub struct EntryView {
    pub entry: FoodEntry,
    pub food: Food,
}

/// Food operations, scoped to the caller.
///
/// Unlike categories and tags, creating a food whose name already exists
/// returns the existing food.
#[derive(Clone)]
pub struct FoodService {
    foods: Arc<dyn FoodRepository>,
    categories: Arc<dyn CategoryRepository>,
    links: Arc<dyn LinkRepository>,
}

impl FoodService {
    pub fn new(
        foods: Arc<dyn FoodRepository>,
        categories: Arc<dyn CategoryRepository>,
        links: Arc<dyn LinkRepository>,
    ) -> Self {
        Self {
            foods,
            categories,
            links,
        }
    }

    /// Create a food in an owned category, or return the caller's food of the
    /// same name. The flag is `true` when a new food was written.
    pub async fn create(
        &self,
        caller: &Caller,
        draft: FoodDraft,
    ) -> Result<(FoodView, bool), DomainError> {
        let name = required("name", &draft.name)?;
        if draft.calories < 0 {
            return Err(DomainError::Validation("calories must not be negative".to_string()));
        }

        let category = self.owned_category(caller, draft.category_id).await?;

        if let Some(existing) = self.foods.find_by_name(caller.user_id(), &name).await? {
            return Ok((self.view(existing).await?, false));
        }

        let food = self
            .foods
            .create(NewFood {
                name,
                calories: draft.calories,
                user_id: caller.user_id(),
            })
            .await
            .map_err(|e| unique(e, DUPLICATE))?;

        // The food stays even if this link fails.
        attach(self.links.as_ref(), LinkKind::FoodCategory, food.id, category.id).await?;

        Ok((self.view(food).await?, true))
    }

    /// Create several foods in order, stopping at the first failure.
    pub async fn create_many(
        &self,
        caller: &Caller,
        drafts: Vec<FoodDraft>,
    ) -> Result<Vec<FoodView>, DomainError> {
        if drafts.is_empty() {
            return Err(DomainError::Validation("foods must not be empty".to_string()));
        }

        let mut views = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let (view, _) = self.create(caller, draft).await?;
            views.push(view);
        }
        Ok(views)
    }

    /// The caller's foods, optionally only those in `category_id`.
    pub async fn list(
        &self,
        caller: &Caller,
        category_id: Option<i64>,
    ) -> Result<Vec<FoodView>, DomainError> {
        let mut foods = self.foods.list_owned(caller.user_id()).await?;

        if let Some(category_id) = category_id {
            let owned = self
                .categories
                .find_owned(caller.user_id(), category_id)
                .await?;
            let in_category: HashSet<i64> = match owned {
                Some(category) => self
                    .links
                    .linked_to(LinkKind::FoodCategory, category.id)
                    .await?
                    .into_iter()
                    .collect(),
                None => HashSet::new(),
            };
            foods.retain(|food| in_category.contains(&food.id));
        }

        let mut views = Vec::with_capacity(foods.len());
        for food in foods {
            views.push(self.view(food).await?);
        }
        Ok(views)
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<FoodView, DomainError> {
        let food = self.owned_food(caller, id).await?;
        self.view(food).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        name: &str,
        calories: i32,
    ) -> Result<FoodView, DomainError> {
        let name = required("name", name)?;
        if calories < 0 {
            return Err(DomainError::Validation("calories must not be negative".to_string()));
        }
        let food = self.owned_food(caller, id).await?;

        if let Some(existing) = self.foods.find_by_name(caller.user_id(), &name).await? {
            if existing.id != food.id {
                return Err(DomainError::Conflict(DUPLICATE.to_string()));
            }
        }

        let updated = self
            .foods
            .update(food.id, FoodChanges { name, calories })
            .await
            .map_err(|e| unique(e, DUPLICATE))?;
        self.view(updated).await
    }

    /// Delete a food with its links and consumption entries.
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        let food = self.owned_food(caller, id).await?;
        self.foods.delete(food.id).await?;
        Ok(())
    }

    pub async fn link_category(
        &self,
        caller: &Caller,
        food_id: i64,
        category_id: i64,
    ) -> Result<FoodView, DomainError> {
        let food = self.owned_food(caller, food_id).await?;
        let category = self.owned_category(caller, category_id).await?;

        attach(self.links.as_ref(), LinkKind::FoodCategory, food.id, category.id).await?;
        self.view(food).await
    }

    pub async fn unlink_category(
        &self,
        caller: &Caller,
        food_id: i64,
        category_id: i64,
    ) -> Result<(), DomainError> {
        let food = self.owned_food(caller, food_id).await?;
        let category = self.owned_category(caller, category_id).await?;

        detach(self.links.as_ref(), LinkKind::FoodCategory, food.id, category.id).await
    }

    /// Record that the caller ate `quantity` servings of an owned food.
    pub async fn log_entry(
        &self,
        caller: &Caller,
        food_id: i64,
        quantity: i32,
    ) -> Result<EntryView, DomainError> {
        if quantity < 1 {
            return Err(DomainError::Validation("quantity must be at least 1".to_string()));
        }
        let food = self.owned_food(caller, food_id).await?;

        let entry = self
            .foods
            .record_entry(NewFoodEntry {
                user_id: caller.user_id(),
                food_id: food.id,
                quantity,
            })
            .await?;
        Ok(EntryView { entry, food })
    }

    /// The caller's consumption entries for `day` (UTC).
    pub async fn entries_on(
        &self,
        caller: &Caller,
        day: NaiveDate,
    ) -> Result<Vec<EntryView>, DomainError> {
        let (from, to) = day_bounds(day);
        let entries = self
            .foods
            .entries_between(caller.user_id(), from, to)
            .await?;

        let mut ids: Vec<i64> = entries.iter().map(|e| e.food_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let foods = self.foods.find_many(&ids).await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let food = foods.iter().find(|f| f.id == entry.food_id)?.clone();
                Some(EntryView { entry, food })
            })
            .collect())
    }

    async fn owned_food(&self, caller: &Caller, id: i64) -> Result<Food, DomainError> {
        self.foods
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Food", id))
    }

    async fn owned_category(&self, caller: &Caller, id: i64) -> Result<Category, DomainError> {
        self.categories
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    async fn view(&self, food: Food) -> Result<FoodView, DomainError> {
        let category_ids = self.links.linked(LinkKind::FoodCategory, food.id).await?;
        let categories = self.categories.find_many(&category_ids).await?;
        Ok(FoodView { food, categories })
    }
}
