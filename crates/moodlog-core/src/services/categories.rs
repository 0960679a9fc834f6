use std::sync::Arc;

use crate::domain::{Category, NewCategory};
use crate::error::DomainError;
use crate::identity::Caller;
use crate::ports::{BaseRepository, CategoryRepository, OwnedRepository};

use super::{required, unique};

const DUPLICATE: &str = "A category with this name already exists";

/// Category operations, scoped to the caller.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// Create a category. A second category with the same name is a conflict.
    pub async fn create(&self, caller: &Caller, name: &str) -> Result<Category, DomainError> {
        let name = required("name", name)?;
        let owner = caller.user_id();

        if self.categories.find_by_name(owner, &name).await?.is_some() {
            return Err(DomainError::Conflict(DUPLICATE.to_string()));
        }

        self.categories
            .create(NewCategory {
                name,
                user_id: owner,
            })
            .await
            .map_err(|e| unique(e, DUPLICATE))
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_owned(caller.user_id()).await?)
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<Category, DomainError> {
        self.categories
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn rename(
        &self,
        caller: &Caller,
        id: i64,
        name: &str,
    ) -> Result<Category, DomainError> {
        let name = required("name", name)?;
        let category = self.get(caller, id).await?;

        if let Some(existing) = self.categories.find_by_name(caller.user_id(), &name).await? {
            if existing.id != category.id {
                return Err(DomainError::Conflict(DUPLICATE.to_string()));
            }
        }

        self.categories
            .rename(category.id, &name)
            .await
            .map_err(|e| unique(e, DUPLICATE))
    }

    /// Delete a category. Moods and foods it was assigned to are kept.
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        let category = self.get(caller, id).await?;
        self.categories.delete(category.id).await?;
        Ok(())
    }
}
