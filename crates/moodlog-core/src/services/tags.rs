use std::sync::Arc;

use crate::domain::{NewTag, Tag, TagChanges};
use crate::error::DomainError;
use crate::identity::Caller;
use crate::ports::{BaseRepository, OwnedRepository, TagRepository};

use super::{required, unique};

const DUPLICATE: &str = "A tag with this name already exists";

/// Tag operations. Public tags are readable and linkable by everyone;
/// only the owner may change or delete them.
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        name: &str,
        is_public: bool,
    ) -> Result<Tag, DomainError> {
        let name = required("name", name)?;
        let owner = caller.user_id();

        if self.tags.find_by_name(owner, &name).await?.is_some() {
            return Err(DomainError::Conflict(DUPLICATE.to_string()));
        }

        self.tags
            .create(NewTag {
                name,
                user_id: owner,
                is_public,
            })
            .await
            .map_err(|e| unique(e, DUPLICATE))
    }

    /// The caller's tags, optionally followed by other users' public tags.
    pub async fn list(&self, caller: &Caller, include_public: bool) -> Result<Vec<Tag>, DomainError> {
        let mut tags = self.tags.list_owned(caller.user_id()).await?;
        if include_public {
            tags.extend(self.tags.list_public(caller.user_id()).await?);
        }
        Ok(tags)
    }

    /// Fetch a tag the caller owns or that is public.
    pub async fn get(&self, caller: &Caller, id: i64) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .filter(|tag| tag.is_visible_to(caller.user_id()))
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        name: &str,
        is_public: bool,
    ) -> Result<Tag, DomainError> {
        let name = required("name", name)?;
        let tag = self.owned(caller, id).await?;

        if let Some(existing) = self.tags.find_by_name(caller.user_id(), &name).await? {
            if existing.id != tag.id {
                return Err(DomainError::Conflict(DUPLICATE.to_string()));
            }
        }

        self.tags
            .update(tag.id, TagChanges { name, is_public })
            .await
            .map_err(|e| unique(e, DUPLICATE))
    }

    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        let tag = self.owned(caller, id).await?;
        self.tags.delete(tag.id).await?;
        Ok(())
    }

    async fn owned(&self, caller: &Caller, id: i64) -> Result<Tag, DomainError> {
        self.tags
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }
}
