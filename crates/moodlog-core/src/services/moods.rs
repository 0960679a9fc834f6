use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{Category, Mood, NewMood, Tag};
use crate::error::DomainError;
use crate::identity::Caller;
use crate::ports::{
    BaseRepository, CategoryRepository, LinkKind, LinkRepository, MoodRepository,
    OwnedRepository, TagRepository,
};

use super::links::{attach, detach};
use super::{day_bounds, required};

/// Input for a new mood.
#[derive(Debug, Clone, Default)]
pub struct MoodDraft {
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub tag_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
}

/// A mood with the tags and categories linked to it.
#[derive(Debug, Clone)]
pub struct MoodView {
    pub mood: Mood,
    pub tags: Vec<Tag>,
    pub categories: Vec<Category>,
}

/// Mood journal operations, scoped to the caller.
#[derive(Clone)]
pub struct MoodService {
    moods: Arc<dyn MoodRepository>,
    tags: Arc<dyn TagRepository>,
    categories: Arc<dyn CategoryRepository>,
    links: Arc<dyn LinkRepository>,
}

impl MoodService {
    pub fn new(
        moods: Arc<dyn MoodRepository>,
        tags: Arc<dyn TagRepository>,
        categories: Arc<dyn CategoryRepository>,
        links: Arc<dyn LinkRepository>,
    ) -> Self {
        Self {
            moods,
            tags,
            categories,
            links,
        }
    }

    /// Create a mood, then link the requested tags and categories.
    ///
    /// Every referenced record is checked before the mood is written. A link
    /// failure after that leaves the mood in place.
    pub async fn create(&self, caller: &Caller, draft: MoodDraft) -> Result<MoodView, DomainError> {
        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;
        let emoji = required("emoji", &draft.emoji)?;
        reject_repeats("tag_ids", &draft.tag_ids)?;
        reject_repeats("category_ids", &draft.category_ids)?;

        for &tag_id in &draft.tag_ids {
            self.visible_tag(caller, tag_id).await?;
        }
        for &category_id in &draft.category_ids {
            self.owned_category(caller, category_id).await?;
        }

        let mood = self
            .moods
            .create(NewMood {
                user_id: caller.user_id(),
                title,
                description,
                emoji,
            })
            .await?;

        for &tag_id in &draft.tag_ids {
            attach(self.links.as_ref(), LinkKind::MoodTag, mood.id, tag_id).await?;
        }
        for &category_id in &draft.category_ids {
            attach(self.links.as_ref(), LinkKind::MoodCategory, mood.id, category_id).await?;
        }

        self.view(mood).await
    }

    /// Active moods, newest first.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<MoodView>, DomainError> {
        let mut moods = self.moods.list_owned(caller.user_id()).await?;
        moods.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.views(moods).await
    }

    /// Active moods created on `day` (UTC).
    pub async fn on_date(
        &self,
        caller: &Caller,
        day: NaiveDate,
    ) -> Result<Vec<MoodView>, DomainError> {
        let (from, to) = day_bounds(day);
        let moods = self
            .moods
            .list_created_between(caller.user_id(), from, to)
            .await?;
        self.views(moods).await
    }

    /// Fetch an owned mood by id, including a soft-deleted one.
    pub async fn get(&self, caller: &Caller, id: i64) -> Result<MoodView, DomainError> {
        let mood = self
            .moods
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Mood", id))?;
        self.view(mood).await
    }

    /// Soft-delete a mood and drop its links.
    pub async fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        let mood = self.active_mood(caller, id).await?;

        self.moods.soft_delete(mood.id, Utc::now()).await?;
        self.links.unlink_all(LinkKind::MoodTag, mood.id).await?;
        self.links
            .unlink_all(LinkKind::MoodCategory, mood.id)
            .await?;
        Ok(())
    }

    pub async fn link_category(
        &self,
        caller: &Caller,
        mood_id: i64,
        category_id: i64,
    ) -> Result<MoodView, DomainError> {
        let mood = self.active_mood(caller, mood_id).await?;
        let category = self.owned_category(caller, category_id).await?;

        attach(self.links.as_ref(), LinkKind::MoodCategory, mood.id, category.id).await?;
        self.view(mood).await
    }

    pub async fn unlink_category(
        &self,
        caller: &Caller,
        mood_id: i64,
        category_id: i64,
    ) -> Result<(), DomainError> {
        let mood = self.active_mood(caller, mood_id).await?;
        let category = self.owned_category(caller, category_id).await?;

        detach(self.links.as_ref(), LinkKind::MoodCategory, mood.id, category.id).await
    }

    pub async fn link_tag(
        &self,
        caller: &Caller,
        mood_id: i64,
        tag_id: i64,
    ) -> Result<MoodView, DomainError> {
        let mood = self.active_mood(caller, mood_id).await?;
        let tag = self.visible_tag(caller, tag_id).await?;

        attach(self.links.as_ref(), LinkKind::MoodTag, mood.id, tag.id).await?;
        self.view(mood).await
    }

    pub async fn unlink_tag(
        &self,
        caller: &Caller,
        mood_id: i64,
        tag_id: i64,
    ) -> Result<(), DomainError> {
        let mood = self.active_mood(caller, mood_id).await?;
        // A linked tag may have turned private since; the link is still the caller's.
        if !self.links.is_linked(LinkKind::MoodTag, mood.id, tag_id).await? {
            self.visible_tag(caller, tag_id).await?;
        }

        detach(self.links.as_ref(), LinkKind::MoodTag, mood.id, tag_id).await
    }

    /// An owned mood that has not been deleted.
    async fn active_mood(&self, caller: &Caller, id: i64) -> Result<Mood, DomainError> {
        self.moods
            .find_owned(caller.user_id(), id)
            .await?
            .filter(|mood| !mood.is_deleted())
            .ok_or_else(|| DomainError::not_found("Mood", id))
    }

    async fn owned_category(&self, caller: &Caller, id: i64) -> Result<Category, DomainError> {
        self.categories
            .find_owned(caller.user_id(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    async fn visible_tag(&self, caller: &Caller, id: i64) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .filter(|tag| tag.is_visible_to(caller.user_id()))
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    async fn views(&self, moods: Vec<Mood>) -> Result<Vec<MoodView>, DomainError> {
        let mut views = Vec::with_capacity(moods.len());
        for mood in moods {
            views.push(self.view(mood).await?);
        }
        Ok(views)
    }

    async fn view(&self, mood: Mood) -> Result<MoodView, DomainError> {
        let tag_ids = self.links.linked(LinkKind::MoodTag, mood.id).await?;
        let category_ids = self.links.linked(LinkKind::MoodCategory, mood.id).await?;

        let mut tags = self.tags.find_many(&tag_ids).await?;
        tags.retain(|tag| tag.is_visible_to(mood.user_id));
        let categories = self.categories.find_many(&category_ids).await?;

        Ok(MoodView {
            mood,
            tags,
            categories,
        })
    }
}

fn reject_repeats(field: &str, ids: &[i64]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("{field} contains duplicates")))
    }
}
