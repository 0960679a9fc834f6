//! In-memory store - used when no database is configured, and in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use moodlog_core::domain::{
    Category, Food, FoodChanges, FoodEntry, Mood, NewCategory, NewFood, NewFoodEntry, NewMood,
    NewTag, NewUser, Tag, TagChanges, User, UserId,
};
use moodlog_core::error::RepoError;
use moodlog_core::ports::{
    BaseRepository, CategoryRepository, FoodRepository, LinkKind, LinkRepository, MoodRepository,
    OwnedRepository, TagRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    tags: BTreeMap<i64, Tag>,
    moods: BTreeMap<i64, Mood>,
    foods: BTreeMap<i64, Food>,
    entries: BTreeMap<i64, FoodEntry>,
    links: HashMap<LinkKind, BTreeSet<(i64, i64)>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn links_mut(&mut self, kind: LinkKind) -> &mut BTreeSet<(i64, i64)> {
        self.links.entry(kind).or_default()
    }

    fn drop_links_left(&mut self, kind: LinkKind, left: i64) -> u64 {
        let set = self.links_mut(kind);
        let before = set.len();
        set.retain(|(l, _)| *l != left);
        (before - set.len()) as u64
    }

    fn drop_links_right(&mut self, kind: LinkKind, right: i64) {
        self.links_mut(kind).retain(|(_, r)| *r != right);
    }

    /// Owned rows reference `users`, as the foreign keys do.
    fn require_user(&self, user: UserId) -> Result<(), RepoError> {
        if self.users.contains_key(&user.get()) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }

    /// Whether both ends of a link exist.
    fn endpoints_exist(&self, kind: LinkKind, left: i64, right: i64) -> bool {
        match kind {
            LinkKind::MoodCategory => {
                self.moods.contains_key(&left) && self.categories.contains_key(&right)
            }
            LinkKind::MoodTag => self.moods.contains_key(&left) && self.tags.contains_key(&right),
            LinkKind::FoodCategory => {
                self.foods.contains_key(&left) && self.categories.contains_key(&right)
            }
        }
    }

    fn remove_category(&mut self, id: i64) -> bool {
        if self.categories.remove(&id).is_none() {
            return false;
        }
        self.drop_links_right(LinkKind::MoodCategory, id);
        self.drop_links_right(LinkKind::FoodCategory, id);
        true
    }

    fn remove_tag(&mut self, id: i64) -> bool {
        if self.tags.remove(&id).is_none() {
            return false;
        }
        self.drop_links_right(LinkKind::MoodTag, id);
        true
    }

    fn remove_mood(&mut self, id: i64) -> bool {
        if self.moods.remove(&id).is_none() {
            return false;
        }
        self.drop_links_left(LinkKind::MoodCategory, id);
        self.drop_links_left(LinkKind::MoodTag, id);
        true
    }

    fn remove_food(&mut self, id: i64) -> bool {
        if self.foods.remove(&id).is_none() {
            return false;
        }
        self.drop_links_left(LinkKind::FoodCategory, id);
        self.entries.retain(|_, entry| entry.food_id != id);
        true
    }

    /// Remove a user and everything they own.
    fn remove_user(&mut self, id: i64) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let owner = UserId::new(id);

        let moods: Vec<i64> = owned_ids(&self.moods, owner, |m| m.user_id);
        let foods: Vec<i64> = owned_ids(&self.foods, owner, |f| f.user_id);
        let categories: Vec<i64> = owned_ids(&self.categories, owner, |c| c.user_id);
        let tags: Vec<i64> = owned_ids(&self.tags, owner, |t| t.user_id);

        for id in moods {
            self.remove_mood(id);
        }
        for id in foods {
            self.remove_food(id);
        }
        for id in categories {
            self.remove_category(id);
        }
        for id in tags {
            self.remove_tag(id);
        }
        self.entries.retain(|_, entry| entry.user_id != owner);
        true
    }
}

fn owned_ids<T>(table: &BTreeMap<i64, T>, owner: UserId, user_of: impl Fn(&T) -> UserId) -> Vec<i64> {
    table
        .iter()
        .filter(|(_, row)| user_of(row) == owner)
        .map(|(id, _)| *id)
        .collect()
}

fn pick<T: Clone>(table: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.iter().filter_map(|id| table.get(id).cloned()).collect()
}

fn duplicate(what: &str) -> RepoError {
    RepoError::Constraint(format!("duplicate {what}"))
}

/// In-memory store implementing every repository port.
///
/// Enforces the same uniqueness and cascade rules as the database schema.
/// Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lookups shared by every table keyed by an `i64` id with an owner.
macro_rules! owned_table {
    ($ty:ty, $table:ident, $remove:ident, $listed:expr) => {
        #[async_trait]
        impl BaseRepository<$ty, i64> for InMemoryStore {
            async fn find_by_id(&self, id: i64) -> Result<Option<$ty>, RepoError> {
                Ok(self.tables.read().await.$table.get(&id).cloned())
            }

            async fn delete(&self, id: i64) -> Result<(), RepoError> {
                if self.tables.write().await.$remove(id) {
                    Ok(())
                } else {
                    Err(RepoError::NotFound)
                }
            }
        }

        #[async_trait]
        impl OwnedRepository<$ty> for InMemoryStore {
            async fn find_owned(&self, owner: UserId, id: i64) -> Result<Option<$ty>, RepoError> {
                let tables = self.tables.read().await;
                Ok(tables
                    .$table
                    .get(&id)
                    .filter(|row| row.user_id == owner)
                    .cloned())
            }

            async fn list_owned(&self, owner: UserId) -> Result<Vec<$ty>, RepoError> {
                let listed: fn(&$ty) -> bool = $listed;
                let tables = self.tables.read().await;
                Ok(tables
                    .$table
                    .values()
                    .filter(|row| row.user_id == owner && listed(row))
                    .cloned()
                    .collect())
            }
        }
    };
}

owned_table!(Category, categories, remove_category, |_| true);
owned_table!(Tag, tags, remove_tag, |_| true);
owned_table!(Mood, moods, remove_mood, |mood| !mood.is_deleted());
owned_table!(Food, foods, remove_food, |_| true);

#[async_trait]
impl BaseRepository<User, i64> for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if self.tables.write().await.remove_user(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(duplicate("username"));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.next_id()),
            username: new.username,
            password_hash: new.password_hash,
            app_password_hash: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id.get(), user.clone());
        Ok(user)
    }

    async fn update_username(&self, id: UserId, username: &str) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == username && u.id != id)
        {
            return Err(duplicate("username"));
        }

        let user = tables.users.get_mut(&id.get()).ok_or(RepoError::NotFound)?;
        user.username = username.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_app_password(&self, id: UserId, hash: &str) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id.get()).ok_or(RepoError::NotFound)?;
        user.app_password_hash = Some(hash.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.user_id == owner && c.name == name)
            .cloned())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id)?;
        if tables
            .categories
            .values()
            .any(|c| c.user_id == new.user_id && c.name == new.name)
        {
            return Err(duplicate("category name"));
        }

        let now = Utc::now();
        let category = Category {
            id: tables.next_id(),
            name: new.name,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn rename(&self, id: i64, name: &str) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let owner = tables.categories.get(&id).ok_or(RepoError::NotFound)?.user_id;
        if tables
            .categories
            .values()
            .any(|c| c.user_id == owner && c.name == name && c.id != id)
        {
            return Err(duplicate("category name"));
        }

        let category = tables.categories.get_mut(&id).ok_or(RepoError::NotFound)?;
        category.name = name.to_string();
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Category>, RepoError> {
        Ok(pick(&self.tables.read().await.categories, ids))
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .values()
            .find(|t| t.user_id == owner && t.name == name)
            .cloned())
    }

    async fn create(&self, new: NewTag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id)?;
        if tables
            .tags
            .values()
            .any(|t| t.user_id == new.user_id && t.name == new.name)
        {
            return Err(duplicate("tag name"));
        }

        let now = Utc::now();
        let tag = Tag {
            id: tables.next_id(),
            name: new.name,
            user_id: new.user_id,
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
        };
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: i64, changes: TagChanges) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        let owner = tables.tags.get(&id).ok_or(RepoError::NotFound)?.user_id;
        if tables
            .tags
            .values()
            .any(|t| t.user_id == owner && t.name == changes.name && t.id != id)
        {
            return Err(duplicate("tag name"));
        }

        let tag = tables.tags.get_mut(&id).ok_or(RepoError::NotFound)?;
        tag.name = changes.name;
        tag.is_public = changes.is_public;
        tag.updated_at = Utc::now();
        Ok(tag.clone())
    }

    async fn list_public(&self, viewer: UserId) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .values()
            .filter(|t| t.is_public && t.user_id != viewer)
            .cloned()
            .collect())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Tag>, RepoError> {
        Ok(pick(&self.tables.read().await.tags, ids))
    }
}

#[async_trait]
impl MoodRepository for InMemoryStore {
    async fn create(&self, new: NewMood) -> Result<Mood, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id)?;

        let now = Utc::now();
        let mood = Mood {
            id: tables.next_id(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            emoji: new.emoji,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.moods.insert(mood.id, mood.clone());
        Ok(mood)
    }

    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> Result<Mood, RepoError> {
        let mut tables = self.tables.write().await;
        let mood = tables.moods.get_mut(&id).ok_or(RepoError::NotFound)?;
        mood.deleted_at = Some(at);
        mood.updated_at = at;
        Ok(mood.clone())
    }

    async fn list_created_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Mood>, RepoError> {
        let tables = self.tables.read().await;
        let mut moods: Vec<Mood> = tables
            .moods
            .values()
            .filter(|m| m.user_id == owner && !m.is_deleted())
            .filter(|m| m.created_at >= from && m.created_at < to)
            .cloned()
            .collect();
        moods.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(moods)
    }
}

#[async_trait]
impl FoodRepository for InMemoryStore {
    async fn find_by_name(&self, owner: UserId, name: &str) -> Result<Option<Food>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .foods
            .values()
            .find(|f| f.user_id == owner && f.name == name)
            .cloned())
    }

    async fn create(&self, new: NewFood) -> Result<Food, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id)?;
        if tables
            .foods
            .values()
            .any(|f| f.user_id == new.user_id && f.name == new.name)
        {
            return Err(duplicate("food name"));
        }

        let now = Utc::now();
        let food = Food {
            id: tables.next_id(),
            name: new.name,
            calories: new.calories,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.foods.insert(food.id, food.clone());
        Ok(food)
    }

    async fn update(&self, id: i64, changes: FoodChanges) -> Result<Food, RepoError> {
        let mut tables = self.tables.write().await;
        let owner = tables.foods.get(&id).ok_or(RepoError::NotFound)?.user_id;
        if tables
            .foods
            .values()
            .any(|f| f.user_id == owner && f.name == changes.name && f.id != id)
        {
            return Err(duplicate("food name"));
        }

        let food = tables.foods.get_mut(&id).ok_or(RepoError::NotFound)?;
        food.name = changes.name;
        food.calories = changes.calories;
        food.updated_at = Utc::now();
        Ok(food.clone())
    }

    async fn record_entry(&self, new: NewFoodEntry) -> Result<FoodEntry, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(new.user_id)?;
        if !tables.foods.contains_key(&new.food_id) {
            return Err(RepoError::NotFound);
        }

        let entry = FoodEntry {
            id: tables.next_id(),
            user_id: new.user_id,
            food_id: new.food_id,
            quantity: new.quantity,
            consumed_at: Utc::now(),
        };
        tables.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn entries_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>, RepoError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<FoodEntry> = tables
            .entries
            .values()
            .filter(|e| e.user_id == owner && e.consumed_at >= from && e.consumed_at < to)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.consumed_at.cmp(&b.consumed_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Food>, RepoError> {
        Ok(pick(&self.tables.read().await.foods, ids))
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn link(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.endpoints_exist(kind, left, right) {
            return Err(RepoError::NotFound);
        }
        if !tables.links_mut(kind).insert((left, right)) {
            return Err(duplicate("link"));
        }
        Ok(())
    }

    async fn unlink(&self, kind: LinkKind, left: i64, right: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.links_mut(kind).remove(&(left, right)) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }

    async fn is_linked(&self, kind: LinkKind, left: i64, right: i64) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .get(&kind)
            .is_some_and(|set| set.contains(&(left, right))))
    }

    async fn linked(&self, kind: LinkKind, left: i64) -> Result<Vec<i64>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .get(&kind)
            .map(|set| {
                set.iter()
                    .filter(|(l, _)| *l == left)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn linked_to(&self, kind: LinkKind, right: i64) -> Result<Vec<i64>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .get(&kind)
            .map(|set| {
                set.iter()
                    .filter(|(_, r)| *r == right)
                    .map(|(l, _)| *l)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn unlink_all(&self, kind: LinkKind, left: i64) -> Result<u64, RepoError> {
        Ok(self.tables.write().await.drop_links_left(kind, left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user(store: &InMemoryStore, name: &str) -> UserId {
        UserRepository::create(
            store,
            NewUser {
                username: name.to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn category(store: &InMemoryStore, owner: UserId, name: &str) -> Category {
        CategoryRepository::create(
            store,
            NewCategory {
                name: name.to_string(),
                user_id: owner,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let store = InMemoryStore::new();
        user(&store, "alice").await;

        let result = UserRepository::create(
            &store,
            NewUser {
                username: "alice".to_string(),
                password_hash: "other".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_category_name_unique_per_owner() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;

        category(&store, alice, "Work").await;
        category(&store, bob, "Work").await;

        let result = CategoryRepository::create(
            &store,
            NewCategory {
                name: "Work".to_string(),
                user_id: alice,
            },
        )
        .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_owned_hides_other_owners() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let work = category(&store, alice, "Work").await;

        let own: Option<Category> = store.find_owned(alice, work.id).await.unwrap();
        let other: Option<Category> = store.find_owned(bob, work.id).await.unwrap();

        assert_eq!(own, Some(work));
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_link_and_missing_unlink() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let work = category(&store, alice, "Work").await;
        let mood = MoodRepository::create(
            &store,
            NewMood {
                user_id: alice,
                title: "Fine".to_string(),
                description: String::new(),
                emoji: "🙂".to_string(),
            },
        )
        .await
        .unwrap();

        store.link(LinkKind::MoodCategory, mood.id, work.id).await.unwrap();
        let again = store.link(LinkKind::MoodCategory, mood.id, work.id).await;
        assert!(matches!(again, Err(RepoError::Constraint(_))));

        store.unlink(LinkKind::MoodCategory, mood.id, work.id).await.unwrap();
        let missing = store.unlink(LinkKind::MoodCategory, mood.id, work.id).await;
        assert!(matches!(missing, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_link_requires_both_ends() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let work = category(&store, alice, "Work").await;

        let result = store.link(LinkKind::FoodCategory, 999, work.id).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_deleting_category_removes_its_links() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let fruit = category(&store, alice, "Fruit").await;
        let apple = FoodRepository::create(
            &store,
            NewFood {
                name: "Apple".to_string(),
                calories: 95,
                user_id: alice,
            },
        )
        .await
        .unwrap();
        store.link(LinkKind::FoodCategory, apple.id, fruit.id).await.unwrap();

        BaseRepository::<Category, i64>::delete(&store, fruit.id).await.unwrap();

        let linked = store.linked(LinkKind::FoodCategory, apple.id).await.unwrap();
        assert!(linked.is_empty());
        let food: Option<Food> = store.find_by_id(apple.id).await.unwrap();
        assert!(food.is_some());
    }

    #[tokio::test]
    async fn test_soft_deleted_mood_leaves_listing() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let mood = MoodRepository::create(
            &store,
            NewMood {
                user_id: alice,
                title: "Tired".to_string(),
                description: String::new(),
                emoji: "😴".to_string(),
            },
        )
        .await
        .unwrap();

        store.soft_delete(mood.id, Utc::now()).await.unwrap();

        let listed: Vec<Mood> = store.list_owned(alice).await.unwrap();
        assert!(listed.is_empty());
        let fetched: Option<Mood> = store.find_owned(alice, mood.id).await.unwrap();
        assert!(fetched.is_some_and(|m| m.is_deleted()));
    }

    #[tokio::test]
    async fn test_owned_rows_require_existing_user() {
        let store = InMemoryStore::new();
        let carol = user(&store, "carol").await;
        let dave = user(&store, "dave").await;
        BaseRepository::<User, i64>::delete(&store, carol.get()).await.unwrap();

        let category = CategoryRepository::create(
            &store,
            NewCategory {
                name: "Work".to_string(),
                user_id: carol,
            },
        )
        .await;
        let tag = TagRepository::create(
            &store,
            NewTag {
                name: "calm".to_string(),
                user_id: carol,
                is_public: true,
            },
        )
        .await;
        let food = FoodRepository::create(
            &store,
            NewFood {
                name: "Apple".to_string(),
                calories: 95,
                user_id: carol,
            },
        )
        .await;

        assert!(matches!(category, Err(RepoError::NotFound)));
        assert!(matches!(tag, Err(RepoError::NotFound)));
        assert!(matches!(food, Err(RepoError::NotFound)));
        assert!(store.list_public(dave).await.unwrap().is_empty());
    }
}
