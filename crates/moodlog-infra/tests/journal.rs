//! Journal services wired to the in-memory store and real token/password services.

use std::sync::Arc;

use chrono::Utc;

use moodlog_core::services::{
    AccountService, CategoryService, FoodDraft, FoodService, MoodDraft, MoodService, TagService,
};
use moodlog_core::{AuthContextResolver, Caller, DomainError};
use moodlog_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

struct Journal {
    accounts: AccountService,
    categories: CategoryService,
    tags: TagService,
    moods: MoodService,
    foods: FoodService,
    resolver: AuthContextResolver,
}

fn journal() -> Journal {
    let store = Arc::new(InMemoryStore::new());
    let passwords = Arc::new(Argon2PasswordService::with_params(1024, 1, 1).unwrap());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));

    Journal {
        accounts: AccountService::new(store.clone(), passwords, tokens.clone()),
        categories: CategoryService::new(store.clone()),
        tags: TagService::new(store.clone()),
        moods: MoodService::new(store.clone(), store.clone(), store.clone(), store.clone()),
        foods: FoodService::new(store.clone(), store.clone(), store),
        resolver: AuthContextResolver::new(tokens),
    }
}

impl Journal {
    async fn sign_up(&self, username: &str) -> Caller {
        let session = self.accounts.register(username, "secret-pw").await.unwrap();
        self.resolver
            .resolve(Some(&format!("Bearer {}", session.token)))
            .unwrap()
    }
}

fn mood(title: &str) -> MoodDraft {
    MoodDraft {
        title: title.to_string(),
        description: "how it went".to_string(),
        emoji: "🙂".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_records_are_invisible_to_other_users() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let bob = j.sign_up("bob").await;

    let work = j.categories.create(&alice, "Work").await.unwrap();
    j.categories.create(&bob, "Work").await.unwrap();

    assert!(matches!(
        j.categories.get(&bob, work.id).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.categories.rename(&bob, work.id, "Mine").await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.categories.delete(&bob, work.id).await,
        Err(DomainError::NotFound(_))
    ));

    let bobs = j.categories.list(&bob).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_ne!(bobs[0].id, work.id);

    let still_there = j.categories.get(&alice, work.id).await.unwrap();
    assert_eq!(still_there.name, "Work");
}

#[tokio::test]
async fn test_renames_recheck_names_excluding_self() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let work = j.categories.create(&alice, "Work").await.unwrap();
    j.categories.create(&alice, "Home").await.unwrap();

    assert!(matches!(
        j.categories.rename(&alice, work.id, "Home").await,
        Err(DomainError::Conflict(_))
    ));
    let same = j.categories.rename(&alice, work.id, "Work").await.unwrap();
    assert_eq!(same.id, work.id);
    assert_eq!(same.name, "Work");

    let food = |name: &str| FoodDraft {
        name: name.to_string(),
        calories: 100,
        category_id: work.id,
    };
    let (apple, _) = j.foods.create(&alice, food("Apple")).await.unwrap();
    j.foods.create(&alice, food("Pear")).await.unwrap();

    assert!(matches!(
        j.foods.update(&alice, apple.food.id, "Pear", 95).await,
        Err(DomainError::Conflict(_))
    ));
    let updated = j
        .foods
        .update(&alice, apple.food.id, "Apple", 95)
        .await
        .unwrap();
    assert_eq!(updated.food.id, apple.food.id);
    assert_eq!(updated.food.calories, 95);
}

#[tokio::test]
async fn test_tag_names_are_unique_per_owner() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let bob = j.sign_up("bob").await;

    let calm = j.tags.create(&alice, "calm", false).await.unwrap();
    assert!(matches!(
        j.tags.create(&alice, "calm", true).await,
        Err(DomainError::Conflict(_))
    ));

    let bobs = j.tags.create(&bob, "calm", false).await.unwrap();
    assert_ne!(bobs.id, calm.id);
    assert!(matches!(
        j.tags.get(&bob, calm.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_duplicate_category_conflicts_but_food_is_reused() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let fruit = j.categories.create(&alice, "Fruit").await.unwrap();

    assert!(matches!(
        j.categories.create(&alice, "Fruit").await,
        Err(DomainError::Conflict(_))
    ));

    let draft = FoodDraft {
        name: "Apple".to_string(),
        calories: 95,
        category_id: fruit.id,
    };
    let (first, created) = j.foods.create(&alice, draft.clone()).await.unwrap();
    assert!(created);
    let (second, created) = j.foods.create(&alice, draft).await.unwrap();
    assert!(!created);
    assert_eq!(first.food.id, second.food.id);
    assert_eq!(j.foods.list(&alice, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mood_rejects_foreign_category_before_writing() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let bob = j.sign_up("bob").await;
    let bobs = j.categories.create(&bob, "Private").await.unwrap();

    let result = j
        .moods
        .create(
            &alice,
            MoodDraft {
                category_ids: vec![bobs.id],
                ..mood("Sneaky")
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
    assert!(j.moods.list(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mood_rejects_repeated_ids() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let tag = j.tags.create(&alice, "calm", false).await.unwrap();

    let result = j
        .moods
        .create(
            &alice,
            MoodDraft {
                tag_ids: vec![tag.id, tag.id],
                ..mood("Twice")
            },
        )
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_link_twice_conflicts_and_unlink_twice_is_not_found() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let work = j.categories.create(&alice, "Work").await.unwrap();
    let created = j.moods.create(&alice, mood("Busy")).await.unwrap();
    let id = created.mood.id;

    let view = j.moods.link_category(&alice, id, work.id).await.unwrap();
    assert_eq!(view.categories, vec![work.clone()]);

    assert!(matches!(
        j.moods.link_category(&alice, id, work.id).await,
        Err(DomainError::Conflict(_))
    ));

    j.moods.unlink_category(&alice, id, work.id).await.unwrap();
    assert!(matches!(
        j.moods.unlink_category(&alice, id, work.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_soft_deleted_mood_stays_fetchable() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let tag = j.tags.create(&alice, "tired", false).await.unwrap();
    let created = j
        .moods
        .create(
            &alice,
            MoodDraft {
                tag_ids: vec![tag.id],
                ..mood("Long day")
            },
        )
        .await
        .unwrap();
    let id = created.mood.id;
    assert_eq!(created.tags.len(), 1);

    j.moods.delete(&alice, id).await.unwrap();

    assert!(j.moods.list(&alice).await.unwrap().is_empty());
    assert!(
        j.moods
            .on_date(&alice, Utc::now().date_naive())
            .await
            .unwrap()
            .is_empty()
    );

    let fetched = j.moods.get(&alice, id).await.unwrap();
    assert!(fetched.mood.deleted_at.is_some());
    assert!(fetched.tags.is_empty());

    assert!(matches!(
        j.moods.delete(&alice, id).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.moods.link_tag(&alice, id, tag.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_public_tags_are_linkable_but_not_editable() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let bob = j.sign_up("bob").await;
    let shared = j.tags.create(&bob, "grateful", true).await.unwrap();
    let private = j.tags.create(&bob, "secret", false).await.unwrap();

    let listed = j.tags.list(&alice, true).await.unwrap();
    assert_eq!(listed, vec![shared.clone()]);
    assert!(j.tags.list(&alice, false).await.unwrap().is_empty());

    assert_eq!(j.tags.get(&alice, shared.id).await.unwrap(), shared);
    assert!(matches!(
        j.tags.get(&alice, private.id).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.tags.update(&alice, shared.id, "mine", false).await,
        Err(DomainError::NotFound(_))
    ));

    let created = j.moods.create(&alice, mood("Thankful")).await.unwrap();
    let view = j
        .moods
        .link_tag(&alice, created.mood.id, shared.id)
        .await
        .unwrap();
    assert_eq!(view.tags, vec![shared]);
    assert!(matches!(
        j.moods.link_tag(&alice, created.mood.id, private.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_foods_filter_by_category_and_log_entries() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let fruit = j.categories.create(&alice, "Fruit").await.unwrap();
    let snack = j.categories.create(&alice, "Snack").await.unwrap();

    let foods = j
        .foods
        .create_many(
            &alice,
            vec![
                FoodDraft {
                    name: "Apple".to_string(),
                    calories: 95,
                    category_id: fruit.id,
                },
                FoodDraft {
                    name: "Crisps".to_string(),
                    calories: 530,
                    category_id: snack.id,
                },
            ],
        )
        .await
        .unwrap();
    let apple = foods[0].food.id;

    j.foods.link_category(&alice, apple, snack.id).await.unwrap();

    let snacks = j.foods.list(&alice, Some(snack.id)).await.unwrap();
    assert_eq!(snacks.len(), 2);
    let fruits = j.foods.list(&alice, Some(fruit.id)).await.unwrap();
    assert_eq!(fruits.len(), 1);
    assert_eq!(fruits[0].categories.len(), 2);

    assert!(matches!(
        j.foods.log_entry(&alice, apple, 0).await,
        Err(DomainError::Validation(_))
    ));
    let entry = j.foods.log_entry(&alice, apple, 2).await.unwrap();
    assert_eq!(entry.entry.quantity, 2);

    let today = j
        .foods
        .entries_on(&alice, Utc::now().date_naive())
        .await
        .unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].food.name, "Apple");

    j.categories.delete(&alice, fruit.id).await.unwrap();
    let apple_view = j.foods.get(&alice, apple).await.unwrap();
    assert_eq!(apple_view.categories, vec![snack]);
}

#[tokio::test]
async fn test_account_lifecycle_with_app_password() {
    let j = journal();
    let alice = j.sign_up("alice").await;

    assert!(matches!(
        j.accounts.register("alice", "other").await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        j.accounts.login("alice", "wrong").await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        j.accounts.login("nobody", "secret-pw").await,
        Err(DomainError::Unauthenticated)
    ));

    assert!(!j.accounts.has_app_password(&alice).await.unwrap());
    assert!(matches!(
        j.accounts.delete_account(&alice, "1234").await,
        Err(DomainError::AppPasswordNotSet)
    ));

    j.accounts.set_app_password(&alice, "1234").await.unwrap();
    assert!(j.accounts.has_app_password(&alice).await.unwrap());
    assert!(matches!(
        j.accounts.verify_app_password(&alice, "4321").await,
        Err(DomainError::Unauthenticated)
    ));
    j.accounts.verify_app_password(&alice, "1234").await.unwrap();

    // The login password is unchanged by the app password.
    j.accounts.login("alice", "secret-pw").await.unwrap();

    j.categories.create(&alice, "Work").await.unwrap();
    j.accounts.delete_account(&alice, "1234").await.unwrap();

    assert!(matches!(
        j.accounts.login("alice", "secret-pw").await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(j.categories.list(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_rejects_taken_username() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    j.sign_up("bob").await;

    assert!(matches!(
        j.accounts.rename(&alice, "bob").await,
        Err(DomainError::Conflict(_))
    ));

    let renamed = j.accounts.rename(&alice, "alicia").await.unwrap();
    assert_eq!(renamed.username, "alicia");
    j.accounts.login("alicia", "secret-pw").await.unwrap();
}

#[tokio::test]
async fn test_resolver_rejects_bad_credentials() {
    let j = journal();
    j.sign_up("alice").await;

    assert!(j.resolver.resolve(None).is_err());
    assert!(j.resolver.resolve(Some("Bearer ")).is_err());
    assert!(j.resolver.resolve(Some("Token abc")).is_err());
    assert!(j.resolver.resolve(Some("Bearer not.a.jwt")).is_err());
}

#[tokio::test]
async fn test_tag_made_private_leaves_other_moods_but_stays_unlinkable() {
    let j = journal();
    let alice = j.sign_up("alice").await;
    let bob = j.sign_up("bob").await;
    let shared = j.tags.create(&bob, "grateful", true).await.unwrap();

    let created = j.moods.create(&alice, mood("Thankful")).await.unwrap();
    j.moods
        .link_tag(&alice, created.mood.id, shared.id)
        .await
        .unwrap();

    j.tags
        .update(&bob, shared.id, "my secret diagnosis", false)
        .await
        .unwrap();

    let view = j.moods.get(&alice, created.mood.id).await.unwrap();
    assert!(view.tags.is_empty());
    let listed = j.moods.list(&alice).await.unwrap();
    assert!(listed[0].tags.is_empty());

    j.moods
        .unlink_tag(&alice, created.mood.id, shared.id)
        .await
        .unwrap();
    assert!(matches!(
        j.moods.unlink_tag(&alice, created.mood.id, shared.id).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.moods.link_tag(&alice, created.mood.id, shared.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_token_of_deleted_account_cannot_create() {
    let j = journal();
    let carol = j.sign_up("carol").await;
    let dave = j.sign_up("dave").await;
    j.accounts.set_app_password(&carol, "1234").await.unwrap();
    j.accounts.delete_account(&carol, "1234").await.unwrap();

    assert!(matches!(
        j.categories.create(&carol, "Work").await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.tags.create(&carol, "calm", true).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        j.moods.create(&carol, mood("Gone")).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(j.categories.list(&carol).await.unwrap().is_empty());
    assert!(j.tags.list(&dave, true).await.unwrap().is_empty());
}
