//! Application state - shared across all handlers.

use std::sync::Arc;

use moodlog_core::AuthContextResolver;
use moodlog_core::ports::{
    CategoryRepository, FoodRepository, LinkRepository, MoodRepository, PasswordService,
    TagRepository, TokenService, UserRepository,
};
use moodlog_core::services::{
    AccountService, CategoryService, FoodService, MoodService, TagService,
};
use moodlog_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

/// The repositories backing one running server.
struct Repositories {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    moods: Arc<dyn MoodRepository>,
    foods: Arc<dyn FoodRepository>,
    links: Arc<dyn LinkRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            categories: store.clone(),
            tags: store.clone(),
            moods: store.clone(),
            foods: store.clone(),
            links: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: moodlog_infra::database::DbConn) -> Self {
        use moodlog_infra::database::{
            PostgresCategoryRepository, PostgresFoodRepository, PostgresLinkRepository,
            PostgresMoodRepository, PostgresTagRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.clone())),
            moods: Arc::new(PostgresMoodRepository::new(db.clone())),
            foods: Arc::new(PostgresFoodRepository::new(db.clone())),
            links: Arc::new(PostgresLinkRepository::new(db)),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub categories: CategoryService,
    pub tags: TagService,
    pub moods: MoodService,
    pub foods: FoodService,
    pub resolver: AuthContextResolver,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => match moodlog_infra::database::connect(db_config).await {
                Ok(conn) => Repositories::postgres(conn),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory store.",
                        e
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Repositories::in_memory()
        };

        let state = Self::assemble(repos, passwords, tokens);
        tracing::info!("Application state initialized");
        state
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(passwords: Arc<dyn PasswordService>, tokens: Arc<dyn TokenService>) -> Self {
        Self::assemble(Repositories::in_memory(), passwords, tokens)
    }

    fn assemble(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts: AccountService::new(repos.users, passwords, tokens.clone()),
            categories: CategoryService::new(repos.categories.clone()),
            tags: TagService::new(repos.tags.clone()),
            moods: MoodService::new(
                repos.moods,
                repos.tags,
                repos.categories.clone(),
                repos.links.clone(),
            ),
            foods: FoodService::new(repos.foods, repos.categories, repos.links),
            resolver: AuthContextResolver::new(tokens),
        }
    }
}
