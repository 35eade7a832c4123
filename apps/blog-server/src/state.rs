//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    RateLimiter, TokenService, UserRepository,
};
use blogicum_infra::memory::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryLocationRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blogicum_infra::{DatabaseConnections, PostgresRepositories};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Applied to the `/auth` scope when present.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub login_url: String,
    /// Backend name reported by the health probe.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, preferring PostgreSQL when it is configured and reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::default());

        #[cfg(feature = "postgres")]
        let persistent = Self::postgres(config, tokens.clone(), passwords.clone()).await;
        #[cfg(not(feature = "postgres"))]
        let persistent: Option<Self> = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            None
        };

        let state = persistent.unwrap_or_else(|| {
            Self::in_memory(
                Arc::new(InMemoryStore::new()),
                tokens,
                passwords,
                config.login_url.clone(),
            )
        });

        #[cfg(feature = "rate-limit")]
        let state = Self {
            rate_limiter: Some(Arc::new(blogicum_infra::InMemoryRateLimiter::new(
                config.rate_limit.clone(),
            ))),
            ..state
        };

        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    #[cfg(feature = "postgres")]
    async fn postgres(
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let repos = PostgresRepositories::new(connections.main);
                Some(Self {
                    users: Arc::new(repos.users),
                    categories: Arc::new(repos.categories),
                    locations: Arc::new(repos.locations),
                    posts: Arc::new(repos.posts),
                    comments: Arc::new(repos.comments),
                    tokens,
                    passwords,
                    rate_limiter: None,
                    login_url: config.login_url.clone(),
                    storage: "postgres",
                })
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    /// State over a single in-memory store, without rate limiting.
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        login_url: String,
    ) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(store.clone())),
            locations: Arc::new(InMemoryLocationRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store)),
            tokens,
            passwords,
            rate_limiter: None,
            login_url,
            storage: "memory",
        }
    }
}
