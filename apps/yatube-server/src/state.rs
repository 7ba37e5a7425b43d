//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use yatube_core::ports::{Cache, MediaStorage, PasswordService, StorageError, TokenService};
use yatube_core::service::{AccountService, FollowService, PostService, Repositories};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtTokenService, LocalMediaStorage,
};

use crate::config::AppConfig;

/// URL prefix media files are served under.
pub const MEDIA_URL: &str = "/media/";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub follows: Arc<FollowService>,
    pub accounts: Arc<AccountService>,
    pub repos: Repositories,
    pub cache: Arc<dyn Cache>,
    pub media: Arc<dyn MediaStorage>,
    pub tokens: Arc<dyn TokenService>,
    /// How long the rendered home feed stays cached.
    pub index_cache_ttl: Duration,
}

impl AppState {
    /// Build the application state from configuration, falling back to
    /// in-memory adapters where a backing service is absent or unreachable.
    pub async fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let repos = Self::repositories(config).await;
        let cache = Self::cache(config).await;
        let media: Arc<dyn MediaStorage> =
            Arc::new(LocalMediaStorage::new(&config.media_root, MEDIA_URL)?);

        let state = Self::from_parts(
            repos,
            cache,
            media,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            config.index_cache_ttl,
        );

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire the services over explicit adapters.
    pub fn from_parts(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        media: Arc<dyn MediaStorage>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        index_cache_ttl: Duration,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(repos.clone(), media.clone())),
            follows: Arc::new(FollowService::new(repos.clone())),
            accounts: Arc::new(AccountService::new(repos.users.clone(), passwords)),
            repos,
            cache,
            media,
            tokens,
            index_cache_ttl,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
            return InMemoryStore::new().repositories();
        };

        match yatube_infra::connect(db_config).await {
            Ok(db) => yatube_infra::postgres_repositories(db),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory store.");
                InMemoryStore::new().repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> Repositories {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        InMemoryStore::new().repositories()
    }

    #[cfg(feature = "redis")]
    async fn cache(config: &AppConfig) -> Arc<dyn Cache> {
        use yatube_infra::{RedisCache, RedisConfig};

        let Some(url) = &config.redis_url else {
            return Arc::new(InMemoryCache::new());
        };

        match RedisCache::new(RedisConfig::new(url.as_str())).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                tracing::error!(error = %e, "Redis unavailable. Using in-memory cache.");
                Arc::new(InMemoryCache::new())
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn cache(config: &AppConfig) -> Arc<dyn Cache> {
        if config.redis_url.is_some() {
            tracing::warn!("REDIS_URL ignored: built without the redis feature");
        }
        Arc::new(InMemoryCache::new())
    }
}
