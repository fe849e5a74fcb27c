use crate::services::core::infrastructure::cache_store::{
    CacheStoreConfig, RedisCacheStore,
};
use crate::services::core::movies::movie_cache::MovieCacheService;
use crate::services::core::movies::movie_data::MovieDataService;
use crate::services::core::movies::tmdb_client::{TmdbClient, TmdbConfig};
use crate::utils::MovieRecResult;
use std::sync::Arc;

/// Top-level application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub cache: CacheStoreConfig,
    pub tmdb: TmdbConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            cache: CacheStoreConfig::from_env(),
            tmdb: TmdbConfig::from_env(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> MovieRecResult<()> {
        self.cache.validate()?;
        self.tmdb.validate()
    }
}

/// Service container wiring every application service.
/// Built once at startup and passed to callers; services share state
/// through `Arc`, never through globals.
pub struct ServiceContainer {
    pub cache_store: Arc<RedisCacheStore>,
    pub movie_cache: Arc<MovieCacheService>,
    pub tmdb_client: Arc<TmdbClient>,
    pub movie_data: Arc<MovieDataService>,
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer").finish_non_exhaustive()
    }
}

impl ServiceContainer {
    /// Create a container from explicit configuration. Fails only on
    /// configuration errors; an unreachable cache backend is tolerated and
    /// leaves the cache in degraded mode.
    pub async fn new(config: AppConfig) -> MovieRecResult<Self> {
        config.validate()?;

        let cache_store = Arc::new(RedisCacheStore::connect(config.cache).await);
        let movie_cache = Arc::new(MovieCacheService::new(cache_store.clone()));
        let tmdb_client = Arc::new(TmdbClient::new(config.tmdb)?);
        let movie_data = Arc::new(MovieDataService::new(
            movie_cache.clone(),
            tmdb_client.clone(),
        ));

        Ok(Self {
            cache_store,
            movie_cache,
            tmdb_client,
            movie_data,
        })
    }

    /// Create a container from environment variables.
    pub async fn from_env() -> MovieRecResult<Self> {
        Self::new(AppConfig::from_env()).await
    }

    /// Get the cache store adapter
    pub fn cache_store(&self) -> &Arc<RedisCacheStore> {
        &self.cache_store
    }

    /// Get the movie cache service
    pub fn movie_cache(&self) -> &Arc<MovieCacheService> {
        &self.movie_cache
    }

    /// Get the TMDB client
    pub fn tmdb_client(&self) -> &Arc<TmdbClient> {
        &self.tmdb_client
    }

    /// Get the movie data service
    pub fn movie_data(&self) -> &Arc<MovieDataService> {
        &self.movie_data
    }
}
