// src/services/mod.rs

// Core services organized by domain
pub mod core;

// Re-export commonly used services
pub use core::infrastructure::cache_store::{
    CacheBackend, CacheStoreConfig, CacheStoreStats, RedisCacheStore,
};
pub use core::infrastructure::service_container::{AppConfig, ServiceContainer};
pub use core::movies::movie_cache::MovieCacheService;
pub use core::movies::movie_data::{MovieDataService, MovieProvider};
pub use core::movies::tmdb_client::{TmdbClient, TmdbConfig};
