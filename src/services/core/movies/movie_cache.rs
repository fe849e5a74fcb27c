//! Movie Cache - read-through caching layer for movie metadata
//!
//! Owns the cache keyspace: key construction, per-category TTL policy and
//! typed (de)serialization on top of the raw [`CacheBackend`]. Entries that
//! fail to deserialize are treated as misses and evicted so a stale shape
//! cannot wedge a key until its TTL expires.

use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::services::core::infrastructure::cache_store::{CacheBackend, CacheStoreStats};
use crate::types::{MovieListPage, TimeWindow, UserProfile};
use crate::utils::logger::Logger;

/// TTL policies per data category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    /// Short-lived data (15 minutes) - user profiles
    QuarterHour = 900,
    /// Medium-lived data (1 hour) - movie lists
    OneHour = 3600,
}

impl CacheTtl {
    pub fn as_seconds(&self) -> u64 {
        *self as u64
    }
}

/// Cached data categories and their key prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    TrendingMovies,
    RecommendedMovies,
    UserProfile,
}

impl CacheCategory {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            CacheCategory::TrendingMovies => "trending_movies",
            CacheCategory::RecommendedMovies => "recommended_movies",
            CacheCategory::UserProfile => "user",
        }
    }

    pub fn ttl(&self) -> CacheTtl {
        match self {
            CacheCategory::TrendingMovies => CacheTtl::OneHour,
            CacheCategory::RecommendedMovies => CacheTtl::OneHour,
            CacheCategory::UserProfile => CacheTtl::QuarterHour,
        }
    }
}

/// Deterministic cache key builder
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    category: CacheCategory,
    components: Vec<String>,
}

impl CacheKeyBuilder {
    pub fn new(category: CacheCategory) -> Self {
        Self {
            category,
            components: Vec::new(),
        }
    }

    pub fn add_component<T: ToString>(mut self, component: T) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Appends the `page:{n}` suffix used by paginated lists.
    pub fn page(self, page: u32) -> Self {
        self.add_component("page").add_component(page)
    }

    pub fn build(self) -> String {
        let mut key = self.category.key_prefix().to_string();
        for component in self.components {
            key.push(':');
            key.push_str(&component);
        }
        key
    }
}

/// Typed cache for movie lists and user profiles.
///
/// Every operation degrades with the backend: a miss, a `false` write or a
/// zero count, never an error.
pub struct MovieCacheService {
    store: Arc<dyn CacheBackend>,
    logger: Logger,
}

impl MovieCacheService {
    pub fn new(store: Arc<dyn CacheBackend>) -> Self {
        let mut logger = Logger::from_env();
        logger.add_context("service", serde_json::json!("movie_cache"));
        Self { store, logger }
    }

    fn trending_key(window: TimeWindow, page: u32) -> String {
        CacheKeyBuilder::new(CacheCategory::TrendingMovies)
            .add_component(window.as_str())
            .page(page)
            .build()
    }

    fn recommendations_key(movie_id: u64, page: u32) -> String {
        CacheKeyBuilder::new(CacheCategory::RecommendedMovies)
            .add_component(movie_id)
            .page(page)
            .build()
    }

    fn user_profile_key(user_id: i64) -> String {
        CacheKeyBuilder::new(CacheCategory::UserProfile)
            .add_component(user_id)
            .build()
    }

    /// Cached trending list for a window and page, if present.
    pub async fn get_trending(&self, window: TimeWindow, page: u32) -> Option<MovieListPage> {
        self.get_json(&Self::trending_key(window, page)).await
    }

    /// Caches one page of trending results. Returns whether the write happened.
    pub async fn set_trending(&self, data: &MovieListPage, window: TimeWindow, page: u32) -> bool {
        self.set_json(
            &Self::trending_key(window, page),
            data,
            CacheCategory::TrendingMovies.ttl(),
        )
        .await
    }

    /// Cached recommendations for a movie and page, if present.
    pub async fn get_recommendations(&self, movie_id: u64, page: u32) -> Option<MovieListPage> {
        self.get_json(&Self::recommendations_key(movie_id, page))
            .await
    }

    /// Caches one page of recommendations. Returns whether the write happened.
    pub async fn set_recommendations(
        &self,
        movie_id: u64,
        data: &MovieListPage,
        page: u32,
    ) -> bool {
        self.set_json(
            &Self::recommendations_key(movie_id, page),
            data,
            CacheCategory::RecommendedMovies.ttl(),
        )
        .await
    }

    pub async fn get_user_profile(&self, user_id: i64) -> Option<UserProfile> {
        self.get_json(&Self::user_profile_key(user_id)).await
    }

    pub async fn set_user_profile(&self, user_id: i64, profile: &UserProfile) -> bool {
        self.set_json(
            &Self::user_profile_key(user_id),
            profile,
            CacheCategory::UserProfile.ttl(),
        )
        .await
    }

    /// Drops the cached profile after a favorites or settings change.
    pub async fn invalidate_user_profile(&self, user_id: i64) -> bool {
        self.store.delete(&Self::user_profile_key(user_id)).await
    }

    /// Clears every cached entry across all categories. Returns the number
    /// of keys removed.
    pub async fn clear_all(&self) -> u64 {
        let prefixes: Vec<String> = [
            CacheCategory::TrendingMovies,
            CacheCategory::RecommendedMovies,
            CacheCategory::UserProfile,
        ]
        .iter()
        .map(|category| format!("{}:", category.key_prefix()))
        .collect();

        let deletions = prefixes
            .iter()
            .map(|prefix| self.store.delete_by_prefix(prefix));

        let removed: u64 = join_all(deletions).await.into_iter().sum();
        self.logger
            .info(&format!("Cache cleared, {} keys removed", removed));
        removed
    }

    pub async fn stats(&self) -> CacheStoreStats {
        self.store.stats().await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Some(raw) => raw,
            None => {
                self.logger.debug(&format!("Cache miss for '{}'", key));
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                self.logger.debug(&format!("Cache hit for '{}'", key));
                Some(value)
            }
            Err(err) => {
                // Evict entries whose stored shape no longer decodes
                self.logger.warn(&format!(
                    "Evicting undecodable cache entry '{}': {}",
                    key, err
                ));
                self.store.delete(key).await;
                None
            }
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: CacheTtl) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                self.logger.error(&format!(
                    "Failed to serialize cache entry '{}': {}",
                    key, err
                ));
                return false;
            }
        };

        self.store.set_with_ttl(key, &raw, ttl.as_seconds()).await
    }
}
