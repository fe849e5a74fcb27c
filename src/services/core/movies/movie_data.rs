//! Movie Data - read-through orchestration over provider and cache
//!
//! Cached operations follow one explicit sequence: validate input, consult
//! the cache, fetch from the provider on a miss, then populate the cache.
//! A failed cache write never fails the request; the fresh payload is
//! returned either way.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::core::movies::movie_cache::MovieCacheService;
use crate::services::core::movies::tmdb_client::TmdbClient;
use crate::types::{MovieListPage, TimeWindow};
use crate::utils::logger::Logger;
use crate::utils::{validate_movie_id, validate_page, MovieRecResult};

/// Upstream source of movie metadata, implemented by [`TmdbClient`].
#[async_trait]
pub trait MovieProvider: Send + Sync {
    async fn fetch_trending(&self, window: TimeWindow, page: u32)
        -> MovieRecResult<MovieListPage>;

    async fn fetch_recommendations(
        &self,
        movie_id: u64,
        page: u32,
    ) -> MovieRecResult<MovieListPage>;

    async fn fetch_popular(&self, page: u32) -> MovieRecResult<MovieListPage>;

    async fn fetch_search(&self, query: &str, page: u32) -> MovieRecResult<MovieListPage>;

    async fn fetch_movie_details(&self, movie_id: u64) -> MovieRecResult<Value>;
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn fetch_trending(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> MovieRecResult<MovieListPage> {
        TmdbClient::fetch_trending(self, window, page).await
    }

    async fn fetch_recommendations(
        &self,
        movie_id: u64,
        page: u32,
    ) -> MovieRecResult<MovieListPage> {
        TmdbClient::fetch_recommendations(self, movie_id, page).await
    }

    async fn fetch_popular(&self, page: u32) -> MovieRecResult<MovieListPage> {
        TmdbClient::fetch_popular(self, page).await
    }

    async fn fetch_search(&self, query: &str, page: u32) -> MovieRecResult<MovieListPage> {
        TmdbClient::fetch_search(self, query, page).await
    }

    async fn fetch_movie_details(&self, movie_id: u64) -> MovieRecResult<Value> {
        TmdbClient::fetch_movie_details(self, movie_id).await
    }
}

/// Serves movie lists from the cache, falling back to the provider.
pub struct MovieDataService {
    cache: Arc<MovieCacheService>,
    provider: Arc<dyn MovieProvider>,
    logger: Logger,
}

impl MovieDataService {
    pub fn new(cache: Arc<MovieCacheService>, provider: Arc<dyn MovieProvider>) -> Self {
        let mut logger = Logger::from_env();
        logger.add_context("service", serde_json::json!("movie_data"));
        Self {
            cache,
            provider,
            logger,
        }
    }

    /// Trending movies for a window, cached per page for an hour.
    pub async fn trending(&self, window: TimeWindow, page: u32) -> MovieRecResult<MovieListPage> {
        validate_page(page)?;

        if let Some(cached) = self.cache.get_trending(window, page).await {
            return Ok(cached);
        }

        self.logger.debug(&format!(
            "Fetching trending '{}' page {} from provider",
            window, page
        ));
        let fresh = self.provider.fetch_trending(window, page).await?;
        self.cache.set_trending(&fresh, window, page).await;
        Ok(fresh)
    }

    /// Recommendations for a movie, cached per page for an hour.
    pub async fn recommendations(
        &self,
        movie_id: u64,
        page: u32,
    ) -> MovieRecResult<MovieListPage> {
        validate_movie_id(movie_id)?;
        validate_page(page)?;

        if let Some(cached) = self.cache.get_recommendations(movie_id, page).await {
            return Ok(cached);
        }

        self.logger.debug(&format!(
            "Fetching recommendations for movie {} page {} from provider",
            movie_id, page
        ));
        let fresh = self.provider.fetch_recommendations(movie_id, page).await?;
        self.cache.set_recommendations(movie_id, &fresh, page).await;
        Ok(fresh)
    }

    /// Popular movies, always fetched from the provider.
    pub async fn popular(&self, page: u32) -> MovieRecResult<MovieListPage> {
        self.provider.fetch_popular(page).await
    }

    /// Title search, always fetched from the provider.
    pub async fn search(&self, query: &str, page: u32) -> MovieRecResult<MovieListPage> {
        self.provider.fetch_search(query, page).await
    }

    /// Detail record for one movie, always fetched from the provider.
    pub async fn movie_details(&self, movie_id: u64) -> MovieRecResult<Value> {
        self.provider.fetch_movie_details(movie_id).await
    }
}
