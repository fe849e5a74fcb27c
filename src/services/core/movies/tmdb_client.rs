//! TMDB Client - validated access to the movie metadata provider
//!
//! Every fetch validates its inputs before any network activity, builds the
//! endpoint URL with the API key appended, and runs the request under the
//! shared retry policy. Upstream failures come back as typed errors carrying
//! the provider status and endpoint.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::services::core::infrastructure::retry::{run_with_retry, RetryConfig};
use crate::types::{MovieListPage, TimeWindow};
use crate::utils::logger::Logger;
use crate::utils::{
    validate_movie_id, validate_page, validate_search_query, MovieRecError, MovieRecResult,
};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB client configuration
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Provider API key, appended to every request
    pub api_key: String,
    /// Provider base URL
    pub base_url: String,
    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Retry policy for failed requests
    pub retry: RetryConfig,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }
}

impl TmdbConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("TMDB_API_KEY") {
            config.api_key = api_key;
        }

        if let Ok(base_url) = std::env::var("TMDB_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> MovieRecResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(MovieRecError::config_error(
                "TMDB API key must be configured",
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(MovieRecError::config_error(
                "TMDB base URL must not be empty",
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(MovieRecError::config_error(
                "Request timeout must be greater than 0",
            ));
        }

        self.retry.validate()
    }
}

/// HTTP client for the TMDB metadata API.
pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
    logger: Logger,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> MovieRecResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| {
                MovieRecError::internal_error(format!("Failed to build HTTP client: {}", e))
            })?;

        let mut logger = Logger::from_env();
        logger.add_context("service", serde_json::json!("tmdb_client"));

        Ok(Self {
            config,
            client,
            logger,
        })
    }

    /// One page of trending movies for the given window.
    pub async fn fetch_trending(
        &self,
        window: TimeWindow,
        page: u32,
    ) -> MovieRecResult<MovieListPage> {
        validate_page(page)?;

        let path = format!("trending/movie/{}", window.as_str());
        let value = self
            .get_json(&path, &[("page", page.to_string())])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One page of recommendations for a movie.
    pub async fn fetch_recommendations(
        &self,
        movie_id: u64,
        page: u32,
    ) -> MovieRecResult<MovieListPage> {
        validate_movie_id(movie_id)?;
        validate_page(page)?;

        let path = format!("movie/{}/recommendations", movie_id);
        let value = self
            .get_json(&path, &[("page", page.to_string())])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One page of currently popular movies.
    pub async fn fetch_popular(&self, page: u32) -> MovieRecResult<MovieListPage> {
        validate_page(page)?;

        let value = self
            .get_json("movie/popular", &[("page", page.to_string())])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One page of title search results.
    pub async fn fetch_search(&self, query: &str, page: u32) -> MovieRecResult<MovieListPage> {
        validate_search_query(query)?;
        validate_page(page)?;

        let value = self
            .get_json(
                "search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Full detail record for a single movie, kept as raw JSON.
    pub async fn fetch_movie_details(&self, movie_id: u64) -> MovieRecResult<Value> {
        validate_movie_id(movie_id)?;

        let path = format!("movie/{}", movie_id);
        self.get_json(&path, &[]).await
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> MovieRecResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.config.api_key);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> MovieRecResult<Value> {
        let url = self.endpoint_url(path, params)?;
        self.logger.debug(&format!("GET {}", path));

        run_with_retry(&self.config.retry, path, || {
            let url = url.clone();
            async move { self.request_once(url).await }
        })
        .await
        .map_err(|err| err.with_endpoint(path))
    }

    async fn request_once(&self, url: Url) -> MovieRecResult<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MovieRecError::from_upstream_status(status.as_u16(), &body));
        }

        Ok(response.json::<Value>().await?)
    }
}
