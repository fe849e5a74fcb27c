// src/services/core/movies/mod.rs

pub mod movie_cache;
pub mod movie_data;
pub mod tmdb_client;

pub use movie_cache::{CacheCategory, CacheKeyBuilder, CacheTtl, MovieCacheService};
pub use movie_data::{MovieDataService, MovieProvider};
pub use tmdb_client::{TmdbClient, TmdbConfig};
