// src/services/core/infrastructure/mod.rs

pub mod cache_store;
pub mod retry;
pub mod service_container;

pub use cache_store::{CacheBackend, CacheStoreConfig, CacheStoreStats, RedisCacheStore};
pub use retry::{run_with_retry, RetryConfig};
pub use service_container::{AppConfig, ServiceContainer};
