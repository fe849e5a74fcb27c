//! Backend core for a movie recommendation service: a validated TMDB client,
//! a Redis-backed cache store and the read-through caching layer that ties
//! them together.

// Module declarations
pub mod services;
pub mod types;
pub mod utils;

pub use services::core::infrastructure::service_container::{AppConfig, ServiceContainer};
pub use utils::error::{ErrorKind, MovieRecError, MovieRecResult};
