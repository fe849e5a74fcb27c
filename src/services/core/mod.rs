// src/services/core/mod.rs

pub mod infrastructure;
pub mod movies;

// Re-export all services for convenience
pub use infrastructure::*;
pub use movies::*;
