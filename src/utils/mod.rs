// src/utils/mod.rs

pub mod error;
pub mod helpers;
pub mod logger;

// Re-export commonly used items
pub use error::{ErrorKind, MovieRecError, MovieRecResult};
pub use helpers::*;
pub use logger::{init_logger, LogLevel, Logger};
