// src/utils/helpers.rs

use crate::utils::error::{MovieRecError, MovieRecResult};

/// Validates a pagination parameter. Pages are 1-based.
pub fn validate_page(page: u32) -> MovieRecResult<()> {
    if page < 1 {
        return Err(MovieRecError::validation_error(
            "Page must be greater than 0",
        ));
    }
    Ok(())
}

/// Validates an external movie identifier.
pub fn validate_movie_id(movie_id: u64) -> MovieRecResult<()> {
    if movie_id == 0 {
        return Err(MovieRecError::validation_error(
            "Movie ID must be a positive integer",
        ));
    }
    Ok(())
}

/// Validates a free-text search query.
pub fn validate_search_query(query: &str) -> MovieRecResult<()> {
    if query.trim().is_empty() {
        return Err(MovieRecError::validation_error(
            "Query parameter cannot be empty",
        ));
    }
    Ok(())
}
