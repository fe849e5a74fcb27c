// src/types.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::utils::error::MovieRecError;

/// Trending window supported by the metadata provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = MovieRecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            _ => Err(MovieRecError::validation_error(
                "time_window must be 'day' or 'week'",
            )),
        }
    }
}

/// One page of a paginated movie list as returned by the provider.
/// `results` items are kept as raw JSON so the payload round-trips through
/// the cache equivalent to what the provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieListPage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<Value>,
}

/// Cached user profile. `favorites_count` is derived from the favorites
/// list, which is why favorite changes invalidate this entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub favorites_count: u32,
}
