#![allow(dead_code)]

// MovieCacheService Unit Tests
// Key layout, TTL policy, payload round-trips, invalidation and
// degraded-backend fallbacks

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use movierec_core::services::core::infrastructure::cache_store::{CacheBackend, CacheStoreStats};
use movierec_core::services::core::movies::movie_cache::MovieCacheService;
use movierec_core::types::{MovieListPage, TimeWindow, UserProfile};

// In-memory cache backend recording stored values and their TTLs
struct MockCacheBackend {
    data: Mutex<HashMap<String, (String, u64)>>,
    available: Mutex<bool>,
}

impl MockCacheBackend {
    fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            available: Mutex::new(true),
        }
    }

    fn set_available(&self, available: bool) {
        *self.available.lock().unwrap() = available;
    }

    fn is_up(&self) -> bool {
        *self.available.lock().unwrap()
    }

    fn ttl_for(&self, key: &str) -> Option<u64> {
        self.data.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    fn raw_insert(&self, key: &str, value: &str, ttl: u64) {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
    }

    fn key_count(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

#[async_trait]
impl CacheBackend for MockCacheBackend {
    async fn is_available(&self) -> bool {
        self.is_up()
    }

    async fn get(&self, key: &str) -> Option<String> {
        if !self.is_up() {
            return None;
        }
        self.data
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        if !self.is_up() {
            return false;
        }
        self.raw_insert(key, value, ttl_seconds);
        true
    }

    async fn delete(&self, key: &str) -> bool {
        if !self.is_up() {
            return false;
        }
        self.data.lock().unwrap().remove(key).is_some()
    }

    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        if !self.is_up() {
            return 0;
        }
        let mut data = self.data.lock().unwrap();
        let doomed: Vec<String> = data
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        for key in &doomed {
            data.remove(key);
        }
        doomed.len() as u64
    }

    async fn stats(&self) -> CacheStoreStats {
        let status = if self.is_up() {
            "connected"
        } else {
            "disconnected"
        };
        CacheStoreStats {
            status: status.to_string(),
            total_keys: self.key_count() as u64,
            ..Default::default()
        }
    }
}

fn service_with_backend() -> (Arc<MockCacheBackend>, MovieCacheService) {
    let backend = Arc::new(MockCacheBackend::new());
    let service = MovieCacheService::new(backend.clone());
    (backend, service)
}

fn trending_page() -> MovieListPage {
    serde_json::from_value(serde_json::json!({
        "page": 1,
        "total_pages": 500,
        "total_results": 10000,
        "results": [
            {"id": 123, "title": "First", "vote_average": 7.8},
            {"id": 456, "title": "Second", "vote_average": 6.9}
        ]
    }))
    .unwrap()
}

fn profile(user_id: i64, favorites_count: u32) -> UserProfile {
    UserProfile {
        user_id,
        username: format!("user{}", user_id),
        email: Some(format!("user{}@example.com", user_id)),
        favorites_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trending_round_trip_is_lossless() {
        let (_, service) = service_with_backend();
        let page = trending_page();

        assert!(service.set_trending(&page, TimeWindow::Day, 1).await);
        let cached = service.get_trending(TimeWindow::Day, 1).await.unwrap();
        assert_eq!(cached, page);
    }

    #[tokio::test]
    async fn test_writes_land_under_expected_keys() {
        let (backend, service) = service_with_backend();

        service
            .set_trending(&trending_page(), TimeWindow::Day, 1)
            .await;
        service
            .set_recommendations(603, &trending_page(), 2)
            .await;
        service.set_user_profile(42, &profile(42, 3)).await;

        assert!(backend.ttl_for("trending_movies:day:page:1").is_some());
        assert!(backend.ttl_for("recommended_movies:603:page:2").is_some());
        assert!(backend.ttl_for("user:42").is_some());
        assert_eq!(backend.key_count(), 3);
    }

    #[tokio::test]
    async fn test_ttl_policy_per_category() {
        let (backend, service) = service_with_backend();

        service
            .set_trending(&trending_page(), TimeWindow::Day, 1)
            .await;
        service
            .set_recommendations(603, &trending_page(), 2)
            .await;
        service.set_user_profile(42, &profile(42, 3)).await;

        assert_eq!(backend.ttl_for("trending_movies:day:page:1"), Some(3600));
        assert_eq!(backend.ttl_for("recommended_movies:603:page:2"), Some(3600));
        assert_eq!(backend.ttl_for("user:42"), Some(900));
    }

    #[tokio::test]
    async fn test_pages_are_cached_independently() {
        let (_, service) = service_with_backend();

        let mut page_one = trending_page();
        page_one.page = 1;
        let mut page_two = trending_page();
        page_two.page = 2;

        service.set_trending(&page_one, TimeWindow::Week, 1).await;
        service.set_trending(&page_two, TimeWindow::Week, 2).await;

        let first = service.get_trending(TimeWindow::Week, 1).await.unwrap();
        let second = service.get_trending(TimeWindow::Week, 2).await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(second.page, 2);

        // Same page number under a different window is a separate entry
        assert_eq!(service.get_trending(TimeWindow::Day, 1).await, None);
    }

    #[tokio::test]
    async fn test_empty_result_set_is_still_a_hit() {
        let (_, service) = service_with_backend();

        let empty: MovieListPage = serde_json::from_value(serde_json::json!({
            "page": 1,
            "total_pages": 0,
            "total_results": 0,
            "results": []
        }))
        .unwrap();

        service.set_trending(&empty, TimeWindow::Day, 1).await;
        let cached = service.get_trending(TimeWindow::Day, 1).await.unwrap();
        assert!(cached.results.is_empty());
        assert_eq!(cached.total_results, 0);
    }

    #[tokio::test]
    async fn test_unavailable_backend_reads_as_miss() {
        let (backend, service) = service_with_backend();

        service
            .set_trending(&trending_page(), TimeWindow::Day, 1)
            .await;
        backend.set_available(false);

        assert_eq!(service.get_trending(TimeWindow::Day, 1).await, None);
        assert!(
            !service
                .set_trending(&trending_page(), TimeWindow::Day, 2)
                .await
        );
        assert_eq!(service.clear_all().await, 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_evicted() {
        let (backend, service) = service_with_backend();

        backend.raw_insert("trending_movies:day:page:1", "not json at all", 3600);

        assert_eq!(service.get_trending(TimeWindow::Day, 1).await, None);
        assert_eq!(backend.ttl_for("trending_movies:day:page:1"), None);
    }

    #[tokio::test]
    async fn test_profile_invalidation_is_per_user() {
        let (_, service) = service_with_backend();

        service.set_user_profile(42, &profile(42, 3)).await;
        service.set_user_profile(43, &profile(43, 0)).await;

        let cached = service.get_user_profile(42).await.unwrap();
        assert_eq!(cached.favorites_count, 3);

        // A favorites change drops user 42 only
        assert!(service.invalidate_user_profile(42).await);
        assert_eq!(service.get_user_profile(42).await, None);

        let survivor = service.get_user_profile(43).await.unwrap();
        assert_eq!(survivor.user_id, 43);
    }

    #[tokio::test]
    async fn test_invalidate_missing_profile_reports_false() {
        let (_, service) = service_with_backend();
        assert!(!service.invalidate_user_profile(42).await);
    }

    #[tokio::test]
    async fn test_clear_all_spans_every_category() {
        let (backend, service) = service_with_backend();

        service
            .set_trending(&trending_page(), TimeWindow::Day, 1)
            .await;
        service
            .set_trending(&trending_page(), TimeWindow::Week, 1)
            .await;
        service
            .set_recommendations(603, &trending_page(), 1)
            .await;
        service.set_user_profile(42, &profile(42, 3)).await;

        assert_eq!(service.clear_all().await, 4);
        assert_eq!(backend.key_count(), 0);
    }

    #[test]
    fn test_stats_pass_through() {
        let (_, service) = service_with_backend();

        tokio_test::block_on(async {
            service
                .set_trending(&trending_page(), TimeWindow::Day, 1)
                .await;
        });

        let stats = tokio_test::block_on(service.stats());
        assert_eq!(stats.status, "connected");
        assert_eq!(stats.total_keys, 1);
    }
}
