use async_trait::async_trait;
use motoswap::storage::fixture::demo_users;
use motoswap::{DataProvider, DataService, FixtureProvider, MotoSwapError, Result};
use motoswap_core::{
    filter_listings, Category, FilterCriteria, Listing, Message, MessageKind, NewMessage, NewUser,
    User,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixture provider that counts listing fetches
struct CountingProvider {
    inner: FixtureProvider,
    listing_calls: AtomicUsize,
}

impl CountingProvider {
    fn new() -> Self {
        Self {
            inner: FixtureProvider::new(),
            listing_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DataProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>> {
        self.inner.list_users(limit).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.inner.create_user(user).await
    }

    async fn count_users(&self) -> Result<usize> {
        self.inner.count_users().await
    }

    async fn list_listings(&self, limit: Option<usize>) -> Result<Vec<Listing>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_listings(limit).await
    }

    async fn count_listings(&self) -> Result<usize> {
        self.inner.count_listings().await
    }

    async fn get_messages(&self, user_a: i64, user_b: i64, limit: usize) -> Result<Vec<Message>> {
        self.inner.get_messages(user_a, user_b, limit).await
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message> {
        self.inner.send_message(message).await
    }

    async fn count_messages(&self) -> Result<usize> {
        self.inner.count_messages().await
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Provider whose every call fails like an unreachable backend
struct FailingProvider;

fn backend_down<T>() -> Result<T> {
    Err(MotoSwapError::Api {
        message: "backend unavailable".to_string(),
    })
}

#[async_trait]
impl DataProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn list_users(&self, _limit: Option<usize>) -> Result<Vec<User>> {
        backend_down()
    }

    async fn get_user(&self, _id: i64) -> Result<Option<User>> {
        backend_down()
    }

    async fn count_users(&self) -> Result<usize> {
        backend_down()
    }

    async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>> {
        backend_down()
    }

    async fn create_user(&self, _user: NewUser) -> Result<User> {
        backend_down()
    }

    async fn list_listings(&self, _limit: Option<usize>) -> Result<Vec<Listing>> {
        backend_down()
    }

    async fn count_listings(&self) -> Result<usize> {
        backend_down()
    }

    async fn compatible_categories(&self, _category: &Category) -> Result<Vec<Category>> {
        backend_down()
    }

    async fn get_messages(&self, _a: i64, _b: i64, _limit: usize) -> Result<Vec<Message>> {
        backend_down()
    }

    async fn send_message(&self, _message: NewMessage) -> Result<Message> {
        backend_down()
    }

    async fn count_messages(&self) -> Result<usize> {
        backend_down()
    }

    async fn test_connection(&self) -> Result<bool> {
        backend_down()
    }
}

#[tokio::test]
async fn test_cache_hit_avoids_second_provider_call() {
    let provider = Arc::new(CountingProvider::new());
    let service = DataService::new(provider.clone(), Duration::from_secs(300));

    let first = service.listings(20).await;
    let second = service.listings(20).await;

    assert_eq!(first, second);
    assert_eq!(provider.listing_calls.load(Ordering::SeqCst), 1);

    service.clear_cache();
    service.listings(20).await;
    assert_eq!(provider.listing_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_expired_entries_are_refetched() {
    let provider = Arc::new(CountingProvider::new());
    let service = DataService::new(provider.clone(), Duration::from_millis(20));

    service.listings(20).await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    service.listings(20).await;

    assert_eq!(provider.listing_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_failure_degrades_reads() {
    let service = DataService::new(Arc::new(FailingProvider), Duration::from_secs(300));

    assert!(service.users(10).await.is_empty());
    assert!(service.listings(10).await.is_empty());
    assert!(service.user_by_email("carlos.rodriguez@motoswap.es").await.is_none());
    assert!(service.user(1).await.is_none());
    assert!(service.messages(1, 2).await.is_empty());
    assert_eq!(
        service.compatible_categories(&Category::Naked).await,
        vec![Category::Naked]
    );
    assert!(!service.test_connection().await);

    let stats = service.stats().await;
    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.total_messages, 0);
    assert_eq!(stats.average_rating, None);

    // Failures are not cached
    assert_eq!(service.cache_info().entries, 0);
}

#[tokio::test]
async fn test_send_message_propagates_errors() {
    let service = DataService::new(Arc::new(FailingProvider), Duration::from_secs(300));
    let result = service
        .send_message(NewMessage {
            sender_id: 1,
            recipient_id: 2,
            content: "Hola".to_string(),
            kind: MessageKind::Message,
        })
        .await;

    assert!(matches!(result, Err(MotoSwapError::Api { .. })));
}

#[tokio::test]
async fn test_search_equals_engine_over_provider_listings() {
    let provider = FixtureProvider::new();
    let all = provider.list_listings(None).await.unwrap();
    let service = DataService::new(Arc::new(FixtureProvider::new()), Duration::from_secs(300));

    let criteria_set = [
        FilterCriteria::new(),
        FilterCriteria::new().with_category(Category::Naked),
        FilterCriteria::new().with_location("ESPAÑA").with_facility_group("garage"),
        FilterCriteria::from_form("Cruiser", "valencia", ""),
        FilterCriteria::new().with_facility_group("lavado"),
    ];

    for criteria in &criteria_set {
        assert_eq!(
            service.search_listings(criteria).await,
            filter_listings(&all, criteria),
            "{:?}",
            criteria
        );
    }
}

#[tokio::test]
async fn test_sport_rider_search() {
    let service = DataService::new(Arc::new(FixtureProvider::new()), Duration::from_secs(300));
    let criteria = FilterCriteria::from_form("Deportiva", "", "");
    let owners: Vec<String> = service
        .search_listings(&criteria)
        .await
        .into_iter()
        .map(|l| l.owner_name)
        .collect();

    // Sport and Naked hosts accept a sport bike
    let expected: Vec<String> = demo_users()
        .into_iter()
        .filter(|u| matches!(u.motorcycle.category, Category::Sport | Category::Naked))
        .map(|u| u.name)
        .collect();
    assert_eq!(owners, expected);
}

/// Thirty hosts; only #26 lives in Oviedo.
fn large_community() -> FixtureProvider {
    let template = demo_users().remove(4);
    let users: Vec<User> = (1..=30)
        .map(|id| {
            let mut user = template.clone();
            user.id = id;
            user.name = format!("Anfitrión {}", id);
            user.email = format!("host{}@motoswap.es", id);
            user.location = if id == 26 {
                "Oviedo, España".to_string()
            } else {
                "Bilbao, España".to_string()
            };
            user
        })
        .collect();
    FixtureProvider::with_data(users, Vec::new())
}

#[tokio::test]
async fn test_search_and_stats_cover_whole_collection() {
    let service = DataService::new(Arc::new(large_community()), Duration::from_secs(300));

    assert_eq!(service.search_listings(&FilterCriteria::new()).await.len(), 30);

    let oviedo = service
        .search_listings(&FilterCriteria::new().with_location("oviedo"))
        .await;
    assert_eq!(oviedo.len(), 1);
    assert_eq!(oviedo[0].owner_id, 26);

    let stats = service.stats().await;
    assert_eq!(stats.total_users, 30);
    assert_eq!(stats.total_listings, 30);

    assert_eq!(service.user(26).await.map(|u| u.location), Some("Oviedo, España".to_string()));
}

#[tokio::test]
async fn test_kind_points_and_owner_clauses() {
    let service = DataService::new(Arc::new(FixtureProvider::new()), Duration::from_secs(300));
    let ids = |listings: Vec<Listing>| listings.into_iter().map(|l| l.id).collect::<Vec<_>>();

    let apartments = FilterCriteria::new().with_accommodation_kind("apartamento");
    assert_eq!(ids(service.search_listings(&apartments).await), vec![2, 6]);

    let affordable = apartments.clone().with_max_points(200);
    assert_eq!(ids(service.search_listings(&affordable).await), vec![6]);

    let others = FilterCriteria::new().with_max_points(150).excluding_owner(1);
    assert_eq!(ids(service.search_listings(&others).await), vec![6, 10]);
}
