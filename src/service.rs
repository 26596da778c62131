use crate::config::Config;
use crate::constants::DEFAULT_MESSAGE_LIMIT;
use crate::error::Result;
use crate::metrics::{DataMetrics, SearchMetrics};
use crate::storage::DataProvider;
use motoswap_core::{
    filter_listings, Category, FilterCriteria, Listing, Message, NewMessage, NewUser, Stats, User,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
enum CachedValue {
    Users(Vec<User>),
    Listings(Vec<Listing>),
    Categories(Vec<Category>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

/// Snapshot of the read cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub entries: usize,
    pub keys: Vec<String>,
}

/// Read-through cache in front of a [`DataProvider`].
///
/// Reads never fail: a provider error is logged, counted, and replaced by an
/// empty result (or the category itself for compatibility lookups). Writes
/// propagate their errors.
pub struct DataService {
    provider: Arc<dyn DataProvider>,
    cache: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl DataService {
    pub fn new(provider: Arc<dyn DataProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn from_config(provider: Arc<dyn DataProvider>, config: &Config) -> Self {
        Self::new(provider, config.cache_ttl())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, key: &str) -> Option<CachedValue> {
        let mut cache = self.cache();
        match cache.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                DataMetrics::record_cache_hit(key);
                debug!("Cache hit: {}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                cache.remove(key);
                DataMetrics::record_cache_miss(key);
                None
            }
            None => {
                DataMetrics::record_cache_miss(key);
                None
            }
        }
    }

    /// Insert `value`, dropping every entry that has outlived the TTL.
    fn store(&self, key: String, value: CachedValue) {
        let mut cache = self.cache();
        let before = cache.len();
        cache.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        if cache.len() < before {
            debug!("Swept {} expired cache entries", before - cache.len());
        }
        cache.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate_prefix(&self, prefix: &str) {
        self.cache().retain(|key, _| !key.starts_with(prefix));
    }

    /// Time a provider call and log/count its failure.
    async fn call<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let provider = self.provider.name();
        let start = Instant::now();
        let result = fut.await;
        DataMetrics::record_provider_call(provider, start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            error!("{} failed on {} provider: {}", operation, provider, e);
            DataMetrics::record_provider_error(provider, operation);
        }
        result
    }

    fn page_key(kind: &str, limit: Option<usize>) -> String {
        match limit {
            Some(limit) => format!("{}:{}", kind, limit),
            None => format!("{}:all", kind),
        }
    }

    /// First `limit` users.
    pub async fn users(&self, limit: usize) -> Vec<User> {
        self.fetch_users(Some(limit)).await
    }

    pub async fn all_users(&self) -> Vec<User> {
        self.fetch_users(None).await
    }

    async fn fetch_users(&self, limit: Option<usize>) -> Vec<User> {
        let key = Self::page_key("users", limit);
        if let Some(CachedValue::Users(users)) = self.cached(&key) {
            return users;
        }

        match self.call("list_users", self.provider.list_users(limit)).await {
            Ok(users) => {
                debug!("Loaded {} users", users.len());
                self.store(key, CachedValue::Users(users.clone()));
                users
            }
            Err(_) => Vec::new(),
        }
    }

    /// First `limit` listings.
    pub async fn listings(&self, limit: usize) -> Vec<Listing> {
        self.fetch_listings(Some(limit)).await
    }

    pub async fn all_listings(&self) -> Vec<Listing> {
        self.fetch_listings(None).await
    }

    async fn fetch_listings(&self, limit: Option<usize>) -> Vec<Listing> {
        let key = Self::page_key("listings", limit);
        if let Some(CachedValue::Listings(listings)) = self.cached(&key) {
            return listings;
        }

        match self.call("list_listings", self.provider.list_listings(limit)).await {
            Ok(listings) => {
                debug!("Loaded {} listings", listings.len());
                self.store(key, CachedValue::Listings(listings.clone()));
                listings
            }
            Err(_) => Vec::new(),
        }
    }

    pub async fn user(&self, id: i64) -> Option<User> {
        self.call("get_user", self.provider.get_user(id))
            .await
            .ok()
            .flatten()
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.call("get_user_by_email", self.provider.get_user_by_email(email))
            .await
            .ok()
            .flatten()
    }

    pub async fn compatible_categories(&self, category: &Category) -> Vec<Category> {
        SearchMetrics::record_compatibility_lookup();
        let key = format!("compat:{}", category);
        if let Some(CachedValue::Categories(categories)) = self.cached(&key) {
            return categories;
        }

        match self
            .call("compatible_categories", self.provider.compatible_categories(category))
            .await
        {
            Ok(categories) => {
                self.store(key, CachedValue::Categories(categories.clone()));
                categories
            }
            Err(_) => vec![category.clone()],
        }
    }

    /// The whole listing collection narrowed by `criteria`.
    pub async fn search_listings(&self, criteria: &FilterCriteria) -> Vec<Listing> {
        let listings = self.all_listings().await;

        let start = Instant::now();
        let matched = filter_listings(&listings, criteria);
        SearchMetrics::record_filter(listings.len(), matched.len(), start.elapsed().as_secs_f64());

        info!(
            "Search kept {} of {} listings (category={:?}, location={:?}, facility={:?}, kind={:?}, max_points={:?})",
            matched.len(),
            listings.len(),
            criteria.active_category().map(Category::label),
            criteria.active_location(),
            criteria.active_facility_group(),
            criteria.active_accommodation_kind(),
            criteria.max_points
        );
        matched
    }

    /// Listings whose host's motorcycle category a rider of `rider_category` may use.
    pub async fn compatible_listings(&self, rider_category: &Category) -> Vec<Listing> {
        let compatible = self.compatible_categories(rider_category).await;
        self.all_listings()
            .await
            .into_iter()
            .filter(|listing| compatible.contains(&listing.category))
            .collect()
    }

    pub async fn messages(&self, user_a: i64, user_b: i64) -> Vec<Message> {
        self.call(
            "get_messages",
            self.provider.get_messages(user_a, user_b, DEFAULT_MESSAGE_LIMIT),
        )
        .await
        .unwrap_or_default()
    }

    pub async fn send_message(&self, message: NewMessage) -> Result<Message> {
        let message = self.call("send_message", self.provider.send_message(message)).await?;
        DataMetrics::record_message_sent();
        Ok(message)
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let user = self.call("create_user", self.provider.create_user(user)).await?;
        self.invalidate_prefix("users:");
        self.invalidate_prefix("listings:");
        Ok(user)
    }

    /// Exact totals from the provider; the average rating covers every user.
    pub async fn stats(&self) -> Stats {
        let users = self.all_users().await;
        let total_users = self
            .call("count_users", self.provider.count_users())
            .await
            .unwrap_or(users.len());
        let total_listings = self
            .call("count_listings", self.provider.count_listings())
            .await
            .unwrap_or_default();
        let total_messages = self
            .call("count_messages", self.provider.count_messages())
            .await
            .unwrap_or_default();

        let average_rating = if users.is_empty() {
            None
        } else {
            Some(users.iter().map(|u| u.rating).sum::<f64>() / users.len() as f64)
        };

        Stats {
            total_users,
            total_listings,
            total_messages,
            average_rating,
        }
    }

    pub async fn test_connection(&self) -> bool {
        self.call("test_connection", self.provider.test_connection())
            .await
            .unwrap_or(false)
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
        info!("Data cache cleared");
    }

    pub fn cache_info(&self) -> CacheInfo {
        let cache = self.cache();
        let mut keys: Vec<String> = cache.keys().cloned().collect();
        keys.sort();
        CacheInfo {
            entries: keys.len(),
            keys,
        }
    }
}
