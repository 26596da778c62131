use crate::error::Result;
use async_trait::async_trait;
use motoswap_core::{resolve_compatible, Category, Listing, Message, NewMessage, NewUser, User};

/// Source of users, listings and messages.
///
/// Implementations return errors for transport or backend failures; the
/// [`DataService`](crate::service::DataService) decides how to degrade.
/// A `limit` of `None` asks for the whole collection.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Label used in logs and metrics
    fn name(&self) -> &'static str;

    // User operations
    async fn list_users(&self, limit: Option<usize>) -> Result<Vec<User>>;
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn count_users(&self) -> Result<usize>;

    // Listing operations
    async fn list_listings(&self, limit: Option<usize>) -> Result<Vec<Listing>>;
    async fn count_listings(&self) -> Result<usize>;

    /// Categories a host of `category` accepts
    async fn compatible_categories(&self, category: &Category) -> Result<Vec<Category>> {
        Ok(resolve_compatible(category))
    }

    // Message operations
    async fn get_messages(&self, user_a: i64, user_b: i64, limit: usize) -> Result<Vec<Message>>;
    async fn send_message(&self, message: NewMessage) -> Result<Message>;
    async fn count_messages(&self) -> Result<usize>;

    /// Cheap round trip to check the provider is reachable
    async fn test_connection(&self) -> Result<bool>;
}
