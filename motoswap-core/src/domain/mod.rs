use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod category;

pub use category::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motorcycle {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub displacement: String,
    #[serde(default)]
    pub license: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    pub kind: String,
    pub rooms: u32,
    pub garage: String,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub points_per_night: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub age: u32,
    pub experience_years: u32,
    #[serde(default)]
    pub location: String,
    pub rating: f64,
    pub points: i64,
    #[serde(default)]
    pub total_exchanges: u32,
    pub motorcycle: Motorcycle,
    #[serde(default)]
    pub accommodation: Option<Accommodation>,
}

impl User {
    /// The listing card for this user's accommodation, if they host one.
    pub fn listing(&self) -> Option<Listing> {
        let accommodation = self.accommodation.as_ref()?;
        Some(Listing {
            id: self.id,
            owner_id: self.id,
            owner_name: self.name.clone(),
            location: self.location.clone(),
            category: self.motorcycle.category.clone(),
            facilities: accommodation.facilities.clone(),
            accommodation_kind: accommodation.kind.clone(),
            rooms: accommodation.rooms,
            garage: accommodation.garage.clone(),
            points: self.points,
            rating: self.rating,
        })
    }
}

/// One host's accommodation offering, as shown on the dashboard.
///
/// `location`, `category` and `facilities` default to empty when a data
/// source omits them; the filter treats those as unknown rather than
/// rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    /// Id of the hosting user; 0 when the source does not say.
    #[serde(default)]
    pub owner_id: i64,
    pub owner_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub accommodation_kind: String,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub garage: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub rating: f64,
}

impl Listing {
    /// A bare listing; the owner id defaults to `id` as in one-listing-per-host data.
    pub fn new(
        id: i64,
        owner_name: impl Into<String>,
        location: impl Into<String>,
        category: impl Into<Category>,
        facilities: Vec<String>,
    ) -> Self {
        Self {
            id,
            owner_id: id,
            owner_name: owner_name.into(),
            location: location.into(),
            category: category.into(),
            facilities,
            accommodation_kind: String::new(),
            rooms: 0,
            garage: String::new(),
            points: 0,
            rating: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    AutoReply,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn involves(&self, a: i64, b: i64) -> bool {
        (self.sender_id == a && self.recipient_id == b)
            || (self.sender_id == b && self.recipient_id == a)
    }
}

/// Arguments for storing a new message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub kind: MessageKind,
}

/// Arguments for creating a user; the id is assigned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub experience_years: u32,
    pub location: String,
    pub rating: f64,
    pub points: i64,
    pub motorcycle: Motorcycle,
    pub accommodation: Option<Accommodation>,
}

impl NewUser {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
            experience_years: self.experience_years,
            location: self.location,
            rating: self.rating,
            points: self.points,
            total_exchanges: 0,
            motorcycle: self.motorcycle,
            accommodation: self.accommodation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: usize,
    pub total_listings: usize,
    pub total_messages: usize,
    pub average_rating: Option<f64>,
}
