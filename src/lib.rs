//! MotoSwap application layer: data providers, the cached data service,
//! sessions and chat on top of the `motoswap-core` matching engine.

pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod metrics;
pub mod service;
pub mod session;
pub mod storage;

pub use chat::{ChatLine, ChatService, Direction};
pub use config::{Config, DataSource};
pub use error::{MotoSwapError, Result};
pub use service::{CacheInfo, DataService};
pub use session::{RegistrationForm, Section, Session};
pub use storage::{build_provider, DataProvider, FixtureProvider, SupabaseProvider};
