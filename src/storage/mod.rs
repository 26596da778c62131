pub mod fixture;
pub mod supabase;
pub mod traits;

pub use fixture::FixtureProvider;
pub use supabase::SupabaseProvider;
pub use traits::DataProvider;

use crate::config::{Config, DataSource};
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Build the provider selected by `config.data.source`.
pub fn build_provider(config: &Config) -> Result<Arc<dyn DataProvider>> {
    let provider: Arc<dyn DataProvider> = match config.data.source {
        DataSource::Fixture => Arc::new(FixtureProvider::new()),
        DataSource::Supabase => Arc::new(SupabaseProvider::from_config(config)?),
    };
    info!("Using {} data provider", provider.name());
    Ok(provider)
}
