use crate::constants::*;
use crate::error::{MotoSwapError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Fixture,
    Supabase,
}

impl FromStr for DataSource {
    type Err = MotoSwapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            FIXTURE_SOURCE => Ok(DataSource::Fixture),
            SUPABASE_SOURCE => Ok(DataSource::Supabase),
            other => Err(MotoSwapError::Config(format!(
                "Unknown data source '{}', expected one of: {}",
                other,
                get_supported_sources().join(", ")
            ))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Fixture => f.write_str(FIXTURE_SOURCE),
            DataSource::Supabase => f.write_str(SUPABASE_SOURCE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub source: DataSource,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_auto_reply_delay_ms")]
    pub auto_reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            auto_reply_delay_ms: DEFAULT_AUTO_REPLY_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    pub addr: Option<String>,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_auto_reply_delay_ms() -> u64 {
    DEFAULT_AUTO_REPLY_DELAY_MS
}

impl Config {
    /// Load `motoswap.toml` from the working directory, then apply env overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from `path` if it exists (defaults otherwise), then apply env overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                MotoSwapError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            debug!("Loaded config from {}", path.display());
            Self::from_toml_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(source) = non_empty(ENV_DATA_SOURCE) {
            self.data.source = source.parse()?;
        }
        if let Some(ttl) = non_empty(ENV_CACHE_TTL_SECS) {
            self.data.cache_ttl_secs = parse_number(ENV_CACHE_TTL_SECS, &ttl)?;
        }
        if let Some(url) = non_empty(ENV_SUPABASE_URL) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = non_empty(ENV_SUPABASE_ANON_KEY) {
            self.supabase.anon_key = Some(key);
        }
        if let Some(delay) = non_empty(ENV_AUTO_REPLY_DELAY_MS) {
            self.chat.auto_reply_delay_ms = parse_number(ENV_AUTO_REPLY_DELAY_MS, &delay)?;
        }
        if let Some(addr) = non_empty(ENV_METRICS_ADDR) {
            self.metrics.addr = Some(addr);
        }
        Ok(())
    }

    /// Both Supabase settings are required to talk to the backend.
    pub fn supabase_credentials(&self) -> Result<(String, String)> {
        match (&self.supabase.url, &self.supabase.anon_key) {
            (Some(url), Some(key)) => Ok((url.clone(), key.clone())),
            _ => Err(MotoSwapError::Config(format!(
                "{} and {} are required for the supabase data source",
                ENV_SUPABASE_URL, ENV_SUPABASE_ANON_KEY
            ))),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.data.cache_ttl_secs)
    }

    pub fn auto_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat.auto_reply_delay_ms)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| MotoSwapError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.source, DataSource::Fixture);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.chat.auto_reply_delay_ms, DEFAULT_AUTO_REPLY_DELAY_MS);
        assert!(config.supabase_credentials().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [data]
            source = "supabase"

            [supabase]
            url = "https://example.supabase.co"
            anon_key = "anon"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.source, DataSource::Supabase);
        assert_eq!(config.data.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.supabase.timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECS);
        let (url, key) = config.supabase_credentials().unwrap();
        assert_eq!(url, "https://example.supabase.co");
        assert_eq!(key, "anon");
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = Config::from_toml_str("[chat]\nauto_reply_delay_ms = 10\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DATA_SOURCE, "Supabase"),
            (ENV_AUTO_REPLY_DELAY_MS, "25"),
            (ENV_SUPABASE_URL, ""),
        ]);

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.data.source, DataSource::Supabase);
        assert_eq!(config.chat.auto_reply_delay_ms, 25);
        assert!(config.supabase.url.is_none());
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_CACHE_TTL_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(MotoSwapError::Config(_))));

        assert!("postgres".parse::<DataSource>().is_err());
    }
}
