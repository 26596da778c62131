use motoswap::constants::DEFAULT_CACHE_TTL_SECS;
use motoswap::{Config, DataSource, MotoSwapError};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.data.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    assert_eq!(config.supabase.timeout_seconds, 15);
}

#[test]
fn test_file_values_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motoswap.toml");
    fs::write(
        &path,
        r#"
[data]
source = "fixture"
cache_ttl_secs = 42

[chat]
auto_reply_delay_ms = 250

[metrics]
addr = "127.0.0.1:9464"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.data.source, DataSource::Fixture);
    assert_eq!(config.cache_ttl(), Duration::from_secs(42));
    assert_eq!(config.auto_reply_delay(), Duration::from_millis(250));
    assert_eq!(config.metrics.addr.as_deref(), Some("127.0.0.1:9464"));
}

#[test]
fn test_env_overrides_file() {
    let mut config = Config::from_toml_str("[data]\ncache_ttl_secs = 42\n").unwrap();
    config
        .apply_overrides(|key| match key {
            "MOTOSWAP_CACHE_TTL_SECS" => Some("7".to_string()),
            "SUPABASE_URL" => Some("https://demo.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon-key".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.data.cache_ttl_secs, 7);
    let (url, key) = config.supabase_credentials().unwrap();
    assert_eq!(url, "https://demo.supabase.co");
    assert_eq!(key, "anon-key");
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("motoswap.toml");
    fs::write(&path, "[data\nsource = ").unwrap();

    assert!(matches!(Config::load_from(&path), Err(MotoSwapError::Toml(_))));
}

#[test]
fn test_unknown_source_in_file_is_rejected() {
    let result = Config::from_toml_str("[data]\nsource = \"mysql\"\n");
    assert!(matches!(result, Err(MotoSwapError::Toml(_))));
}
