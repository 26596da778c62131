/// Data source names accepted on the CLI and in configuration
pub const FIXTURE_SOURCE: &str = "fixture";
pub const SUPABASE_SOURCE: &str = "supabase";

// Environment variables
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_DATA_SOURCE: &str = "MOTOSWAP_DATA_SOURCE";
pub const ENV_CACHE_TTL_SECS: &str = "MOTOSWAP_CACHE_TTL_SECS";
pub const ENV_AUTO_REPLY_DELAY_MS: &str = "MOTOSWAP_AUTO_REPLY_DELAY_MS";
pub const ENV_METRICS_ADDR: &str = "MOTOSWAP_METRICS_ADDR";

pub const DEFAULT_CONFIG_PATH: &str = "motoswap.toml";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_AUTO_REPLY_DELAY_MS: u64 = 1500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_MESSAGE_LIMIT: usize = 50;
pub const MAX_CHAT_PARTNERS: usize = 8;

// New accounts
pub const STARTING_POINTS: i64 = 100;
pub const STARTING_RATING: f64 = 4.5;

/// Canned answers used by the simulated chat partner
pub const AUTO_REPLIES: [&str; 5] = [
    "¡Hola! Sí, mi garaje tiene espacio de sobra para tu moto.",
    "Perfecto, ¿cuándo planeas venir?",
    "Claro, te puedo mostrar las rutas locales.",
    "Mi garaje tiene todas las herramientas que necesitas.",
    "¡Genial! Podemos coordinar el intercambio.",
];

/// Get all supported data source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![FIXTURE_SOURCE, SUPABASE_SOURCE]
}
