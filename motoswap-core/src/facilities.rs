//! Facility keyword groups and display icons.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const GARAGE_GROUP: &str = "garage";
pub const TOOLS_GROUP: &str = "tools";
pub const CAMERA_GROUP: &str = "camera";
pub const WASH_GROUP: &str = "wash";

/// Icon shown for facilities missing from the table.
pub const DEFAULT_FACILITY_ICON: &str = "✓";

pub static CANONICAL_GROUPS: Lazy<FacilityKeywordGroups> =
    Lazy::new(FacilityKeywordGroups::canonical);

/// Group key -> substrings that identify the group in free-text facility tags.
///
/// Keys and keywords are stored lower-cased; lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct FacilityKeywordGroups {
    groups: HashMap<String, Vec<String>>,
    aliases: HashMap<String, String>,
}

impl FacilityKeywordGroups {
    pub fn from_groups<I, K, W>(groups: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<W>)>,
        K: AsRef<str>,
        W: AsRef<str>,
    {
        let groups = groups
            .into_iter()
            .map(|(key, keywords)| {
                (
                    key.as_ref().to_lowercase(),
                    keywords.into_iter().map(|k| k.as_ref().to_lowercase()).collect(),
                )
            })
            .collect();
        Self {
            groups,
            aliases: HashMap::new(),
        }
    }

    /// Make `alias` resolve to the same keywords as `key`.
    pub fn with_alias(mut self, alias: &str, key: &str) -> Self {
        self.aliases.insert(alias.to_lowercase(), key.to_lowercase());
        self
    }

    /// Groups offered by the dashboard filter. The Spanish keys of the old
    /// select box still resolve.
    pub fn canonical() -> Self {
        Self::from_groups([
            (GARAGE_GROUP, vec!["garaje", "cubierto", "parking", "garage"]),
            (TOOLS_GROUP, vec!["herramientas", "mantenimiento", "taller", "tools"]),
            (CAMERA_GROUP, vec!["cámaras", "seguridad", "vigilancia", "camera"]),
            (WASH_GROUP, vec!["lavado", "limpieza", "zona", "wash"]),
        ])
        .with_alias("garaje", GARAGE_GROUP)
        .with_alias("herramientas", TOOLS_GROUP)
        .with_alias("camara", CAMERA_GROUP)
        .with_alias("lavado", WASH_GROUP)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(&key.to_lowercase()).is_some()
    }

    /// Lower-cased keywords for `key`; an unknown key is its own keyword.
    pub fn keywords_for(&self, key: &str) -> Vec<String> {
        let key = key.to_lowercase();
        match self.lookup(&key) {
            Some(keywords) => keywords.to_vec(),
            None => vec![key],
        }
    }

    /// Whether any facility tag contains any keyword of `key`.
    pub fn matches(&self, facilities: &[String], key: &str) -> bool {
        facilities_match(facilities, &self.keywords_for(key))
    }

    /// Group keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn lookup(&self, key: &str) -> Option<&[String]> {
        let key = self.aliases.get(key).map(String::as_str).unwrap_or(key);
        self.groups.get(key).map(Vec::as_slice)
    }
}

/// `keywords` must already be lower-cased.
pub(crate) fn facilities_match(facilities: &[String], keywords: &[String]) -> bool {
    facilities.iter().any(|facility| {
        let facility = facility.to_lowercase();
        keywords.iter().any(|keyword| facility.contains(keyword.as_str()))
    })
}

static FACILITY_ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Anclajes suelo", "⚓"),
        ("Herramientas básicas", "🔧"),
        ("Cámaras seguridad", "📹"),
        ("Zona lavado motos", "🚿"),
        ("Acceso fácil", "🚪"),
        ("Herramientas mantenimiento", "🔧"),
        ("Conexión eléctrica", "⚡"),
        ("Elevador moto", "⬆️"),
        ("Kit limpieza", "🧹"),
        ("Zona BBQ", "🍖"),
        ("Parking múltiple", "🏍️"),
        ("Taller equipado", "🛠️"),
        ("Zona lavado presión", "💦"),
        ("Aceites disponibles", "🛢️"),
        ("Vigilancia 24h", "👁️"),
        ("Ascensor directo", "🛗"),
        ("Cerca de tiendas moto", "🏪"),
        ("Cadenas seguridad", "🔗"),
        ("WiFi fibra", "📶"),
        ("Terraza", "🏞️"),
        ("Taller completo", "🛠️"),
        ("Elevador hidráulico", "⬆️"),
        ("Repuestos básicos", "🔩"),
        ("Ducha exterior", "🚿"),
        ("Patio interior cubierto", "🏠"),
        ("Cargador eléctrico", "🔌"),
        ("Kit herramientas", "🔧"),
        ("Guías rutas locales", "🗺️"),
        ("Anclajes pared", "⚓"),
        ("Compresor aire", "💨"),
        ("Zona almacenamiento equipación", "📦"),
        ("Trastero para equipación", "📦"),
        ("Cerca metro", "🚇"),
        ("Supermercado 24h", "🏪"),
        ("Cobertizo grande", "🏚️"),
        ("Plaza de garaje privada", "🅿️"),
        ("Parking comunitario seguro", "🅿️"),
        ("Doble garaje cerrado", "🏠"),
        ("Garaje individual cerrado", "🏠"),
        ("Parking subterráneo", "🅿️"),
        ("Parking seguro", "🅿️"),
        ("WiFi gratuito", "📶"),
    ])
});

/// Icon for a facility tag (exact match), falling back to a check mark.
pub fn facility_icon(facility: &str) -> &'static str {
    FACILITY_ICONS
        .get(facility)
        .copied()
        .unwrap_or(DEFAULT_FACILITY_ICON)
}

/// All known `(facility, icon)` pairs, sorted by facility.
pub fn facility_icons() -> Vec<(&'static str, &'static str)> {
    let mut icons: Vec<(&'static str, &'static str)> =
        FACILITY_ICONS.iter().map(|(name, icon)| (*name, *icon)).collect();
    icons.sort_unstable_by(|a, b| a.0.cmp(b.0));
    icons
}
