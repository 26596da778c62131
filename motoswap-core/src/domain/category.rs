use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Motorcycle class used for host/rider matching.
///
/// The six named variants form the canonical taxonomy. Anything else a data
/// source hands us is kept in `Other` (trimmed) so that it still matches
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    AdventureTrail,
    Touring,
    Sport,
    Cruiser,
    Naked,
    Scooter,
    Other(String),
}

impl Category {
    /// Every named category, in the order the UI lists them.
    pub const ALL: [Category; 6] = [
        Category::AdventureTrail,
        Category::Touring,
        Category::Sport,
        Category::Cruiser,
        Category::Naked,
        Category::Scooter,
    ];

    /// Parse a label, accepting the spellings the legacy data used
    /// ("Adventure", "Adventure/Trail", "Deportiva", ...).
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        match key.as_str() {
            "adventure/trail" | "adventure trail" | "adventure-trail" | "adventuretrail"
            | "adventure" | "trail" => Category::AdventureTrail,
            "touring" => Category::Touring,
            "sport" | "deportiva" => Category::Sport,
            "cruiser" => Category::Cruiser,
            "naked" => Category::Naked,
            "scooter" => Category::Scooter,
            _ => Category::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::AdventureTrail => "Adventure/Trail",
            Category::Touring => "Touring",
            Category::Sport => "Sport",
            Category::Cruiser => "Cruiser",
            Category::Naked => "Naked",
            Category::Scooter => "Scooter",
            Category::Other(raw) => raw,
        }
    }

    /// True for a missing/blank category (e.g. an unset select box).
    pub fn is_empty(&self) -> bool {
        matches!(self, Category::Other(raw) if raw.trim().is_empty())
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::parse(s))
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::parse(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(raw) => raw,
            named => named.label().to_string(),
        }
    }
}
