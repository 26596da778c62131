//! Rider/host motorcycle compatibility.
//!
//! The table is directional: an entry `host -> [a, b, ...]` lists the rider
//! categories a host of `host` accepts. Touring accepts Cruiser riders but
//! Cruiser does not list Adventure/Trail, and that asymmetry is kept as is.

use crate::domain::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical table, built on first use.
pub static CANONICAL_TABLE: Lazy<CompatibilityTable> = Lazy::new(CompatibilityTable::canonical);

/// Immutable mapping from a category to its ordered compatible categories.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityTable {
    entries: HashMap<Category, Vec<Category>>,
}

impl CompatibilityTable {
    /// Build a table from `(category, compatible)` entries.
    ///
    /// Each list is deduplicated keeping the first occurrence. A repeated
    /// key replaces the earlier entry.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<Category>)>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, compatible)| (category, dedup_ordered(compatible)))
            .collect();
        Self { entries }
    }

    pub fn canonical() -> Self {
        use Category::*;
        Self::from_entries([
            (AdventureTrail, vec![AdventureTrail, Touring, Naked]),
            (Touring, vec![Touring, AdventureTrail, Cruiser]),
            (Sport, vec![Sport, Naked]),
            (Cruiser, vec![Cruiser, Touring]),
            (Naked, vec![Naked, Sport, AdventureTrail]),
            (Scooter, vec![Scooter, Naked]),
        ])
    }

    /// Compatible categories for `category`; `[category]` when unmapped.
    pub fn resolve(&self, category: &Category) -> Vec<Category> {
        match self.entries.get(category) {
            Some(compatible) if !compatible.is_empty() => compatible.clone(),
            _ => vec![category.clone()],
        }
    }

    /// Same answer as `resolve(host).contains(wanted)` without allocating.
    pub fn accepts(&self, host: &Category, wanted: &Category) -> bool {
        match self.entries.get(host) {
            Some(compatible) if !compatible.is_empty() => compatible.contains(wanted),
            _ => host == wanted,
        }
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.entries.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve against the canonical table.
pub fn resolve_compatible(category: &Category) -> Vec<Category> {
    CANONICAL_TABLE.resolve(category)
}

fn dedup_ordered(categories: Vec<Category>) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::with_capacity(categories.len());
    for category in categories {
        if !out.contains(&category) {
            out.push(category);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_named_category_is_self_compatible() {
        for category in Category::ALL {
            let compatible = resolve_compatible(&category);
            assert!(
                compatible.contains(&category),
                "{} missing from its own list {:?}",
                category,
                compatible
            );
        }
    }

    #[test]
    fn test_unmapped_category_resolves_to_itself() {
        let enduro = Category::Other("Enduro".to_string());
        assert_eq!(resolve_compatible(&enduro), vec![enduro.clone()]);

        let blank = Category::default();
        assert_eq!(resolve_compatible(&blank), vec![blank.clone()]);
    }

    #[test]
    fn test_table_is_asymmetric() {
        assert!(CANONICAL_TABLE.accepts(&Category::Touring, &Category::AdventureTrail));
        assert!(!CANONICAL_TABLE.accepts(&Category::Cruiser, &Category::AdventureTrail));
    }

    #[test]
    fn test_resolve_preserves_order() {
        assert_eq!(
            resolve_compatible(&Category::Naked),
            vec![Category::Naked, Category::Sport, Category::AdventureTrail]
        );
    }

    #[test]
    fn test_from_entries_deduplicates_in_order() {
        let table = CompatibilityTable::from_entries([(
            Category::Touring,
            vec![
                Category::Touring,
                Category::Cruiser,
                Category::Touring,
                Category::AdventureTrail,
                Category::Cruiser,
            ],
        )]);

        assert_eq!(
            table.resolve(&Category::Touring),
            vec![Category::Touring, Category::Cruiser, Category::AdventureTrail]
        );
    }

    #[test]
    fn test_empty_entry_never_resolves_empty() {
        let table = CompatibilityTable::from_entries([(Category::Scooter, vec![])]);
        assert_eq!(table.resolve(&Category::Scooter), vec![Category::Scooter]);
        assert!(table.accepts(&Category::Scooter, &Category::Scooter));
    }

    #[test]
    fn test_accepts_matches_resolve() {
        let table = CompatibilityTable::canonical();
        let mut categories: Vec<Category> = Category::ALL.to_vec();
        categories.push(Category::Other("Enduro".to_string()));

        for host in &categories {
            for wanted in &categories {
                assert_eq!(
                    table.accepts(host, wanted),
                    table.resolve(host).contains(wanted),
                    "host={} wanted={}",
                    host,
                    wanted
                );
            }
        }
    }
}
