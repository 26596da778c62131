use motoswap_core::{
    filter_listings, resolve_compatible, Category, CompatibilityTable, FacilityKeywordGroups,
    FilterCriteria, Listing, ListingFilter, CANONICAL_TABLE,
};

fn listing(id: i64, location: &str, category: Category, facilities: &[&str]) -> Listing {
    Listing::new(
        id,
        format!("Host {}", id),
        location,
        category,
        facilities.iter().map(|f| f.to_string()).collect(),
    )
}

fn mixed_listings() -> Vec<Listing> {
    vec![
        listing(1, "Madrid, España", Category::AdventureTrail, &["Anclajes suelo", "Zona lavado motos"]),
        listing(2, "Barcelona, España", Category::Sport, &["Conexión eléctrica"]),
        listing(3, "Valencia, España", Category::Cruiser, &["Kit limpieza"]),
        listing(4, "Bilbao, España", Category::Naked, &["Vigilancia 24h"]),
        listing(5, "Murcia, España", Category::Scooter, &["Cerca metro"]),
        listing(6, "Lisboa, Portugal", Category::Other("Enduro".to_string()), &["xyz storage"]),
        listing(7, "", Category::default(), &[]),
    ]
}

#[test]
fn test_touring_cruiser_scenario() {
    let table = CompatibilityTable::from_entries([
        (
            Category::Touring,
            vec![Category::Touring, Category::AdventureTrail, Category::Cruiser],
        ),
        (Category::Cruiser, vec![Category::Cruiser, Category::Touring]),
    ]);
    let groups = FacilityKeywordGroups::canonical();
    let filter = ListingFilter::new(&table, &groups);

    let listings = vec![
        listing(1, "", Category::Touring, &[]),
        listing(2, "", Category::Cruiser, &[]),
        listing(3, "", Category::Naked, &[]),
    ];

    let retained = filter.apply(&listings, &FilterCriteria::new().with_category("Cruiser"));
    let categories: Vec<Category> = retained.into_iter().map(|l| l.category).collect();
    assert_eq!(categories, vec![Category::Touring, Category::Cruiser]);

    // Naked is not in this table, so it only matches itself.
    assert_eq!(table.resolve(&Category::Naked), vec![Category::Naked]);
}

#[test]
fn test_category_filter_equals_resolver_subset() {
    let listings = mixed_listings();
    let mut wanted: Vec<Category> = Category::ALL.to_vec();
    wanted.push(Category::Other("Enduro".to_string()));

    for category in wanted {
        let expected: Vec<Listing> = listings
            .iter()
            .filter(|l| resolve_compatible(&l.category).contains(&category))
            .cloned()
            .collect();
        let actual = filter_listings(&listings, &FilterCriteria::new().with_category(category.clone()));
        assert_eq!(actual, expected, "category {}", category);
    }
}

#[test]
fn test_named_categories_resolve_to_include_themselves() {
    for category in Category::ALL {
        assert!(CANONICAL_TABLE.contains(&category));
        assert!(resolve_compatible(&category).contains(&category));
    }
}

#[test]
fn test_unknown_facility_group_is_literal_match() {
    let retained = filter_listings(
        &mixed_listings(),
        &FilterCriteria::new().with_facility_group("XYZ"),
    );
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0].id, 6);
}

#[test]
fn test_missing_fields_only_fail_active_clauses() {
    let listings = mixed_listings();

    let everything = filter_listings(&listings, &FilterCriteria::new());
    assert!(everything.iter().any(|l| l.id == 7));

    let by_location = filter_listings(&listings, &FilterCriteria::new().with_location("españa"));
    assert!(by_location.iter().all(|l| l.id != 7));
}

#[test]
fn test_filtering_is_idempotent_and_order_preserving() {
    let listings = mixed_listings();
    let criteria_sets = vec![
        FilterCriteria::new().with_category(Category::Naked),
        FilterCriteria::new().with_location("ES"),
        FilterCriteria::new().with_facility_group("wash"),
        FilterCriteria::from_form("Touring", "a", "garage"),
    ];

    for criteria in criteria_sets {
        let once = filter_listings(&listings, &criteria);
        let twice = filter_listings(&once, &criteria);
        assert_eq!(once, twice);

        let positions: Vec<usize> = once
            .iter()
            .map(|l| listings.iter().position(|x| x.id == l.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }
}

#[test]
fn test_inputs_are_not_mutated() {
    let listings = mixed_listings();
    let before = listings.clone();
    let _ = filter_listings(&listings, &FilterCriteria::from_form("Sport", "bar", "tools"));
    assert_eq!(listings, before);
}

#[test]
fn test_filter_is_usable_across_threads() {
    let listings = std::sync::Arc::new(mixed_listings());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let listings = listings.clone();
            std::thread::spawn(move || {
                filter_listings(&listings, &FilterCriteria::new().with_category("Naked")).len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}
