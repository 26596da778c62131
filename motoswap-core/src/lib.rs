pub mod compatibility;
pub mod domain;
pub mod facilities;
pub mod filter;

pub use compatibility::{resolve_compatible, CompatibilityTable, CANONICAL_TABLE};
pub use domain::*;
pub use facilities::{
    facility_icon, facility_icons, FacilityKeywordGroups, CANONICAL_GROUPS, DEFAULT_FACILITY_ICON,
};
pub use filter::{filter_listing_refs, filter_listings, FilterCriteria, ListingFilter};
