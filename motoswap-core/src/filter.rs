//! Listing filter: category compatibility, location substring, facility
//! group, accommodation kind, a points ceiling and an excluded owner, all
//! combined with AND. Inactive clauses always pass.

use crate::compatibility::{CompatibilityTable, CANONICAL_TABLE};
use crate::domain::{Category, Listing};
use crate::facilities::{facilities_match, FacilityKeywordGroups, CANONICAL_GROUPS};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// User-supplied constraints. `None` and empty values are inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub facility_group: Option<String>,
    /// Case-insensitive substring of the accommodation kind ("casa", "apartamento")
    #[serde(default)]
    pub accommodation_kind: Option<String>,
    /// Highest points per night the rider will pay
    #[serde(default)]
    pub max_points: Option<i64>,
    /// Owner whose listings are left out, usually the logged-in user
    #[serde(default)]
    pub exclude_owner: Option<i64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria from raw form values; empty strings stay inactive.
    pub fn from_form(category: &str, location: &str, facility_group: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            category: non_empty(category).map(Category::from),
            location: non_empty(location),
            facility_group: non_empty(facility_group),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_facility_group(mut self, group: impl Into<String>) -> Self {
        self.facility_group = Some(group.into());
        self
    }

    pub fn with_accommodation_kind(mut self, kind: impl Into<String>) -> Self {
        self.accommodation_kind = Some(kind.into());
        self
    }

    pub fn with_max_points(mut self, points: i64) -> Self {
        self.max_points = Some(points);
        self
    }

    pub fn excluding_owner(mut self, owner_id: i64) -> Self {
        self.exclude_owner = Some(owner_id);
        self
    }

    pub fn active_category(&self) -> Option<&Category> {
        self.category.as_ref().filter(|c| !c.is_empty())
    }

    pub fn active_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }

    pub fn active_facility_group(&self) -> Option<&str> {
        self.facility_group.as_deref().filter(|g| !g.is_empty())
    }

    pub fn active_accommodation_kind(&self) -> Option<&str> {
        self.accommodation_kind.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// True when no clause is active.
    pub fn is_empty(&self) -> bool {
        self.active_category().is_none()
            && self.active_location().is_none()
            && self.active_facility_group().is_none()
            && self.active_accommodation_kind().is_none()
            && self.max_points.is_none()
            && self.exclude_owner.is_none()
    }
}

/// Filter bound to a compatibility table and a set of keyword groups.
#[derive(Debug, Clone, Copy)]
pub struct ListingFilter<'a> {
    table: &'a CompatibilityTable,
    groups: &'a FacilityKeywordGroups,
}

/// Criteria with lower-casing and keyword lookup done once per call.
struct PreparedCriteria<'c> {
    category: Option<&'c Category>,
    location: Option<String>,
    keywords: Option<Vec<String>>,
    kind: Option<String>,
    max_points: Option<i64>,
    exclude_owner: Option<i64>,
}

impl ListingFilter<'static> {
    pub fn canonical() -> Self {
        Self {
            table: &CANONICAL_TABLE,
            groups: &CANONICAL_GROUPS,
        }
    }
}

impl<'a> ListingFilter<'a> {
    pub fn new(table: &'a CompatibilityTable, groups: &'a FacilityKeywordGroups) -> Self {
        Self { table, groups }
    }

    pub fn matches(&self, listing: &Listing, criteria: &FilterCriteria) -> bool {
        self.passes(listing, &self.prepare(criteria))
    }

    /// Retained listings, cloned, in input order.
    pub fn apply(&self, listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
        self.apply_refs(listings, criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Retained listings by reference, in input order.
    pub fn apply_refs<'l>(
        &self,
        listings: &'l [Listing],
        criteria: &FilterCriteria,
    ) -> Vec<&'l Listing> {
        let prepared = self.prepare(criteria);
        let retained: Vec<&Listing> = listings
            .iter()
            .filter(|listing| self.passes(listing, &prepared))
            .collect();
        trace!(
            input = listings.len(),
            retained = retained.len(),
            "Filtered listings"
        );
        retained
    }

    fn prepare<'c>(&self, criteria: &'c FilterCriteria) -> PreparedCriteria<'c> {
        PreparedCriteria {
            category: criteria.active_category(),
            location: criteria.active_location().map(str::to_lowercase),
            keywords: criteria
                .active_facility_group()
                .map(|group| self.groups.keywords_for(group)),
            kind: criteria
                .active_accommodation_kind()
                .map(|k| k.trim().to_lowercase()),
            max_points: criteria.max_points,
            exclude_owner: criteria.exclude_owner,
        }
    }

    fn passes(&self, listing: &Listing, criteria: &PreparedCriteria<'_>) -> bool {
        if let Some(wanted) = criteria.category {
            if !self.table.accepts(&listing.category, wanted) {
                return false;
            }
        }

        if let Some(location) = &criteria.location {
            if !listing.location.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        if let Some(keywords) = &criteria.keywords {
            if !facilities_match(&listing.facilities, keywords) {
                return false;
            }
        }

        if let Some(kind) = &criteria.kind {
            if !listing.accommodation_kind.to_lowercase().contains(kind.as_str()) {
                return false;
            }
        }

        if let Some(max) = criteria.max_points {
            if listing.points > max {
                return false;
            }
        }

        if criteria.exclude_owner == Some(listing.owner_id) {
            return false;
        }

        true
    }
}

/// Filter against the canonical tables.
pub fn filter_listings(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    ListingFilter::canonical().apply(listings, criteria)
}

/// Like [`filter_listings`] but borrowing the retained listings.
pub fn filter_listing_refs<'l>(
    listings: &'l [Listing],
    criteria: &FilterCriteria,
) -> Vec<&'l Listing> {
    ListingFilter::canonical().apply_refs(listings, criteria)
}
