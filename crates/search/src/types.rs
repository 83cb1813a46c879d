//! Core request types for the search pipeline.
//!
//! A [`SearchRequest`] is built by the HTTP layer from untrusted query
//! input, passed through the validator, and then carried unchanged through
//! the rest of the pipeline. All enums are closed so downstream matching is
//! exhaustive at compile time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type of a listed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Business,
    Service,
    Data,
    Api,
}

impl ResourceType {
    /// All known resource types, in declaration order.
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Business,
        ResourceType::Service,
        ResourceType::Data,
        ResourceType::Api,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Business => "BUSINESS",
            ResourceType::Service => "SERVICE",
            ResourceType::Data => "DATA",
            ResourceType::Api => "API",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subscription plan of a listed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourcePlan {
    Free,
    Premium,
    Featured,
}

impl ResourcePlan {
    /// All known plans, in declaration order.
    pub const ALL: [ResourcePlan; 3] = [
        ResourcePlan::Free,
        ResourcePlan::Premium,
        ResourcePlan::Featured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourcePlan::Free => "FREE",
            ResourcePlan::Premium => "PREMIUM",
            ResourcePlan::Featured => "FEATURED",
        }
    }
}

impl std::fmt::Display for ResourcePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance unit for geo filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Mi,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Mi => "mi",
        }
    }
}

/// A radius filter around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in the configured unit.
    pub radius: f64,
    #[serde(default)]
    pub unit: DistanceUnit,
}

/// Inclusive price bounds, in the platform currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Inclusive creation/update date bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Structured filters attached to a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Category IDs (UUID strings).
    pub categories: Vec<String>,
    pub resource_types: Vec<ResourceType>,
    pub plans: Vec<ResourcePlan>,
    pub location: Option<GeoFilter>,
    pub price_range: Option<PriceRange>,
    pub verified: Option<bool>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub date_range: Option<DateRange>,
}

impl SearchFilters {
    /// Total number of individual filter values, used for the
    /// max-filter-count check.
    pub fn count(&self) -> usize {
        let mut count = self.categories.len()
            + self.resource_types.len()
            + self.plans.len()
            + self.tags.len();
        count += self.location.is_some() as usize;
        count += self.price_range.is_some() as usize;
        count += self.verified.is_some() as usize;
        count += self.city.is_some() as usize;
        count += self.region.is_some() as usize;
        count += self.country.is_some() as usize;
        count += self.date_range.is_some() as usize;
        count
    }
}

/// Sortable fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Relevance,
    Name,
    CreatedAt,
    UpdatedAt,
    Popularity,
    Rating,
    Distance,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SortOptions {
    pub field: SortField,
    pub order: SortOrder,
}

/// Pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// A search request as received from the (out-of-scope) HTTP layer.
///
/// Owned per request and treated as immutable once validated; the
/// validator returns a sanitized copy rather than mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub filters: SearchFilters,
    pub sort: Option<SortOptions>,
    pub pagination: Pagination,
    /// Requested facet names, checked against a fixed allow-list.
    pub facets: Vec<String>,
    /// Preferred language hint ("fr", "en" or "auto").
    pub language: Option<String>,
}
