//! Geocoding provider port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

/// Address components as returned by the upstream provider.
///
/// Providers use distinct fields for settlement sizes (city vs town vs
/// village); the resolver collapses them and uses the distinction for
/// confidence floors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceAddress {
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
}

/// A single place returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<PlaceAddress>,
    /// Provider place type ("city", "town", "village", ...).
    pub place_type: Option<String>,
}

/// Forward and reverse geocoding against an external HTTP provider.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Resolve a free-text query to the best-matching place, restricted to
    /// the given ISO country codes and response language.
    async fn forward(
        &self,
        query: &str,
        country_codes: &str,
        language: &str,
    ) -> Result<Option<ProviderPlace>, GeocodeError>;

    /// Resolve coordinates to the enclosing place.
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<Option<ProviderPlace>, GeocodeError>;
}
