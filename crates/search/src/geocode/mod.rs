//! Forward and reverse geocoding with caching and offline fallbacks.
//!
//! [`GeoResolver`] wraps a [`GeocodingProvider`] with a normalized-query
//! LRU cache, a confidence score derived from result detail, and two
//! fallbacks when the provider yields nothing: re-querying with just the
//! leading city token, then a built-in gazetteer of major cities.
//! Provider failures are logged and resolve to `None`; geocoding never
//! takes a search request down.

mod cache;
mod gazetteer;
mod nominatim;

pub use cache::ResolutionCache;
pub use gazetteer::{CITIES, GazetteerCity};
pub use nominatim::{NominatimConfig, NominatimProvider};

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{GeocodingProvider, ProviderPlace};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Address components of a resolved place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoSource {
    /// The upstream provider answered directly.
    Primary,
    /// A fallback strategy (city token or gazetteer) answered.
    Fallback,
    /// Served from the resolution cache.
    Cache,
}

/// A forward geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResolution {
    pub point: GeoPoint,
    pub address: ResolvedAddress,
    /// In `[0.1, 1.0]`; higher means more trustworthy coordinates.
    pub confidence: f64,
    pub source: GeoSource,
}

/// A reverse geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseResolution {
    pub address: ResolvedAddress,
    pub confidence: f64,
}

/// Resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoResolverConfig {
    /// ISO country codes the provider restricts results to.
    pub country_codes: String,
    /// Accept-language preference sent to the provider.
    pub language: String,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl Default for GeoResolverConfig {
    fn default() -> Self {
        Self {
            country_codes: "cm,fr".to_string(),
            language: "fr,en".to_string(),
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Geocoding front-end used by the search pipeline.
pub struct GeoResolver {
    provider: Arc<dyn GeocodingProvider>,
    cache: ResolutionCache,
    config: GeoResolverConfig,
}

// Leading run of letters/spaces/hyphens up to a comma, treated as the city
static CITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-ZÀ-ÿ\s-]+)(?:,|$)").expect("city pattern must compile"));

impl GeoResolver {
    pub fn new(provider: Arc<dyn GeocodingProvider>, config: GeoResolverConfig) -> Self {
        let cache = ResolutionCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Resolve a free-text address to coordinates. Returns `None` for blank
    /// input, when every strategy comes up empty, or when the provider
    /// fails (logged).
    pub async fn geocode(&self, address: &str) -> Option<GeoResolution> {
        let normalized = normalize_address(address);
        if normalized.is_empty() {
            return None;
        }

        if let Some(mut cached) = self.cache.get(&normalized) {
            tracing::debug!(address = %normalized, "geocode cache hit");
            cached.source = GeoSource::Cache;
            return Some(cached);
        }

        let resolution = match self.forward(&normalized).await {
            Some(resolution) => Some(resolution),
            None => self.fallback(&normalized).await,
        };

        if let Some(resolution) = &resolution {
            self.cache.put(normalized, resolution.clone());
        }
        resolution
    }

    /// Resolve coordinates to an address. Returns `None` for out-of-range
    /// coordinates or provider failure (logged).
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<ReverseResolution> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            tracing::warn!(latitude, longitude, "reverse geocode rejected out-of-range coordinates");
            return None;
        }

        match self
            .provider
            .reverse(latitude, longitude, &self.config.language)
            .await
        {
            Ok(Some(place)) => {
                let confidence = confidence_for(&place);
                Some(ReverseResolution {
                    address: resolved_address(&place),
                    confidence,
                })
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(latitude, longitude, %error, "reverse geocoding failed");
                None
            }
        }
    }

    async fn forward(&self, normalized: &str) -> Option<GeoResolution> {
        match self
            .provider
            .forward(normalized, &self.config.country_codes, &self.config.language)
            .await
        {
            Ok(Some(place)) => Some(resolution_from(&place, GeoSource::Primary)),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(address = %normalized, %error, "geocoding provider failed");
                None
            }
        }
    }

    async fn fallback(&self, normalized: &str) -> Option<GeoResolution> {
        // Retry with just the city token, at a confidence penalty
        if let Some(city) = CITY_TOKEN
            .captures(normalized)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|city| !city.is_empty() && *city != normalized)
        {
            if let Some(mut resolution) = self.forward(city).await {
                resolution.source = GeoSource::Fallback;
                resolution.confidence = (resolution.confidence - 0.2).max(0.3);
                return Some(resolution);
            }
        }

        // Last resort: the built-in gazetteer
        let city = gazetteer::lookup(normalized)?;
        tracing::debug!(city = city.name, "resolved from gazetteer");
        Some(GeoResolution {
            point: GeoPoint {
                latitude: city.latitude,
                longitude: city.longitude,
            },
            address: ResolvedAddress {
                city: Some(city.name.to_string()),
                region: Some(city.region.to_string()),
                country: Some(city.country.to_string()),
                ..Default::default()
            },
            confidence: 0.5,
            source: GeoSource::Fallback,
        })
    }
}

/// Lowercases and accent-folds an address, collapsing whitespace. The
/// result is both the provider query and the cache key.
pub fn normalize_address(address: &str) -> String {
    let folded: String = address
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            c => c,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolution_from(place: &ProviderPlace, source: GeoSource) -> GeoResolution {
    GeoResolution {
        point: GeoPoint {
            latitude: place.latitude,
            longitude: place.longitude,
        },
        address: resolved_address(place),
        confidence: confidence_for(place),
        source,
    }
}

fn resolved_address(place: &ProviderPlace) -> ResolvedAddress {
    let address = place.address.clone().unwrap_or_default();
    ResolvedAddress {
        street: address.road,
        // Providers distinguish settlement sizes; collapse to one field
        city: address.city.or(address.town).or(address.village),
        region: address.state.or(address.region),
        country: address.country,
        postal_code: address.postcode,
    }
}

/// Detail-driven confidence: starts at 0.8, drops without address
/// components, rises with street and postcode, and is floored for
/// well-known settlement types. Clamped to `[0.1, 1.0]`.
fn confidence_for(place: &ProviderPlace) -> f64 {
    let mut confidence: f64 = 0.8;

    match &place.address {
        None => confidence -= 0.2,
        Some(address) => {
            if address.road.is_some() {
                confidence += 0.1;
            }
            if address.postcode.is_some() {
                confidence += 0.1;
            }
        }
    }

    match place.place_type.as_deref() {
        Some("city") | Some("town") => confidence = confidence.max(0.7),
        Some("village") => confidence = confidence.max(0.6),
        _ => {}
    }

    confidence.clamp(0.1, 1.0)
}
