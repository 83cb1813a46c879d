//! Nominatim (OpenStreetMap) geocoding provider.

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::{GeocodingProvider, PlaceAddress, ProviderPlace};
use crate::error::GeocodeError;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = "ROMAPI-Search-Service/1.0";

/// Nominatim settings.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub request_timeout: std::time::Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: std::time::Duration::from_secs(10),
        }
    }
}

/// HTTP client for the Nominatim search and reverse endpoints.
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

// Nominatim serializes coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(rename = "type")]
    place_type: Option<String>,
    class: Option<String>,
    address: Option<PlaceAddress>,
}

impl NominatimProvider {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GeocodeError::Unreachable {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, GeocodeError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(|e| GeocodeError::Unreachable {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(GeocodeError::Provider {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

fn into_place(place: NominatimPlace) -> Result<ProviderPlace, GeocodeError> {
    let parse = |value: &str| {
        value.parse::<f64>().map_err(|_| GeocodeError::InvalidResponse {
            message: format!("non-numeric coordinate: {value}"),
        })
    };
    Ok(ProviderPlace {
        latitude: parse(&place.lat)?,
        longitude: parse(&place.lon)?,
        // `type` is the precise feature kind, `class` the broad category
        place_type: place.place_type.or(place.class),
        address: place.address,
    })
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn forward(
        &self,
        query: &str,
        country_codes: &str,
        language: &str,
    ) -> Result<Option<ProviderPlace>, GeocodeError> {
        let response = self
            .fetch(
                "/search",
                &[
                    ("q", query),
                    ("format", "json"),
                    ("limit", "1"),
                    ("addressdetails", "1"),
                    ("countrycodes", country_codes),
                    ("accept-language", language),
                ],
            )
            .await?;

        let mut places: Vec<NominatimPlace> =
            response
                .json()
                .await
                .map_err(|e| GeocodeError::InvalidResponse {
                    message: e.to_string(),
                })?;

        if places.is_empty() {
            return Ok(None);
        }
        into_place(places.swap_remove(0)).map(Some)
    }

    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<Option<ProviderPlace>, GeocodeError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let response = self
            .fetch(
                "/reverse",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("format", "json"),
                    ("addressdetails", "1"),
                    ("accept-language", language),
                ],
            )
            .await?;

        let place: NominatimPlace =
            response
                .json()
                .await
                .map_err(|e| GeocodeError::InvalidResponse {
                    message: e.to_string(),
                })?;

        // A reverse hit without address components is useless to callers
        if place.address.is_none() {
            return Ok(None);
        }
        into_place(place).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_conversion_parses_string_coordinates() {
        let place = NominatimPlace {
            lat: "4.0511".to_string(),
            lon: "9.7679".to_string(),
            place_type: Some("city".to_string()),
            class: Some("place".to_string()),
            address: None,
        };
        let converted = into_place(place).unwrap();
        assert!((converted.latitude - 4.0511).abs() < 1e-9);
        assert_eq!(converted.place_type.as_deref(), Some("city"));
    }

    #[test]
    fn test_place_conversion_rejects_garbage() {
        let place = NominatimPlace {
            lat: "not-a-number".to_string(),
            lon: "9.7679".to_string(),
            place_type: None,
            class: None,
            address: None,
        };
        assert!(matches!(
            into_place(place),
            Err(GeocodeError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_response_shape_deserializes() {
        let json = r#"[{
            "lat": "4.0511",
            "lon": "9.7679",
            "type": "city",
            "class": "place",
            "address": {"city": "Douala", "state": "Littoral", "country": "Cameroun"}
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let address = places[0].address.as_ref().unwrap();
        assert_eq!(address.city.as_deref(), Some("Douala"));
        assert_eq!(address.state.as_deref(), Some("Littoral"));
    }
}
