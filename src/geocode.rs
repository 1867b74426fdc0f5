//! Reverse geocoding against the Nominatim API.
//!
//! Lookups are best-effort: any failure is logged and yields `None`, so
//! a saved place simply keeps an empty address. Nothing is retried.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::USER_AGENT;
use serde_json::Value;

use crate::Coordinate;

const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

// Nominatim policy requires an identifying user agent
const HTTP_USER_AGENT: &str = "pinit v0.1.0";

/// Country component stripped from resolved addresses.
const COUNTRY_NAME: &str = "대한민국";

/// The address details a lookup may resolve. Either field can be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub building_name: Option<String>,
    pub full_address: Option<String>,
}

/// Converts a coordinate to a human-readable address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Best-effort lookup; `None` means the address stays unknown.
    async fn reverse(&self, coord: Coordinate) -> Option<ResolvedAddress>;
}

/// Reverse geocoder backed by the public Nominatim endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coord: Coordinate) -> Option<ResolvedAddress> {
        debug!("Reverse geocoding {}", coord);

        let params = [
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
            ("format", "json".to_string()),
        ];

        let response = match self
            .client
            .get(NOMINATIM_REVERSE_URL)
            .query(&params)
            .header(USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Reverse geocoding request failed: {}", e);
                return None;
            }
        };

        let json = match response.json::<Value>().await {
            Ok(json) => json,
            Err(e) => {
                warn!("Reverse geocoding returned invalid JSON: {}", e);
                return None;
            }
        };

        json_to_address(&json)
    }
}

/// Geocoder that never resolves anything. Used when lookups are disabled.
pub struct NullGeocoder;

#[async_trait]
impl ReverseGeocoder for NullGeocoder {
    async fn reverse(&self, _coord: Coordinate) -> Option<ResolvedAddress> {
        None
    }
}

fn json_to_address(json: &Value) -> Option<ResolvedAddress> {
    if let Some(error) = json.get("error") {
        warn!("Reverse geocoding error: {}", error);
        return None;
    }

    let display_name = json["display_name"].as_str()?;
    let full_address = strip_country(display_name);

    // A name that is just the street again is not a building name
    let road = json["address"]["road"].as_str();
    let building_name = json["name"]
        .as_str()
        .filter(|name| !name.is_empty() && road != Some(*name))
        .map(|name| name.to_string());

    Some(ResolvedAddress {
        building_name,
        full_address: Some(full_address),
    })
}

/// Drops the country component from a comma-separated display address.
fn strip_country(display_name: &str) -> String {
    display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != COUNTRY_NAME)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_to_address_valid() {
        let json = serde_json::json!({
            "name": "서울시청",
            "display_name": "서울시청, 세종대로, 중구, 서울특별시, 04524, 대한민국",
            "address": {
                "road": "세종대로",
                "city": "서울특별시"
            }
        });

        let resolved = json_to_address(&json).unwrap();
        assert_eq!(resolved.building_name.as_deref(), Some("서울시청"));
        assert_eq!(
            resolved.full_address.as_deref(),
            Some("서울시청, 세종대로, 중구, 서울특별시, 04524")
        );
    }

    #[test]
    fn json_to_address_drops_road_as_building_name() {
        let json = serde_json::json!({
            "name": "세종대로",
            "display_name": "세종대로, 중구, 서울특별시, 대한민국",
            "address": { "road": "세종대로" }
        });

        let resolved = json_to_address(&json).unwrap();
        assert!(resolved.building_name.is_none());
        assert_eq!(
            resolved.full_address.as_deref(),
            Some("세종대로, 중구, 서울특별시")
        );
    }

    #[test]
    fn json_to_address_error_payload() {
        let json = serde_json::json!({ "error": "Unable to geocode" });
        assert!(json_to_address(&json).is_none());
    }

    #[test]
    fn json_to_address_missing_display_name() {
        let json = serde_json::json!({ "name": "somewhere" });
        assert!(json_to_address(&json).is_none());
    }

    #[test]
    fn strip_country_keeps_order() {
        assert_eq!(
            strip_country("대한민국, 서울특별시, 중구"),
            "서울특별시, 중구"
        );
        assert_eq!(strip_country("Paris, France"), "Paris, France");
    }
}
