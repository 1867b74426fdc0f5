//! Core data structures for the pinit application.
//!
//! This module contains the canonical `Place` record, its persisted
//! representation, and the region lookup derived from saved addresses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel color used whenever a place or category has no explicit color.
pub const DEFAULT_CATEGORY_COLOR: &str = "#FFFFFF";

/// Region code reported for places whose address matches no known region.
pub const UNKNOWN_REGION: &str = "알 수 없음";

/// Short region codes accepted by the region filter.
pub const REGION_CODES: [&str; 15] = [
    "서울", "인천", "강원", "충남", "충북", "경북", "경남", "전북", "전남", "세종", "대전", "대구",
    "울산", "부산", "제주",
];

/// Built-in categories offered before the user defines any of their own.
pub const BUILTIN_CATEGORIES: [&str; 5] = ["음식점", "카페", "관광지", "숙소", "핫플"];

/// Full province/city names as they appear in addresses, mapped to the
/// short code used for filtering. First substring match wins.
const REGION_TABLE: [(&str, &str); 15] = [
    ("서울특별시", "서울"),
    ("인천광역시", "인천"),
    ("강원도", "강원"),
    ("충청남도", "충남"),
    ("충청북도", "충북"),
    ("경상북도", "경북"),
    ("경상남도", "경남"),
    ("전라북도", "전북"),
    ("전라남도", "전남"),
    ("세종특별자치시", "세종"),
    ("대전광역시", "대전"),
    ("대구광역시", "대구"),
    ("울산광역시", "울산"),
    ("부산광역시", "부산"),
    ("제주특별자치도", "제주"),
];

/// The identity key for saved places. Matching is exact float equality,
/// with no tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if the place sits exactly at this coordinate.
    pub fn matches(&self, place: &Place) -> bool {
        place.latitude == self.latitude && place.longitude == self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Represents a single saved place in our system.
///
/// Persisted field names follow the historical document layout
/// (camelCase keys, `createdAt` as Unix seconds). Missing fields decode
/// to documented defaults so old or partial records always load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    /// Building name from reverse geocoding or user edit
    #[serde(default)]
    pub building_name: String,
    /// Human-readable address from reverse geocoding or user edit
    #[serde(default)]
    pub full_address: String,
    /// When the place was saved; not updated on edit
    #[serde(default = "epoch", with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
    /// User-chosen display name
    #[serde(default)]
    pub nickname: String,
    /// Free-form note
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub category: String,
    /// Hex color associated with the category
    #[serde(default = "default_category_color")]
    pub category_color: String,
    /// Attached photos as raw bytes; the first one is the representative
    #[serde(default)]
    pub images: Vec<Vec<u8>>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

pub(crate) fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl Place {
    /// Creates a new place at the given coordinate with all other fields
    /// at their defaults.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Place {
            latitude,
            longitude,
            building_name: String::new(),
            full_address: String::new(),
            created_at: Utc::now(),
            is_favorite: false,
            nickname: String::new(),
            memo: String::new(),
            category: String::new(),
            category_color: default_category_color(),
            images: Vec::new(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Derives the short region code from the saved address.
    ///
    /// Places without an address, or with an address outside the known
    /// region table, report [`UNKNOWN_REGION`] and match no region filter.
    pub fn region(&self) -> &'static str {
        if self.full_address.is_empty() {
            return UNKNOWN_REGION;
        }
        for (full_name, short_name) in REGION_TABLE {
            if self.full_address.contains(full_name) {
                return short_name;
            }
        }
        UNKNOWN_REGION
    }

    /// The name shown in listings: nickname first, then building name,
    /// then the bare address.
    pub fn display_name(&self) -> &str {
        if !self.nickname.is_empty() {
            &self.nickname
        } else if !self.building_name.is_empty() {
            &self.building_name
        } else {
            &self.full_address
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul_place() -> Place {
        let mut place = Place::new(37.5665, 126.978);
        place.full_address = "서울특별시 중구 세종대로 110".to_string();
        place
    }

    #[test]
    fn region_maps_full_name_to_short_code() {
        assert_eq!(seoul_place().region(), "서울");

        let mut busan = Place::new(35.1796, 129.0756);
        busan.full_address = "부산광역시 해운대구 우동".to_string();
        assert_eq!(busan.region(), "부산");
    }

    #[test]
    fn region_without_address_is_unknown() {
        let place = Place::new(37.5, 127.0);
        assert_eq!(place.region(), UNKNOWN_REGION);

        let mut abroad = Place::new(48.8584, 2.2945);
        abroad.full_address = "Champ de Mars, Paris".to_string();
        assert_eq!(abroad.region(), UNKNOWN_REGION);
    }

    #[test]
    fn decode_fills_documented_defaults() {
        let json = r#"{"latitude": 37.5, "longitude": 127.0}"#;
        let place: Place = serde_json::from_str(json).unwrap();

        assert_eq!(place.latitude, 37.5);
        assert_eq!(place.longitude, 127.0);
        assert_eq!(place.building_name, "");
        assert_eq!(place.full_address, "");
        assert_eq!(place.nickname, "");
        assert_eq!(place.memo, "");
        assert_eq!(place.category, "");
        assert_eq!(place.category_color, DEFAULT_CATEGORY_COLOR);
        assert!(!place.is_favorite);
        assert_eq!(place.created_at, DateTime::UNIX_EPOCH);
        assert!(place.images.is_empty());
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let mut place = seoul_place();
        place.building_name = "서울시청".to_string();
        place.created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        place.is_favorite = true;
        place.nickname = "회사 근처".to_string();
        place.memo = "점심 맛집 많음".to_string();
        place.category = "음식점".to_string();
        place.category_color = "#FF0000".to_string();
        place.images = vec![vec![1, 2, 3], vec![4, 5]];

        let json = serde_json::to_string(&place).unwrap();
        let decoded: Place = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, place);
    }

    #[test]
    fn persisted_keys_use_historical_layout() {
        let mut place = seoul_place();
        place.created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let value = serde_json::to_value(&place).unwrap();

        assert!(value.get("buildingName").is_some());
        assert!(value.get("fullAddress").is_some());
        assert!(value.get("isFavorite").is_some());
        assert!(value.get("categoryColor").is_some());
        assert_eq!(value["createdAt"], serde_json::json!(1_700_000_000));
    }

    #[test]
    fn coordinate_matching_is_exact() {
        let place = Place::new(37.5, 127.0);
        assert!(Coordinate::new(37.5, 127.0).matches(&place));
        assert!(!Coordinate::new(37.5000001, 127.0).matches(&place));
    }

    #[test]
    fn display_name_prefers_nickname() {
        let mut place = seoul_place();
        place.building_name = "서울시청".to_string();
        assert_eq!(place.display_name(), "서울시청");

        place.nickname = "회사".to_string();
        assert_eq!(place.display_name(), "회사");

        let mut bare = Place::new(37.5, 127.0);
        bare.full_address = "서울특별시 중구".to_string();
        assert_eq!(bare.display_name(), "서울특별시 중구");
    }
}
