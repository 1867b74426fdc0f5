//! Shared types for the pinit application.
//!
//! This module contains the result alias, the predicate set used for
//! filtered listings, and the CLI subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

use crate::{PinError, Place};

/// A specialized Result type for pinit operations.
pub type Result<T> = std::result::Result<T, PinError>;

/// Predicate set for filtered listings. All supplied predicates must
/// match; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    /// Short region code, matched against the region derived from the address
    pub region: Option<String>,
    /// Exact category name
    pub category: Option<String>,
    /// Only include favorites
    pub favorites_only: bool,
    /// Case-sensitive substring match over the saved address
    pub text_query: Option<String>,
}

impl PlaceFilter {
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.category.is_none()
            && !self.favorites_only
            && self.text_query.is_none()
    }

    /// Returns true if the place satisfies every supplied predicate.
    pub fn matches(&self, place: &Place) -> bool {
        if self.favorites_only && !place.is_favorite {
            return false;
        }
        if let Some(region) = &self.region {
            if place.region() != region.as_str() {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if place.category != *category {
                return false;
            }
        }
        if let Some(query) = &self.text_query {
            if !place.full_address.contains(query.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Available subcommands for the pinit application
#[derive(Subcommand)]
pub enum Commands {
    /// Save a new place
    Save {
        /// Coordinate as "lat,lng", e.g. "37.5665,126.9780"
        coord: String,

        /// Nickname for the place
        #[clap(short, long)]
        nickname: Option<String>,

        /// Free-form memo
        #[clap(short, long)]
        memo: Option<String>,

        /// Category name
        #[clap(short, long)]
        category: Option<String>,

        /// Skip the reverse-geocoding lookup
        #[clap(long)]
        no_geocode: bool,
    },

    /// List saved places with optional filtering
    List {
        /// Filter by short region code (e.g. 서울)
        #[clap(short, long)]
        region: Option<String>,

        /// Filter by category name
        #[clap(short, long)]
        category: Option<String>,

        /// Only show favorites
        #[clap(short, long)]
        favorites: bool,

        /// Substring to match against the saved address
        #[clap(short, long)]
        query: Option<String>,

        /// Limit the number of places shown (0 shows all)
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Search places by nickname, building name, or address
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results (0 shows all)
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit a place, creating it if no place exists at the coordinate
    Edit {
        /// Coordinate as "lat,lng"
        coord: String,

        /// New nickname
        #[clap(short, long)]
        nickname: Option<String>,

        /// New memo text
        #[clap(short, long)]
        memo: Option<String>,

        /// New category name
        #[clap(short, long)]
        category: Option<String>,

        /// Open the memo in the default editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Mark or unmark a place as favorite
    Favorite {
        /// Coordinate as "lat,lng"
        coord: String,

        /// Clear the favorite flag instead of setting it
        #[clap(long)]
        off: bool,
    },

    /// Show the favorites snapshot
    Favorites {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Delete all places at a coordinate
    Delete {
        /// Coordinate as "lat,lng"
        coord: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Photo operations for a saved place
    Photo {
        /// Coordinate as "lat,lng"
        coord: String,

        /// Image files to attach
        #[clap(short, long, num_args = 1..)]
        add: Vec<PathBuf>,

        /// Attach every matching image under a directory
        #[clap(short, long)]
        dir: Option<PathBuf>,

        /// Glob pattern for --dir (default "*.jpg")
        #[clap(short, long)]
        pattern: Option<String>,

        /// List attached photos
        #[clap(short, long)]
        list: bool,
    },

    /// Category operations (add, list)
    Category {
        /// Add a category with the given name
        #[clap(short, long)]
        add: Option<String>,

        /// Hex color for --add (e.g. #FF0000)
        #[clap(short, long)]
        color: Option<String>,

        /// List all categories
        #[clap(short, long)]
        list: bool,
    },

    /// Visit counter operations (record, list)
    Visits {
        /// Record a visit for the given identifier
        #[clap(short, long)]
        record: Option<String>,

        /// List all visit counts
        #[clap(short, long)]
        list: bool,
    },

    /// Watch the store and report changes until interrupted
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_with_address(address: &str) -> Place {
        let mut place = Place::new(37.5, 127.0);
        place.full_address = address.to_string();
        place
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = PlaceFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&Place::new(0.0, 0.0)));
    }

    #[test]
    fn region_filter_uses_derived_region() {
        let filter = PlaceFilter {
            region: Some("서울".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&place_with_address("서울특별시 강남구")));
        assert!(!filter.matches(&place_with_address("부산광역시 중구")));
        // no address, no region
        assert!(!filter.matches(&Place::new(37.5, 127.0)));
    }

    #[test]
    fn text_query_is_case_sensitive_substring() {
        let mut filter = PlaceFilter {
            text_query: Some("Gangnam".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&place_with_address("Seoul Gangnam-gu")));
        filter.text_query = Some("gangnam".to_string());
        assert!(!filter.matches(&place_with_address("Seoul Gangnam-gu")));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let filter = PlaceFilter {
            region: Some("서울".to_string()),
            favorites_only: true,
            ..Default::default()
        };
        let mut place = place_with_address("서울특별시 종로구");
        assert!(!filter.matches(&place));
        place.is_favorite = true;
        assert!(filter.matches(&place));
    }
}
