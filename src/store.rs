//! The place store: single source of truth for saved places.
//!
//! All operations are whole-collection read-modify-write over two
//! persisted documents: the primary ordered collection and a
//! denormalized favorites snapshot. The store is synchronous and
//! single-writer; callers funnel every mutation through one owner.

use log::{debug, info};

use crate::{
    Coordinate, EventBus, PinError, Place, PlaceEvent, PlaceFilter, PrefStore, Result,
};

/// Primary collection key. Insertion order is save order.
pub const SAVED_PLACES_KEY: &str = "savedMarkerLocations";

/// Denormalized favorites snapshot key. A cache of the primary
/// collection, never authoritative on its own.
pub const FAVORITES_KEY: &str = "FavoriteLocations";

/// Manages the storage, retrieval, and filtering of saved places.
pub struct PlaceStore {
    /// Persistence backend
    prefs: PrefStore,

    /// Change broadcast, notified after every mutation
    events: EventBus,
}

impl PlaceStore {
    /// Creates a new place store over the given preference storage.
    pub fn new(prefs: PrefStore, events: EventBus) -> Self {
        info!("Opened place store at {}", prefs.root().display());
        Self { prefs, events }
    }

    /// Loads the whole collection in persisted (insertion) order.
    ///
    /// A missing or malformed document yields an empty collection, never
    /// an error. Favorite flags recorded in the snapshot are merged in,
    /// so a place listed there always loads as a favorite.
    pub fn load_all(&self) -> Vec<Place> {
        let mut places: Vec<Place> = self.prefs.read(SAVED_PLACES_KEY).unwrap_or_default();
        self.merge_favorite_flags(&mut places);
        debug!("Loaded {} places", places.len());
        places
    }

    /// Marks places as favorite when their coordinate appears in the
    /// favorites snapshot. Merge only ever sets the flag; clearing is the
    /// job of [`set_favorite`](Self::set_favorite).
    fn merge_favorite_flags(&self, places: &mut [Place]) {
        let snapshot: Vec<Place> = self.prefs.read(FAVORITES_KEY).unwrap_or_default();
        if snapshot.is_empty() {
            return;
        }
        for place in places.iter_mut() {
            if !place.is_favorite {
                let coord = place.coordinate();
                if snapshot.iter().any(|favorite| coord.matches(favorite)) {
                    place.is_favorite = true;
                }
            }
        }
    }

    /// Appends places to the end of the collection and writes the whole
    /// collection back. No duplicate check is performed.
    pub fn append(&self, new_places: Vec<Place>) -> Result<()> {
        if new_places.is_empty() {
            return Ok(());
        }
        info!("Appending {} place(s)", new_places.len());

        let mut places = self.load_all();
        places.extend(new_places);
        self.write_all(&places)
    }

    /// Replaces the place at the given coordinate, or appends it when no
    /// place exists there. Lookup is a linear scan over the collection,
    /// which is fine at the scale of user-authored pins.
    pub fn upsert_by_coordinate(&self, place: Place) -> Result<()> {
        let coord = place.coordinate();
        let mut places = self.load_all();

        match places.iter_mut().find(|existing| coord.matches(existing)) {
            Some(existing) => {
                debug!("Replacing place at {}", coord);
                *existing = place;
            }
            None => {
                debug!("No place at {}, appending", coord);
                places.push(place);
            }
        }

        self.write_all(&places)?;
        info!("Upserted place at {}", coord);
        Ok(())
    }

    /// Removes every place at the given coordinate.
    ///
    /// # Returns
    ///
    /// The number of places removed. Deleting at a coordinate with no
    /// places is a no-op returning 0.
    pub fn delete(&self, coord: Coordinate) -> Result<usize> {
        let mut places = self.load_all();
        let before = places.len();
        places.retain(|place| !coord.matches(place));
        let removed = before - places.len();

        if removed == 0 {
            debug!("No place at {} to delete", coord);
            return Ok(0);
        }

        self.write_all(&places)?;
        info!("Deleted {} place(s) at {}", removed, coord);
        Ok(removed)
    }

    /// Sets or clears the favorite flag on the place at the given
    /// coordinate and rewrites both documents.
    pub fn set_favorite(&self, coord: Coordinate, value: bool) -> Result<()> {
        let mut places = self.load_all();

        let place = places
            .iter_mut()
            .find(|place| coord.matches(place))
            .ok_or(PinError::PlaceNotFound {
                latitude: coord.latitude,
                longitude: coord.longitude,
            })?;
        place.is_favorite = value;

        self.write_all(&places)?;
        info!(
            "Place at {} is {} a favorite",
            coord,
            if value { "now" } else { "no longer" }
        );
        Ok(())
    }

    /// Returns the subset of the collection matching every supplied
    /// predicate, in persisted order.
    pub fn filter(&self, filter: &PlaceFilter) -> Vec<Place> {
        let matches: Vec<Place> = self
            .load_all()
            .into_iter()
            .filter(|place| filter.matches(place))
            .collect();
        debug!("Filter matched {} places", matches.len());
        matches
    }

    /// Reads the denormalized favorites snapshot directly.
    pub fn favorites_snapshot(&self) -> Vec<Place> {
        self.prefs.read(FAVORITES_KEY).unwrap_or_default()
    }

    /// Whole-collection write-back. The favorites snapshot is recomputed
    /// from the primary collection on every write so the two documents
    /// cannot drift, then a change event is broadcast.
    fn write_all(&self, places: &[Place]) -> Result<()> {
        self.prefs.write(SAVED_PLACES_KEY, &places)?;

        let favorites: Vec<&Place> = places.iter().filter(|place| place.is_favorite).collect();
        self.prefs.write(FAVORITES_KEY, &favorites)?;

        self.events.publish(PlaceEvent::PlacesChanged);
        Ok(())
    }
}
