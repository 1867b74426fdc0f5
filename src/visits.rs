//! Visit counters keyed by caller-supplied identifiers.

use std::collections::BTreeMap;

use log::debug;

use crate::{PrefStore, Result};

/// Persisted key for the visit counter map.
pub const VISIT_COUNTS_KEY: &str = "visitCounts";

/// A persisted identifier-to-count map of place visits.
pub struct VisitCounter {
    prefs: PrefStore,
}

impl VisitCounter {
    pub fn new(prefs: PrefStore) -> Self {
        Self { prefs }
    }

    /// Returns all visit counts, sorted by identifier.
    pub fn counts(&self) -> BTreeMap<String, u32> {
        self.prefs.read(VISIT_COUNTS_KEY).unwrap_or_default()
    }

    /// Records a visit for the identifier and returns the new count.
    pub fn record(&self, identifier: &str) -> Result<u32> {
        let mut counts = self.counts();
        let count = counts.entry(identifier.to_string()).or_insert(0);
        *count += 1;
        let count = *count;

        self.prefs.write(VISIT_COUNTS_KEY, &counts)?;
        debug!("Visit {} recorded for {}", count, identifier);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_increments_and_persists() {
        let dir = tempdir().unwrap();
        let counter = VisitCounter::new(PrefStore::open(dir.path()).unwrap());

        assert_eq!(counter.record("home").unwrap(), 1);
        assert_eq!(counter.record("home").unwrap(), 2);
        assert_eq!(counter.record("office").unwrap(), 1);

        // a fresh counter over the same directory sees the same state
        let reopened = VisitCounter::new(PrefStore::open(dir.path()).unwrap());
        let counts = reopened.counts();
        assert_eq!(counts.get("home"), Some(&2));
        assert_eq!(counts.get("office"), Some(&1));
    }

    #[test]
    fn counts_start_empty() {
        let dir = tempdir().unwrap();
        let counter = VisitCounter::new(PrefStore::open(dir.path()).unwrap());
        assert!(counter.counts().is_empty());
    }
}
