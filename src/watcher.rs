//! Bridges data-directory changes into the event bus.
//!
//! A long-running session (the `watch` command) uses this to notice
//! edits made by other processes: document changes on disk are
//! republished as the matching [`PlaceEvent`].

use std::path::Path;

use log::{debug, error, info};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::{EventBus, PinError, PlaceEvent, Result, CATEGORIES_KEY};

/// Keeps the underlying file system watcher alive. Dropping it stops
/// the watching.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
}

/// Starts watching the data directory and republishing document changes
/// on the given bus.
pub fn watch_data_dir(data_dir: &Path, events: EventBus) -> Result<StoreWatcher> {
    info!("Watching {} for changes", data_dir.display());

    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => handle_fs_event(event, &events),
            Err(e) => error!("File watcher error: {}", e),
        })
        .map_err(|e| PinError::ApplicationError {
            message: format!("Failed to create file watcher: {}", e),
        })?;

    watcher
        .watch(data_dir, RecursiveMode::NonRecursive)
        .map_err(|e| PinError::ApplicationError {
            message: format!("Failed to watch {}: {}", data_dir.display(), e),
        })?;

    Ok(StoreWatcher { _watcher: watcher })
}

/// Republishes file system events on the bus, one event per touched
/// document.
fn handle_fs_event(event: Event, events: &EventBus) {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {
            for path in &event.paths {
                if path.extension().is_some_and(|ext| ext == "json") {
                    let change = classify_document(path);
                    debug!("Document changed on disk: {} -> {:?}", path.display(), change);
                    events.publish(change);
                }
            }
        }
        _ => {
            // Ignore other events
        }
    }
}

fn classify_document(path: &Path) -> PlaceEvent {
    if path.file_stem().is_some_and(|stem| stem == CATEGORIES_KEY) {
        PlaceEvent::CategoriesChanged
    } else {
        PlaceEvent::PlacesChanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn category_documents_classify_separately() {
        let categories = PathBuf::from("/data/CustomCategories.json");
        assert_eq!(
            classify_document(&categories),
            PlaceEvent::CategoriesChanged
        );

        let places = PathBuf::from("/data/savedMarkerLocations.json");
        assert_eq!(classify_document(&places), PlaceEvent::PlacesChanged);
    }

    #[test]
    fn fs_events_for_json_documents_are_republished() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/data/savedMarkerLocations.json"));
        handle_fs_event(event, &bus);

        assert_eq!(rx.try_recv().unwrap(), PlaceEvent::PlacesChanged);
    }

    #[test]
    fn non_document_files_are_ignored() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/data/notes.txt"));
        handle_fs_event(event, &bus);

        assert!(rx.try_recv().is_err());
    }
}
