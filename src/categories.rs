//! User-defined categories with display colors.
//!
//! Custom categories live in their own persisted document next to the
//! place collection and extend the built-in category vocabulary.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    normalize_hex_color, EventBus, PinError, PlaceEvent, PrefStore, Result, DEFAULT_CATEGORY_COLOR,
};

/// Persisted key for the custom category list.
pub const CATEGORIES_KEY: &str = "CustomCategories";

/// A user-defined category and its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// Manages the persisted list of custom categories.
pub struct CategoryStore {
    prefs: PrefStore,
    events: EventBus,
}

impl CategoryStore {
    pub fn new(prefs: PrefStore, events: EventBus) -> Self {
        Self { prefs, events }
    }

    /// Returns all custom categories in definition order.
    pub fn all(&self) -> Vec<Category> {
        self.prefs.read(CATEGORIES_KEY).unwrap_or_default()
    }

    /// Looks up the color for a category name, falling back to the
    /// sentinel color for built-in or unknown categories.
    pub fn color_for(&self, name: &str) -> String {
        self.all()
            .into_iter()
            .find(|category| category.name == name)
            .map(|category| category.color)
            .unwrap_or_else(default_color)
    }

    /// Adds a custom category. The name must not collide with an
    /// existing custom category; the color is normalized to #RRGGBB.
    pub fn add(&self, name: &str, color: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PinError::ApplicationError {
                message: "Category name cannot be empty".to_string(),
            });
        }

        let color = normalize_hex_color(color)?;
        let mut categories = self.all();

        if categories.iter().any(|category| category.name == name) {
            return Err(PinError::CategoryExists {
                name: name.to_string(),
            });
        }

        let category = Category {
            name: name.to_string(),
            color,
        };
        categories.push(category.clone());
        self.prefs.write(CATEGORIES_KEY, &categories)?;

        self.events.publish(PlaceEvent::CategoriesChanged);
        info!("Added category {} ({})", category.name, category.color);
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn test_store() -> (TempDir, CategoryStore, EventBus) {
        let dir = tempdir().unwrap();
        let prefs = PrefStore::open(dir.path()).unwrap();
        let events = EventBus::new();
        let store = CategoryStore::new(prefs, events.clone());
        (dir, store, events)
    }

    #[test]
    fn add_then_all_round_trips() {
        let (_dir, store, _events) = test_store();

        store.add("빵집", "#ffaa00").unwrap();
        store.add("서점", "#0000FF").unwrap();

        let categories = store.all();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "빵집");
        assert_eq!(categories[0].color, "#FFAA00");
        assert_eq!(categories[1].name, "서점");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (_dir, store, _events) = test_store();

        store.add("빵집", "#ffaa00").unwrap();
        let result = store.add("빵집", "#000000");
        assert!(matches!(result, Err(PinError::CategoryExists { .. })));
    }

    #[test]
    fn color_lookup_falls_back_to_sentinel() {
        let (_dir, store, _events) = test_store();

        store.add("빵집", "#ffaa00").unwrap();
        assert_eq!(store.color_for("빵집"), "#FFAA00");
        assert_eq!(store.color_for("카페"), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn add_publishes_a_change_event() {
        let (_dir, store, events) = test_store();
        let mut rx = events.subscribe();

        store.add("빵집", "#ffaa00").unwrap();
        assert_eq!(rx.try_recv().unwrap(), PlaceEvent::CategoriesChanged);
    }

    #[test]
    fn decode_defaults_missing_color_to_sentinel() {
        let json = r#"[{"name": "빵집"}]"#;
        let categories: Vec<Category> = serde_json::from_str(json).unwrap();
        assert_eq!(categories[0].color, DEFAULT_CATEGORY_COLOR);
    }
}
