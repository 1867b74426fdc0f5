//! CLI module for the pinit application
//!
//! This module handles the command-line interface for interacting with
//! the place store.

use std::{
    fs,
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use globset::{GlobBuilder, GlobSetBuilder};
use log::{info, warn};
use tempfile::Builder;
use tokio::sync::broadcast::error::RecvError;
use walkdir::WalkDir;

use crate::{
    parse_coordinate, watch_data_dir, CategoryStore, Commands, Config, Coordinate, EventBus,
    PinError, Place, PlaceEvent, PlaceFilter, PlaceStore, PrefStore, Result, ReverseGeocoder,
    VisitCounter, BUILTIN_CATEGORIES,
};

/// Photos per place allowed by the interface. The store itself does not
/// enforce this.
const MAX_PHOTOS_PER_PLACE: usize = 10;

/// Default pattern for directory photo imports.
const DEFAULT_PHOTO_PATTERN: &str = "*.jpg";

/// CLI application handler - processes CLI commands and interfaces with
/// the place store. This is the single owner every mutation goes
/// through.
pub struct App {
    /// The place store backend
    store: PlaceStore,

    /// Custom category storage
    categories: CategoryStore,

    /// Visit counter storage
    visits: VisitCounter,

    /// Reverse geocoding collaborator
    geocoder: Box<dyn ReverseGeocoder>,

    /// Change broadcast shared with the store
    events: EventBus,

    /// Application configuration
    config: Config,
}

impl App {
    /// Create a new CLI application over the configured data directory.
    pub fn new(config: Config, geocoder: Box<dyn ReverseGeocoder>) -> Result<Self> {
        let events = EventBus::new();
        let prefs = PrefStore::open(&config.data_dir)?;

        let store = PlaceStore::new(prefs.clone(), events.clone());
        let categories = CategoryStore::new(prefs.clone(), events.clone());
        let visits = VisitCounter::new(prefs);

        Ok(Self {
            store,
            categories,
            visits,
            geocoder,
            events,
            config,
        })
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Save {
                coord,
                nickname,
                memo,
                category,
                no_geocode,
            } => {
                self.handle_save(coord, nickname, memo, category, no_geocode)
                    .await?
            }

            Commands::List {
                region,
                category,
                favorites,
                query,
                limit,
                json,
            } => self.handle_list(region, category, favorites, query, limit, json)?,

            Commands::Search { query, limit, json } => self.handle_search(query, limit, json)?,

            Commands::Edit {
                coord,
                nickname,
                memo,
                category,
                edit,
            } => self.handle_edit(coord, nickname, memo, category, edit)?,

            Commands::Favorite { coord, off } => self.handle_favorite(coord, off)?,

            Commands::Favorites { json } => self.handle_favorites(json)?,

            Commands::Delete { coord, force } => self.handle_delete(coord, force)?,

            Commands::Photo {
                coord,
                add,
                dir,
                pattern,
                list,
            } => self.handle_photo(coord, add, dir, pattern, list)?,

            Commands::Category { add, color, list } => self.handle_category(add, color, list)?,

            Commands::Visits { record, list } => self.handle_visits(record, list)?,

            Commands::Watch => self.handle_watch().await?,
        }

        Ok(())
    }

    async fn handle_save(
        &self,
        coord: String,
        nickname: Option<String>,
        memo: Option<String>,
        category: Option<String>,
        no_geocode: bool,
    ) -> Result<()> {
        let coord = parse_coordinate(&coord)?;

        let mut place = Place::new(coord.latitude, coord.longitude);
        place.nickname = nickname.unwrap_or_default();
        place.memo = memo.unwrap_or_default();
        if let Some(category) = category {
            place.category_color = self.categories.color_for(&category);
            place.category = category;
        }

        if !no_geocode {
            match self.geocoder.reverse(coord).await {
                Some(resolved) => {
                    place.building_name = resolved.building_name.unwrap_or_default();
                    place.full_address = resolved.full_address.unwrap_or_default();
                }
                None => info!("No address resolved for {}", coord),
            }
        }

        let address = place.full_address.clone();
        self.store.append(vec![place])?;

        if address.is_empty() {
            println!("Saved place at {}", coord);
        } else {
            println!("Saved place at {}: {}", coord, address);
        }
        Ok(())
    }

    fn handle_list(
        &self,
        region: Option<String>,
        category: Option<String>,
        favorites: bool,
        query: Option<String>,
        limit: usize,
        json: bool,
    ) -> Result<()> {
        let filter = PlaceFilter {
            region,
            category,
            favorites_only: favorites,
            text_query: query,
        };

        let mut places = self.store.filter(&filter);
        // most recent first for display
        places.reverse();

        if limit > 0 && places.len() > limit {
            places.truncate(limit);
        }

        self.display_places(&places, json)
    }

    fn handle_search(&self, query: String, limit: usize, json: bool) -> Result<()> {
        let matcher = SkimMatcherV2::default();

        // Score each place, weighting the names over the address
        struct ScoredPlace {
            place: Place,
            score: i64,
        }

        let mut matched: Vec<ScoredPlace> = Vec::new();
        for place in self.store.load_all() {
            let nickname_score = matcher.fuzzy_match(&place.nickname, &query).unwrap_or(0);
            let building_score = matcher
                .fuzzy_match(&place.building_name, &query)
                .unwrap_or(0);
            let address_score = matcher.fuzzy_match(&place.full_address, &query).unwrap_or(0);

            let score = (nickname_score + building_score) * 2 + address_score;
            if score > 0 {
                matched.push(ScoredPlace { place, score });
            }
        }

        matched.sort_by(|a, b| b.score.cmp(&a.score));

        let mut results: Vec<Place> = matched.into_iter().map(|scored| scored.place).collect();
        if limit > 0 && results.len() > limit {
            results.truncate(limit);
        }

        if results.is_empty() {
            println!("No places found matching query: \"{}\"", query);
            return Ok(());
        }

        self.display_places(&results, json)
    }

    fn handle_edit(
        &self,
        coord: String,
        nickname: Option<String>,
        memo: Option<String>,
        category: Option<String>,
        open_editor: bool,
    ) -> Result<()> {
        if memo.is_some() && open_editor {
            return Err(PinError::ApplicationError {
                message: "Cannot specify both --memo and --edit options".to_string(),
            });
        }

        let coord = parse_coordinate(&coord)?;

        // Load the existing place so created_at survives the edit; a new
        // record is started only when nothing exists at the coordinate.
        let mut place = self
            .find_place(coord)
            .unwrap_or_else(|| Place::new(coord.latitude, coord.longitude));

        if let Some(new_nickname) = nickname {
            place.nickname = new_nickname;
        }

        if let Some(new_memo) = memo {
            place.memo = new_memo;
        } else if open_editor {
            place.memo = self.open_editor_for_memo(&place.memo)?;
            println!("Memo updated from editor");
        }

        if let Some(new_category) = category {
            place.category_color = self.categories.color_for(&new_category);
            place.category = new_category;
        }

        self.store.upsert_by_coordinate(place)?;
        println!("Place at {} updated successfully", coord);
        Ok(())
    }

    fn handle_favorite(&self, coord: String, off: bool) -> Result<()> {
        let coord = parse_coordinate(&coord)?;
        self.store.set_favorite(coord, !off)?;

        if off {
            println!("Removed {} from favorites", coord);
        } else {
            println!("Added {} to favorites", coord);
        }
        Ok(())
    }

    fn handle_favorites(&self, json: bool) -> Result<()> {
        let favorites = self.store.favorites_snapshot();
        if favorites.is_empty() {
            println!("No favorite places yet.");
            return Ok(());
        }
        self.display_places(&favorites, json)
    }

    fn handle_delete(&self, coord: String, force: bool) -> Result<()> {
        let coord = parse_coordinate(&coord)?;

        // Fetch the place to show details in the prompt
        let place = match self.find_place(coord) {
            Some(place) => place,
            None => {
                return Err(PinError::PlaceNotFound {
                    latitude: coord.latitude,
                    longitude: coord.longitude,
                });
            }
        };

        if !force {
            println!("You are about to delete the following place:");
            println!("Coordinate: {}", coord);
            if !place.display_name().is_empty() {
                println!("Name:       {}", place.display_name());
            }
            if !place.full_address.is_empty() {
                println!("Address:    {}", place.full_address);
            }
            println!(
                "Saved:      {}",
                place.created_at.format("%Y-%m-%d %H:%M:%S")
            );

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this place? [y/N]: ");
            stdout().flush().map_err(PinError::Io)?;

            let mut input = String::new();
            stdin().read_line(&mut input).map_err(PinError::Io)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        let removed = self.store.delete(coord)?;
        println!(
            "Deleted {} place{} at {}",
            removed,
            if removed == 1 { "" } else { "s" },
            coord
        );
        Ok(())
    }

    fn handle_photo(
        &self,
        coord: String,
        add: Vec<PathBuf>,
        dir: Option<PathBuf>,
        pattern: Option<String>,
        list: bool,
    ) -> Result<()> {
        let coord = parse_coordinate(&coord)?;

        let mut place = self.find_place(coord).ok_or(PinError::PlaceNotFound {
            latitude: coord.latitude,
            longitude: coord.longitude,
        })?;

        if list {
            if place.images.is_empty() {
                println!("No photos attached at {}", coord);
            } else {
                println!("{} photo(s) attached at {}:", place.images.len(), coord);
                for (i, image) in place.images.iter().enumerate() {
                    let marker = if i == 0 { " (representative)" } else { "" };
                    println!("  #{}: {} bytes{}", i + 1, image.len(), marker);
                }
            }
            if add.is_empty() && dir.is_none() {
                return Ok(());
            }
        }

        let mut files = add;
        if let Some(dir) = dir {
            files.extend(self.collect_photo_files(&dir, pattern.as_deref())?);
        }

        if files.is_empty() {
            return Ok(());
        }

        let mut attached = 0;
        for path in files {
            if place.images.len() >= MAX_PHOTOS_PER_PLACE {
                warn!(
                    "Photo limit of {} reached, skipping remaining files",
                    MAX_PHOTOS_PER_PLACE
                );
                println!("Photo limit of {} reached.", MAX_PHOTOS_PER_PLACE);
                break;
            }

            if !path.exists() {
                return Err(PinError::FileNotFound {
                    file_path: path.display().to_string(),
                });
            }

            let bytes = fs::read(&path)?;
            place.images.push(bytes);
            attached += 1;
        }

        if attached > 0 {
            let total = place.images.len();
            self.store.upsert_by_coordinate(place)?;
            println!(
                "Attached {} photo(s) at {} ({} total)",
                attached, coord, total
            );
        }
        Ok(())
    }

    /// Collects photo files under a directory matching the pattern.
    fn collect_photo_files(&self, dir: &Path, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(PinError::ApplicationError {
                message: format!("Not a directory: {}", dir.display()),
            });
        }

        let pattern = pattern.unwrap_or(DEFAULT_PHOTO_PATTERN);
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PinError::ApplicationError {
                message: format!("Invalid pattern: {}", e),
            })?;
        let mut builder = GlobSetBuilder::new();
        builder.add(glob);
        let matcher = builder.build().map_err(|e| PinError::ApplicationError {
            message: format!("Invalid pattern: {}", e),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| matcher.is_match(name))
            {
                files.push(path.to_path_buf());
            }
        }

        // Stable attachment order regardless of walk order
        files.sort();
        info!("Found {} matching photo files in {}", files.len(), dir.display());
        Ok(files)
    }

    fn handle_category(
        &self,
        add: Option<String>,
        color: Option<String>,
        list: bool,
    ) -> Result<()> {
        if let Some(name) = add {
            let color = color.ok_or_else(|| PinError::ApplicationError {
                message: "--add requires --color".to_string(),
            })?;
            let category = self.categories.add(&name, &color)?;
            println!("Added category {} ({})", category.name, category.color);
        }

        if list {
            println!("Built-in categories:");
            for name in BUILTIN_CATEGORIES {
                println!("  {}", name);
            }

            let custom = self.categories.all();
            if !custom.is_empty() {
                println!("Custom categories:");
                for category in custom {
                    println!("  {} ({})", category.name, category.color);
                }
            }
        }
        Ok(())
    }

    fn handle_visits(&self, record: Option<String>, list: bool) -> Result<()> {
        if let Some(identifier) = record {
            let count = self.visits.record(&identifier)?;
            println!("Recorded visit {} for {}", count, identifier);
        }

        if list {
            let counts = self.visits.counts();
            if counts.is_empty() {
                println!("No visits recorded yet.");
            } else {
                for (identifier, count) in counts {
                    println!("{}: {}", identifier, count);
                }
            }
        }
        Ok(())
    }

    async fn handle_watch(&self) -> Result<()> {
        let mut rx = self.events.subscribe();
        let _watcher = watch_data_dir(&self.config.data_dir, self.events.clone())?;

        println!("Watching for changes. Press Ctrl-C to stop.");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
                event = rx.recv() => match event {
                    Ok(PlaceEvent::PlacesChanged) => {
                        let count = self.store.load_all().len();
                        println!("Places changed, {} saved", count);
                    }
                    Ok(PlaceEvent::CategoriesChanged) => {
                        let count = self.categories.all().len();
                        println!("Categories changed, {} defined", count);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} change events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
        Ok(())
    }

    /// Finds the place at a coordinate, if any.
    fn find_place(&self, coord: Coordinate) -> Option<Place> {
        self.store
            .load_all()
            .into_iter()
            .find(|place| coord.matches(place))
    }

    /// Display places in the requested format
    fn display_places(&self, places: &[Place], json: bool) -> Result<()> {
        if places.is_empty() {
            println!("No places found matching the criteria.");
            return Ok(());
        }

        if json {
            self.display_places_json(places)?;
        } else {
            self.display_places_text(places)?;
        }

        println!(
            "\nFound {} place{}",
            places.len(),
            if places.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    /// Display places in JSON format. Photo bytes are summarized as a
    /// count rather than dumped inline.
    fn display_places_json(&self, places: &[Place]) -> Result<()> {
        let simplified: Vec<serde_json::Value> = places
            .iter()
            .map(|place| {
                serde_json::json!({
                    "latitude": place.latitude,
                    "longitude": place.longitude,
                    "nickname": place.nickname,
                    "buildingName": place.building_name,
                    "fullAddress": place.full_address,
                    "region": place.region(),
                    "category": place.category,
                    "categoryColor": place.category_color,
                    "isFavorite": place.is_favorite,
                    "createdAt": place.created_at.to_rfc3339(),
                    "photoCount": place.images.len(),
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&simplified)?);
        Ok(())
    }

    /// Display places in text format
    fn display_places_text(&self, places: &[Place]) -> Result<()> {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, place) in places.iter().enumerate() {
            // Add separator between places (except before the first)
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let created_at = place.created_at.format("%Y-%m-%d %H:%M");
            let favorite = if place.is_favorite { " ♥" } else { "" };

            println!(
                "{}{} | Saved: {}",
                console::style(place.display_name()).bold(),
                favorite,
                created_at
            );
            println!("Coordinate: {}", place.coordinate());

            if !place.full_address.is_empty() {
                println!("Address: {}", place.full_address);
            }

            let mut tags: Vec<String> = Vec::new();
            tags.push(format!("#{}", place.region()));
            if !place.category.is_empty() {
                tags.push(format!("#{}", place.category));
            }
            println!("Tags: {}", console::style(tags.join(" ")).cyan());

            if !place.memo.is_empty() {
                println!("Memo: {}", self.get_memo_preview(&place.memo, 100));
            }
            if !place.images.is_empty() {
                println!("Photos: {}", place.images.len());
            }
        }

        Ok(())
    }

    /// Generate a memo preview for displaying brief listings
    fn get_memo_preview(&self, memo: &str, max_len: usize) -> String {
        // Get first non-empty line
        let first_line = memo
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        if first_line.chars().count() <= max_len {
            first_line.to_string()
        } else {
            let truncated: String = first_line.chars().take(max_len).collect();
            format!("{}...", truncated)
        }
    }

    fn open_editor_for_memo(&self, existing_memo: &str) -> Result<String> {
        // Create a temporary file for editing
        let temp_file = Builder::new().suffix(".txt").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        fs::write(&temp_path, existing_memo).map_err(PinError::Io)?;

        // Get editor from config or environment
        let editor_cmd = self.config.get_editor_command();

        info!("Opening editor to write the memo. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = fs::read_to_string(&temp_path).map_err(PinError::Io)?;
        Ok(content.trim_end().to_string())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        // Convert file path to string once
        let path_str = file_path.to_string_lossy();

        // Handle shell-like command parsing
        let args = shell_words::split(editor_cmd).map_err(|e| PinError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        if args.is_empty() {
            return Err(PinError::EditorError {
                message: "Empty editor command".to_string(),
            });
        }

        // First word is the program name, rest are arguments
        let program = &args[0];

        let mut command = Command::new(program);
        if args.len() > 1 {
            command.args(&args[1..]);
        }
        command.arg(path_str.as_ref());

        let status = command.status()?;

        if !status.success() {
            return Err(PinError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }
}
