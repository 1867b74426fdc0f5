//! Error types for the pinit application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during place management operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the pinit application.
#[derive(Error, Debug)]
pub enum PinError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No saved place exists at the given coordinate.
    #[error("No saved place at ({latitude}, {longitude})")]
    PlaceNotFound { latitude: f64, longitude: f64 },

    /// A category with the same name already exists.
    #[error("Category already exists: {name}")]
    CategoryExists { name: String },

    /// A color string was not a valid #RRGGBB value.
    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    /// A coordinate argument could not be parsed.
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
