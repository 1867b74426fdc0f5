use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use which::which;

use crate::{PinError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where place documents are stored
    pub data_dir: PathBuf,

    /// Default editor command used for memo editing
    pub editor_command: Option<String>,
}

impl Config {
    /// Builds a configuration with the platform default data directory.
    pub fn with_defaults() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "pinit").ok_or_else(|| PinError::ConfigError {
            message: "Could not determine a data directory for this platform".to_string(),
        })?;

        Ok(Self {
            data_dir: dirs.data_dir().to_path_buf(),
            editor_command: None,
        })
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        // First try the configured editor
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        // Then try environment variable
        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        // Fall back to platform defaults
        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            // Try common Linux editors
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
