use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::document::DEFAULT_SIZE;
use crate::error::ArtResult;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::log_sink::DEFAULT_LOG_CAPACITY;
use crate::palette::PaletteIndex;

/// Editor settings, persisted as JSON between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct EditorConfig {
    /// Edge length of new documents
    pub canvas_size: usize,
    /// Snapshot slots in the undo history
    pub history_limit: usize,
    /// Status messages kept for the shell
    pub log_capacity: usize,
    /// Pixels per art pixel when exporting images
    pub export_scale: u32,
    /// Palette index left transparent in exported images
    pub transparent_index: Option<PaletteIndex>,
    /// On-screen size of one art pixel
    pub pixel_size: u32,
    /// How much one zoom step changes `pixel_size`
    pub zoom_step: u32,
    /// Tool names offered by the session, see [`crate::tools::new_tool`]
    pub tools: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_capacity: DEFAULT_LOG_CAPACITY,
            export_scale: 10,
            transparent_index: None,
            pixel_size: 20,
            zoom_step: 10,
            tools: vec!["pencil".to_owned(), "bucket".to_owned()],
        }
    }
}

impl EditorConfig {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ArtResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&json)?;
        log::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load settings, falling back to defaults if the file is missing or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Using default settings, could not read {}: {e}",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
