//! The editing session the presentation shell drives.
//!
//! An [`EditorSession`] owns the open document, its undo history, the
//! selected tool and pen colour, and the status log. Every user gesture maps
//! to one method call that runs to completion before the next.
//!
//! Conditions a user can trip over while drawing (dragging off the canvas,
//! undoing with nothing to undo, an unknown palette source) are logged and
//! swallowed. Structural failures such as a malformed file are returned to
//! the caller and leave the session unchanged.
//!
//! # Example
//!
//! ```
//! use pixel_artist::state::EditorSession;
//!
//! let mut session = EditorSession::default();
//! session.set_pen_colour(3).unwrap();
//! session.activate_tool(2, 2).unwrap();
//! assert_eq!(session.document().pixels().get_pixel(2, 2).unwrap(), 3);
//!
//! session.undo();
//! assert_eq!(session.document().pixels().get_pixel(2, 2).unwrap(), 0);
//! ```
use std::path::{Path, PathBuf};

use super::EditorConfig;
use crate::document::ArtDocument;
use crate::error::{ArtError, ArtResult};
use crate::event::{EditorEvent, EventBus};
use crate::history::History;
use crate::log_sink::LogSink;
use crate::palette::PaletteIndex;
use crate::palette_source::PaletteSource;
use crate::pixels::{PixelBuffer, Position};
use crate::tools::{new_tool, Bucket, Pencil, Tool, ToolType};

#[derive(Debug)]
pub struct EditorSession {
    document: ArtDocument,
    history: History,
    log: LogSink,
    events: EventBus,
    tools: Vec<ToolType>,
    selected_tool: usize,
    pen_colour: PaletteIndex,
    last_export: Option<PathBuf>,
    config: EditorConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let mut log = LogSink::new(config.log_capacity);
        let mut tools: Vec<ToolType> = Vec::new();
        for name in &config.tools {
            match new_tool(name) {
                Some(tool) => tools.push(tool),
                None => log.warn(format!("Unknown tool '{name}' in settings")),
            }
        }
        if tools.is_empty() {
            tools = vec![ToolType::Pencil(Pencil), ToolType::Bucket(Bucket)];
        }

        Self {
            document: ArtDocument::new(config.canvas_size),
            history: History::new(config.history_limit),
            log,
            events: EventBus::new(),
            tools,
            selected_tool: 0,
            pen_colour: 0,
            last_export: None,
            config,
        }
    }

    pub fn document(&self) -> &ArtDocument {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    /// Subscribe handlers here to hear about changes
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tools(&self) -> &[ToolType] {
        &self.tools
    }

    pub fn selected_tool(&self) -> &ToolType {
        &self.tools[self.selected_tool]
    }

    pub fn pen_colour(&self) -> PaletteIndex {
        self.pen_colour
    }

    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    pub fn select_tool(&mut self, index: usize) -> ArtResult<()> {
        if index >= self.tools.len() {
            return Err(ArtError::UnknownTool(format!("#{index}")));
        }
        self.selected_tool = index;
        self.events.emit(EditorEvent::ToolSelected { index });
        Ok(())
    }

    /// Pick the palette slot the pen draws with
    pub fn set_pen_colour(&mut self, index: PaletteIndex) -> ArtResult<()> {
        self.document.palette().get(index)?;
        self.pen_colour = index;
        self.events.emit(EditorEvent::ColourSelected { index });
        Ok(())
    }

    /// Eyedropper: make the colour under `(x, y)` the pen colour.
    ///
    /// Returns the picked index, or `None` when `(x, y)` is off the canvas.
    pub fn pick_colour(&mut self, x: i32, y: i32) -> ArtResult<Option<PaletteIndex>> {
        match self.document.pixels().get_pixel(x, y) {
            Ok(index) => {
                self.set_pen_colour(index)?;
                Ok(Some(index))
            }
            Err(ArtError::OutOfBounds { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Apply the selected tool at `(x, y)` with the pen colour.
    ///
    /// The pixels are snapshotted first. Positions off the canvas are a
    /// silent no-op and leave no snapshot behind.
    pub fn activate_tool(&mut self, x: i32, y: i32) -> ArtResult<()> {
        let location = Position::new(x, y);
        let tool = &self.tools[self.selected_tool];
        if !self.document.pixels().contains(x, y) {
            log::debug!("ignoring {} off the canvas at ({x}, {y})", tool.name());
            return Ok(());
        }
        self.history.record_snapshot(self.document.pixels());

        match tool.activate(location, self.document.pixels_mut(), self.pen_colour) {
            Ok(()) => {
                log::debug!("{} at ({x}, {y}) with colour {}", tool.name(), self.pen_colour);
                self.events.emit(EditorEvent::ToolActivated {
                    tool: tool.name(),
                    location,
                });
                Ok(())
            }
            Err(e) => {
                self.history.discard_latest();
                if e.is_recoverable() {
                    self.log.warn(e.to_string());
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Restore the pixels from before the last tool use
    pub fn undo(&mut self) {
        match self.history.undo() {
            Ok(pixels) => {
                self.document.replace_pixels(pixels);
                self.events.emit(EditorEvent::Undone);
            }
            Err(e) => self.log.warn(e.to_string()),
        }
    }

    /// Reset every pixel to index 0
    pub fn clear(&mut self) {
        self.history.record_snapshot(self.document.pixels());
        self.document.pixels_mut().fill(0);
        self.events.emit(EditorEvent::PixelsChanged);
    }

    /// Start over with a blank `size` x `size` canvas, at least 1x1
    pub fn new_document(&mut self, size: usize) {
        self.document = ArtDocument::new(size);
        self.history.clear();
        self.pen_colour = 0;
        let size = self.document.size();
        self.log.push(format!("New {size}x{size} canvas"));
        self.events.emit(EditorEvent::PixelsChanged);
    }

    /// Replace the open document with one read from disk.
    ///
    /// On failure the open document is untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        let document = match ArtDocument::load(path) {
            Ok(document) => document,
            Err(e) => {
                self.log.warn(format!("Could not load {}: {e}", path.display()));
                return Err(e);
            }
        };
        self.document = document;
        self.history.clear();
        self.reset_pen_if_missing();
        self.log.push(format!("Loaded {}", path.display()));
        self.events.emit(EditorEvent::DocumentLoaded {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        self.document.save(path)?;
        self.log.push(format!("Saved {}", path.display()));
        self.events.emit(EditorEvent::DocumentSaved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Take the palette from another art file, keeping the pixels
    pub fn load_palette(&mut self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        self.document.load_palette_from_file(path)?;
        self.reset_pen_if_missing();
        self.log.push(format!("Loaded palette from {}", path.display()));
        self.events.emit(EditorEvent::PaletteChanged);
        Ok(())
    }

    /// Export an image using the configured scale and transparent index
    pub fn export_image(&mut self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        self.document.export_to_image_file(
            path,
            self.config.export_scale,
            self.config.transparent_index,
        )?;
        self.last_export = Some(path.to_path_buf());
        self.log.push(format!("Exported {}", path.display()));
        self.events.emit(EditorEvent::Exported {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Export again to the last export path, if there is one
    pub fn export_last(&mut self) -> ArtResult<()> {
        match self.last_export.clone() {
            Some(path) => self.export_image(path),
            None => {
                self.log.warn("Nothing has been exported yet");
                Ok(())
            }
        }
    }

    /// Overwrite one palette slot and start drawing with it.
    ///
    /// `index` may name an existing slot or the next free one.
    pub fn change_palette_colour(&mut self, index: PaletteIndex, hex: &str) -> ArtResult<()> {
        self.document.palette_mut().set_hex(index, hex)?;
        self.events.emit(EditorEvent::PaletteChanged);
        self.set_pen_colour(index)
    }

    pub fn randomize_palette(&mut self) {
        self.document.palette_mut().randomize();
        self.events.emit(EditorEvent::PaletteChanged);
    }

    /// Sort the palette perceptually.
    ///
    /// Pixel indices are remapped, so older snapshots would no longer match
    /// the palette; the history is dropped.
    pub fn sort_palette(&mut self) {
        self.document.sort_palette();
        self.history.clear();
        self.events.emit(EditorEvent::PaletteChanged);
        self.events.emit(EditorEvent::PixelsChanged);
    }

    /// Fill palette slots `0..k` from an external source.
    ///
    /// Returns whether the palette changed. Failures are logged and leave the
    /// palette as it was.
    pub fn apply_palette_source(&mut self, provider: &dyn PaletteSource, source: &str) -> bool {
        let result = provider
            .fetch(source)
            .and_then(|colours| self.document.palette_mut().replace_prefix(colours.as_slice()));
        match result {
            Ok(()) => {
                self.log.push(format!("Loaded palette from {source}"));
                self.events.emit(EditorEvent::PaletteChanged);
                true
            }
            Err(e) => {
                self.log.warn(e.to_string());
                false
            }
        }
    }

    /// Change the on-screen pixel size by `delta`, never going below 1
    pub fn zoom(&mut self, delta: i32) -> u32 {
        let size = (self.config.pixel_size as i64 + delta as i64).max(1);
        self.config.pixel_size = size.min(u32::MAX as i64) as u32;
        self.events.emit(EditorEvent::ZoomChanged {
            pixel_size: self.config.pixel_size,
        });
        self.config.pixel_size
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.zoom(self.config.zoom_step as i32)
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.zoom(-(self.config.zoom_step as i32))
    }

    /// Snapshot of the current pixels, for previews that must not alias the live grid
    pub fn pixels_snapshot(&self) -> PixelBuffer {
        self.document.pixels().clone()
    }

    fn reset_pen_if_missing(&mut self) {
        if !self.document.palette().contains(self.pen_colour) {
            self.pen_colour = self.document.palette().indices().next().unwrap_or(0);
        }
    }
}
