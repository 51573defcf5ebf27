use std::path::PathBuf;

use crate::palette::PaletteIndex;
use crate::pixels::Position;

/// Things that happened to the open document, for the shell to react to
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolActivated {
        tool: &'static str,
        location: Position,
    },
    ToolSelected {
        index: usize,
    },
    ColourSelected {
        index: PaletteIndex,
    },
    /// Pixels were replaced wholesale (undo, clear, new document)
    PixelsChanged,
    Undone,
    PaletteChanged,
    DocumentLoaded {
        path: PathBuf,
    },
    DocumentSaved {
        path: PathBuf,
    },
    Exported {
        path: PathBuf,
    },
    ZoomChanged {
        pixel_size: u32,
    },
}
