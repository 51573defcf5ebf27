#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod document;
pub mod error;
pub mod event;
pub mod history;
pub mod log_sink;
pub mod palette;
pub mod palette_source;
pub mod pixels;
pub mod state;
pub mod tools;

pub use animation::Animation;
pub use document::ArtDocument;
pub use error::{ArtError, ArtResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use history::History;
pub use log_sink::LogSink;
pub use palette::{Colour, Palette, PaletteIndex};
pub use palette_source::{FileSource, ListSource, PaletteSource, SourceChain};
pub use pixels::{PixelBuffer, Position};
pub use state::{EditorConfig, EditorSession};
pub use tools::{Tool, ToolType};
