use std::fmt;
use std::str::FromStr;

use crate::error::{ArtError, ArtResult};
use crate::palette::PaletteIndex;
use crate::pixels::{PixelBuffer, Position};

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Short label for a tool button
    fn icon(&self) -> &'static str;

    /// Apply the tool at `location`, mutating `buffer` in place.
    ///
    /// Fails with [`ArtError::OutOfBounds`] if `location` is off the grid,
    /// in which case the buffer is not touched.
    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()>;
}

// Tool implementations
mod pencil;
pub use pencil::Pencil;

mod mirrored_pencil;
pub use mirrored_pencil::MirroredPencil;

mod bucket;
pub use bucket::{flood, Bucket, PartialBucket};

/// Enum representing all available tool types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolType {
    Pencil(Pencil),
    MirroredPencil(MirroredPencil),
    Bucket(Bucket),
    PartialBucket(PartialBucket),
}

impl Default for ToolType {
    fn default() -> Self {
        Self::Pencil(Pencil)
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Pencil(tool) => tool.name(),
            Self::MirroredPencil(tool) => tool.name(),
            Self::Bucket(tool) => tool.name(),
            Self::PartialBucket(tool) => tool.name(),
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Pencil(tool) => tool.icon(),
            Self::MirroredPencil(tool) => tool.icon(),
            Self::Bucket(tool) => tool.icon(),
            Self::PartialBucket(tool) => tool.icon(),
        }
    }

    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()> {
        match self {
            Self::Pencil(tool) => tool.activate(location, buffer, colour),
            Self::MirroredPencil(tool) => tool.activate(location, buffer, colour),
            Self::Bucket(tool) => tool.activate(location, buffer, colour),
            Self::PartialBucket(tool) => tool.activate(location, buffer, colour),
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MirroredPencil(tool) => write!(f, "mirrored:{}", tool.axis()),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for ToolType {
    type Err = ArtError;

    /// Accepts `pencil`, `bucket`, `partial_bucket` and `mirrored:<axis>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        new_tool(s).ok_or_else(|| ArtError::UnknownTool(s.to_owned()))
    }
}

// Factory function to create a new tool of the specified type
pub fn new_tool(tool_type: &str) -> Option<ToolType> {
    // The mirror axis is case sensitive, only the tool name is not
    let (name, axis) = match tool_type.trim().split_once(':') {
        Some((name, axis)) => (name, Some(axis)),
        None => (tool_type.trim(), None),
    };
    match (name.to_ascii_lowercase().as_str(), axis) {
        ("pencil", None) => Some(ToolType::Pencil(Pencil)),
        ("bucket", None) => Some(ToolType::Bucket(Bucket)),
        ("partial_bucket", None) => Some(ToolType::PartialBucket(PartialBucket)),
        ("mirrored", Some(axis)) if !axis.is_empty() => {
            Some(ToolType::MirroredPencil(MirroredPencil::new(axis)))
        }
        _ => None,
    }
}
