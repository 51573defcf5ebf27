use super::Tool;
use crate::error::ArtResult;
use crate::palette::PaletteIndex;
use crate::pixels::{PixelBuffer, Position};

/// Pencil that repeats each pixel across one or both centre lines.
///
/// The axis string is checked for substrings, not matched exactly:
/// - `y` anywhere mirrors horizontally, to column `width - 1 - x`
/// - `x` anywhere mirrors vertically, to row `height - 1 - y`
/// - `xy` or `yx` also writes the point mirrored on both axes
///
/// So `"xy"` writes four pixels, and `"yxy"` writes the same four.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredPencil {
    axis: String,
}

impl Default for MirroredPencil {
    fn default() -> Self {
        Self::new("x")
    }
}

impl MirroredPencil {
    pub fn new(axis: impl Into<String>) -> Self {
        Self { axis: axis.into() }
    }

    pub fn axis(&self) -> &str {
        &self.axis
    }
}

impl Tool for MirroredPencil {
    fn name(&self) -> &'static str {
        "mirrored_pencil"
    }

    fn icon(&self) -> &'static str {
        "Mir"
    }

    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()> {
        let Position { x, y } = location;
        buffer.set_pixel(x, y, colour)?;

        let mirrored_x = buffer.width() as i32 - 1 - x;
        let mirrored_y = buffer.height() as i32 - 1 - y;

        if self.axis.contains('y') {
            log::trace!("mirroring to ({mirrored_x}, {y})");
            buffer.set_pixel(mirrored_x, y, colour)?;
        }
        if self.axis.contains('x') {
            log::trace!("mirroring to ({x}, {mirrored_y})");
            buffer.set_pixel(x, mirrored_y, colour)?;
        }
        if self.axis.contains("xy") || self.axis.contains("yx") {
            buffer.set_pixel(mirrored_x, mirrored_y, colour)?;
        }
        Ok(())
    }
}
