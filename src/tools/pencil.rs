use super::Tool;
use crate::error::ArtResult;
use crate::palette::PaletteIndex;
use crate::pixels::{PixelBuffer, Position};

/// Sets a single pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pencil;

impl Tool for Pencil {
    fn name(&self) -> &'static str {
        "pencil"
    }

    fn icon(&self) -> &'static str {
        "Pen"
    }

    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()> {
        buffer.set_pixel(location.x, location.y, colour)
    }
}
