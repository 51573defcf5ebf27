use std::collections::VecDeque;

use super::Tool;
use crate::error::ArtResult;
use crate::palette::PaletteIndex;
use crate::pixels::{PixelBuffer, Position};

/// Walk the 4-connected region sharing the colour of `start`.
///
/// Each region cell is visited exactly once, in breadth-first order, and is
/// overwritten with `colour` when `paint` returns true for it. Cells that are
/// not repainted still carry the walk onwards. Returns the region in visit
/// order.
pub fn flood(
    buffer: &mut PixelBuffer,
    start: Position,
    colour: PaletteIndex,
    paint: impl Fn(Position) -> bool,
) -> ArtResult<Vec<Position>> {
    let target = buffer.get_pixel(start.x, start.y)?;
    let width = buffer.width();
    let slot = |pos: Position| pos.y as usize * width + pos.x as usize;

    // Set once a cell has been queued, so nothing is queued twice
    let mut seen = vec![false; width * buffer.height()];
    let mut pending = VecDeque::from([start]);
    seen[slot(start)] = true;

    let mut region = Vec::new();
    while let Some(pos) = pending.pop_front() {
        if buffer.get_pixel(pos.x, pos.y)? != target {
            continue;
        }
        if paint(pos) {
            buffer.set_pixel(pos.x, pos.y, colour)?;
        }
        region.push(pos);
        for next in buffer.neighbours4(pos.x, pos.y) {
            if !seen[slot(next)] {
                seen[slot(next)] = true;
                pending.push_back(next);
            }
        }
    }
    Ok(region)
}

/// Classic flood fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket;

impl Tool for Bucket {
    fn name(&self) -> &'static str {
        "bucket"
    }

    fn icon(&self) -> &'static str {
        "Bkt"
    }

    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()> {
        let region = flood(buffer, location, colour, |_| true)?;
        log::debug!("bucket filled {} pixels with {colour}", region.len());
        Ok(())
    }
}

/// Flood fill that only paints a checkerboard of the region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialBucket;

impl PartialBucket {
    pub fn paints(pos: Position) -> bool {
        (pos.x + pos.y) % 2 == 0
    }
}

impl Tool for PartialBucket {
    fn name(&self) -> &'static str {
        "partial_bucket"
    }

    fn icon(&self) -> &'static str {
        "Dth"
    }

    fn activate(
        &self,
        location: Position,
        buffer: &mut PixelBuffer,
        colour: PaletteIndex,
    ) -> ArtResult<()> {
        let region = flood(buffer, location, colour, Self::paints)?;
        log::debug!("partial bucket visited {} pixels", region.len());
        Ok(())
    }
}
