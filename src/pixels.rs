use crate::error::{ArtError, ArtResult};
use crate::palette::PaletteIndex;

/// A grid coordinate.
///
/// Signed so callers can pass positions that drifted off the canvas during a
/// drag; the buffer rejects them with [`ArtError::OutOfBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Row-major grid of palette indices with a fixed size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<PaletteIndex>,
}

impl PixelBuffer {
    /// A `width` x `height` grid filled with index 0
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, index: PaletteIndex) -> Self {
        Self {
            width,
            height,
            pixels: vec![index; width * height],
        }
    }

    /// Build a buffer from rows of equal length
    pub fn from_rows(rows: Vec<Vec<PaletteIndex>>) -> ArtResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().position(|row| row.len() != width) {
            return Err(ArtError::MalformedDocument(format!(
                "row {row} has {} pixels, expected {width}",
                rows[row].len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: rows.into_iter().flatten().collect(),
        })
    }

    /// Reshape a flat row-major list into a `width` x `height` grid
    pub fn from_flat(width: usize, height: usize, pixels: Vec<PaletteIndex>) -> ArtResult<Self> {
        if pixels.len() != width * height {
            return Err(ArtError::MalformedDocument(format!(
                "expected {} pixels for a {width}x{height} grid, found {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn offset(&self, x: i32, y: i32) -> ArtResult<usize> {
        if self.contains(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(ArtError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> ArtResult<PaletteIndex> {
        Ok(self.pixels[self.offset(x, y)?])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, index: PaletteIndex) -> ArtResult<()> {
        let offset = self.offset(x, y)?;
        self.pixels[offset] = index;
        Ok(())
    }

    /// In-grid neighbours in up, down, left, right order
    pub fn neighbours4(&self, x: i32, y: i32) -> Vec<Position> {
        [(x, y - 1), (x, y + 1), (x - 1, y), (x + 1, y)]
            .into_iter()
            .filter(|&(nx, ny)| self.contains(nx, ny))
            .map(Position::from)
            .collect()
    }

    /// Every index, row by row
    pub fn iter(&self) -> impl Iterator<Item = PaletteIndex> + '_ {
        self.pixels.iter().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[PaletteIndex]> + '_ {
        // chunks panics on zero, and a zero-width grid has no rows anyway
        self.pixels.chunks(self.width.max(1))
    }

    pub fn row(&self, y: usize) -> Option<&[PaletteIndex]> {
        if y < self.height {
            Some(&self.pixels[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }

    /// Rewrite every pixel through `map`
    pub fn remap(&mut self, map: impl Fn(PaletteIndex) -> PaletteIndex) {
        for pixel in &mut self.pixels {
            *pixel = map(*pixel);
        }
    }

    pub fn fill(&mut self, index: PaletteIndex) {
        self.pixels.fill(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_index_zero() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert!(buffer.iter().all(|index| index == 0));
        assert_eq!(buffer.rows().count(), 2);
    }

    #[test]
    fn test_bounds_checks() {
        let mut buffer = PixelBuffer::new(4, 3);
        buffer.set_pixel(3, 2, 7).unwrap();
        assert_eq!(buffer.get_pixel(3, 2).unwrap(), 7);
        assert_eq!(buffer.row(2).unwrap(), &[0, 0, 0, 7]);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3)] {
            assert!(matches!(
                buffer.set_pixel(x, y, 1),
                Err(ArtError::OutOfBounds { width: 4, height: 3, .. })
            ));
            assert!(buffer.get_pixel(x, y).is_err());
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buffer = PixelBuffer::new(2, 2);
        let copy = buffer.clone();
        buffer.set_pixel(0, 0, 5).unwrap();
        assert_eq!(copy.get_pixel(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_neighbours4() {
        let buffer = PixelBuffer::new(16, 16);
        assert_eq!(
            buffer.neighbours4(0, 0),
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
        assert_eq!(
            buffer.neighbours4(1, 1),
            vec![
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(0, 1),
                Position::new(2, 1)
            ]
        );
        assert_eq!(
            buffer.neighbours4(15, 15),
            vec![Position::new(15, 14), Position::new(14, 15)]
        );
        assert_eq!(buffer.neighbours4(1, 15).len(), 3);
    }

    #[test]
    fn test_neighbours_respect_non_square_grid() {
        let buffer = PixelBuffer::new(5, 2);
        assert_eq!(
            buffer.neighbours4(4, 1),
            vec![Position::new(4, 0), Position::new(3, 1)]
        );
    }

    #[test]
    fn test_from_rows_and_flat() {
        let buffer = PixelBuffer::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(buffer.get_pixel(0, 1).unwrap(), 3);
        assert!(PixelBuffer::from_rows(vec![vec![1, 2], vec![3]]).is_err());
        assert!(PixelBuffer::from_flat(2, 2, vec![0; 3]).is_err());
        assert_eq!(PixelBuffer::from_flat(2, 2, vec![1, 2, 3, 4]).unwrap(), buffer);
    }
}
