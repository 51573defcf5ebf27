use std::collections::HashMap;
use std::fs;
use std::path::Path;

use image::error::{ImageError, LimitError, LimitErrorKind};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{ArtError, ArtResult};
use crate::palette::{Palette, PaletteIndex};
use crate::palette_source::ListSource;
use crate::pixels::PixelBuffer;

/// File extension used for saved artwork
pub const FILE_EXTENSION: &str = "pxlart";

/// Default canvas edge length
pub const DEFAULT_SIZE: usize = 16;

/// Largest RGBA buffer `rasterize` will allocate, matching `image`'s default limit
pub const MAX_RASTER_BYTES: u64 = 512 * 1024 * 1024;

const KEY_SIZE: &str = "size";
const KEY_PALETTE: &str = "palette";
const KEY_PIXELS: &str = "pixels";

/// A square indexed-colour image and the palette it draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDocument {
    palette: Palette,
    pixels: PixelBuffer,
}

impl Default for ArtDocument {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl ArtDocument {
    /// A `size` x `size` canvas of index 0 with the greyscale palette.
    ///
    /// A size of 0 is raised to 1.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            palette: Palette::greyscale(),
            pixels: PixelBuffer::new(size, size),
        }
    }

    /// Assemble a document, checking the canvas is square and every pixel
    /// has a palette entry
    pub fn from_parts(palette: Palette, pixels: PixelBuffer) -> ArtResult<Self> {
        if pixels.is_empty() {
            return Err(ArtError::MalformedDocument("canvas is empty".to_owned()));
        }
        if pixels.width() != pixels.height() {
            return Err(ArtError::MalformedDocument(format!(
                "canvas must be square, got {}x{}",
                pixels.width(),
                pixels.height()
            )));
        }
        check_coverage(&palette, &pixels)?;
        Ok(Self { palette, pixels })
    }

    pub fn size(&self) -> usize {
        self.pixels.width()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.pixels
    }

    /// Swap in a new pixel grid, e.g. an undo snapshot
    pub fn replace_pixels(&mut self, pixels: PixelBuffer) -> PixelBuffer {
        std::mem::replace(&mut self.pixels, pixels)
    }

    pub fn replace_palette(&mut self, palette: Palette) -> Palette {
        std::mem::replace(&mut self.palette, palette)
    }

    /// Overwrite the first palette slots from a comma separated hex list.
    ///
    /// Nothing changes unless every colour parses.
    pub fn palette_from_list(&mut self, list: &str) -> ArtResult<()> {
        let colours = ListSource::split(list);
        self.palette.replace_prefix(colours.as_slice())
    }

    /// Sort the palette perceptually, remapping pixels so nothing changes on screen
    pub fn sort_palette(&mut self) {
        self.palette.sort_by_perceptual_order(&mut self.pixels);
    }

    /// Parse the `key, value` text format
    pub fn parse(text: &str) -> ArtResult<Self> {
        let components = split_components(text)?;
        let value = |key: &str| {
            components
                .get(key)
                .copied()
                .ok_or_else(|| ArtError::MalformedDocument(format!("missing '{key}' line")))
        };

        let size: usize = value(KEY_SIZE)?
            .parse()
            .map_err(|_| ArtError::MalformedDocument("size is not a number".to_owned()))?;
        if size == 0 {
            return Err(ArtError::MalformedDocument("size must be at least 1".to_owned()));
        }

        let palette = parse_palette(value(KEY_PALETTE)?)?;

        let pixels = value(KEY_PIXELS)?
            .split_whitespace()
            .map(|pixel| {
                pixel.parse::<PaletteIndex>().map_err(|_| {
                    ArtError::MalformedDocument(format!("'{pixel}' is not a palette index"))
                })
            })
            .collect::<ArtResult<Vec<_>>>()?;
        let pixels = PixelBuffer::from_flat(size, size, pixels)?;

        Self::from_parts(palette, pixels)
    }

    /// Render to the `key, value` text format.
    ///
    /// The palette line is positional, so a palette whose indices are not
    /// `0..n` in order is refused.
    pub fn to_text(&self) -> ArtResult<String> {
        if !self.palette.is_contiguous() {
            return Err(ArtError::MalformedDocument(
                "palette indices must run 0..n to be saved".to_owned(),
            ));
        }
        let palette = self
            .palette
            .iter()
            .map(|(_, colour)| colour.to_hex())
            .collect::<Vec<_>>()
            .join(" ");
        let pixels = self
            .pixels
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(format!(
            "{KEY_SIZE}, {}\n{KEY_PALETTE}, {palette}\n{KEY_PIXELS}, {pixels}\n",
            self.size()
        ))
    }

    pub fn load(path: impl AsRef<Path>) -> ArtResult<Self> {
        let path = path.as_ref();
        let document = Self::parse(&fs::read_to_string(path)?)?;
        log::info!(
            "Loaded {}x{} art from {}",
            document.size(),
            document.size(),
            path.display()
        );
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ArtResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_text()?)?;
        log::info!("Saved art to {}", path.display());
        Ok(())
    }

    /// Replace the palette with the one stored in another art file.
    ///
    /// Only the `palette` line is read. Pixels are left as they are, so the
    /// new palette must have an entry for every index in use; otherwise the
    /// current palette is kept.
    pub fn load_palette_from_file(&mut self, path: impl AsRef<Path>) -> ArtResult<()> {
        let text = fs::read_to_string(path.as_ref())?;
        let components = split_components(&text)?;
        let line = components.get(KEY_PALETTE).ok_or_else(|| {
            ArtError::MalformedDocument(format!("missing '{KEY_PALETTE}' line"))
        })?;
        let palette = parse_palette(line)?;
        check_coverage(&palette, &self.pixels)?;
        self.palette = palette;
        log::info!(
            "Loaded {} colour palette from {}",
            self.palette.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Draw the canvas into an RGBA image, each pixel a `scale` x `scale` block.
    ///
    /// Pixels equal to `transparent` are left fully transparent. A scale of 0
    /// is treated as 1. Images that would not fit in [`MAX_RASTER_BYTES`]
    /// fail with a limits error.
    pub fn rasterize(&self, scale: u32, transparent: Option<PaletteIndex>) -> ArtResult<RgbaImage> {
        let scale = scale.max(1);
        let (width, height) = raster_dimensions(&self.pixels, scale)?;
        let mut image = RgbaImage::new(width, height);

        for (y, row) in self.pixels.rows().enumerate() {
            for (x, &index) in row.iter().enumerate() {
                if Some(index) == transparent {
                    continue;
                }
                let colour = self.palette.get(index)?;
                let rgba = Rgba([colour.r, colour.g, colour.b, u8::MAX]);
                for dy in 0..scale {
                    for dx in 0..scale {
                        image.put_pixel(x as u32 * scale + dx, y as u32 * scale + dy, rgba);
                    }
                }
            }
        }
        Ok(image)
    }

    /// Export as an image file, picking the format from the extension.
    ///
    /// Formats without an alpha channel get an opaque image and ignore
    /// `transparent`.
    pub fn export_to_image_file(
        &self,
        path: impl AsRef<Path>,
        scale: u32,
        transparent: Option<PaletteIndex>,
    ) -> ArtResult<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        if supports_alpha(format) {
            self.rasterize(scale, transparent)?
                .save_with_format(path, format)?;
        } else {
            if transparent.is_some() {
                log::warn!(
                    "{format:?} has no alpha channel, exporting {} opaque",
                    path.display()
                );
            }
            let image = DynamicImage::ImageRgba8(self.rasterize(scale, None)?);
            image.to_rgb8().save_with_format(path, format)?;
        }
        log::info!("Exported art to {}", path.display());
        Ok(())
    }
}

/// Whether exported images of `format` keep transparent pixels
pub fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Pnm
    )
}

fn check_coverage(palette: &Palette, pixels: &PixelBuffer) -> ArtResult<()> {
    match pixels.iter().find(|index| !palette.contains(*index)) {
        Some(index) => Err(ArtError::MalformedDocument(format!(
            "pixel index {index} has no palette entry"
        ))),
        None => Ok(()),
    }
}

fn raster_dimensions(pixels: &PixelBuffer, scale: u32) -> ArtResult<(u32, u32)> {
    let too_large = || {
        ArtError::Image(ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::DimensionError,
        )))
    };
    let scaled = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(scale))
            .ok_or_else(too_large)
    };
    let width = scaled(pixels.width())?;
    let height = scaled(pixels.height())?;

    let bytes = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|area| area.checked_mul(4));
    match bytes {
        Some(bytes) if bytes <= MAX_RASTER_BYTES => Ok((width, height)),
        _ => Err(ArtError::Image(ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::InsufficientMemory,
        )))),
    }
}

/// Split lines on their first `", "`; later duplicates win and blank lines are skipped
fn split_components(text: &str) -> ArtResult<HashMap<&str, &str>> {
    let mut components = HashMap::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once(", ").ok_or_else(|| {
            ArtError::MalformedDocument(format!("line {} has no ', ' separator", number + 1))
        })?;
        components.insert(key.trim(), value.trim());
    }
    Ok(components)
}

fn parse_palette(line: &str) -> ArtResult<Palette> {
    let colours: Vec<&str> = line.split_whitespace().collect();
    Palette::from_hex_list(colours.as_slice())
        .map_err(|e| ArtError::MalformedDocument(format!("bad palette: {e}")))
}
