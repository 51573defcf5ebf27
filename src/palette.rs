use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::{ArtError, ArtResult};
use crate::pixels::PixelBuffer;

/// Index of a colour slot in a palette, stored per pixel
pub type PaletteIndex = u32;

/// Number of buckets hue and value are quantized into when sorting
const SORT_BUCKETS: i32 = 10;

/// Greyscale ramp every new document starts with
const GREYSCALE: [&str; 8] = [
    "#ffffff", "#e5e5e5", "#d5d5d5", "#c5c5c5", "#b5b5b5", "#a5a5a5", "#959595", "#858585",
];

/// An opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from channels normalized to `0.0..=1.0`
    pub fn from_normalized(r: f32, g: f32, b: f32) -> ArtResult<Self> {
        let channel = |value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok((value * 255.0).round() as u8)
            } else {
                Err(ArtError::InvalidColour(format!(
                    "channel {value} is outside 0.0..=1.0"
                )))
            }
        };
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }

    pub fn to_normalized(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    pub fn to_hex(self) -> String {
        to_hex(self.r as i32, self.g as i32, self.b as i32)
    }

    /// Hue, saturation and value, each in `0.0..=1.0`
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let (r, g, b) = self.to_normalized();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == min {
            return (0.0, 0.0, max);
        }
        let delta = max - min;
        let saturation = delta / max;
        let rc = (max - r) / delta;
        let gc = (max - g) / delta;
        let bc = (max - b) / delta;
        let hue = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        ((hue / 6.0).rem_euclid(1.0), saturation, max)
    }

    /// Perceived brightness, `sqrt(0.241 R + 0.691 G + 0.068 B)` on normalized channels
    pub fn luminance(self) -> f32 {
        let (r, g, b) = self.to_normalized();
        (0.241 * r + 0.691 * g + 0.068 * b).sqrt()
    }

    /// Key that walks hue buckets back and forth so neighbouring colours stay close
    fn perceptual_key(self) -> (i32, f32, i32) {
        let (hue, _, value) = self.to_hsv();
        let hue_bucket = (hue * SORT_BUCKETS as f32) as i32;
        let mut value_bucket = (value * SORT_BUCKETS as f32) as i32;
        let mut luminance = self.luminance();
        if hue_bucket % 2 == 1 {
            value_bucket = SORT_BUCKETS - value_bucket;
            luminance = SORT_BUCKETS as f32 - luminance;
        }
        (hue_bucket, luminance, value_bucket)
    }

    fn perceptual_cmp(self, other: Self) -> Ordering {
        let (h1, l1, v1) = self.perceptual_key();
        let (h2, l2, v2) = other.perceptual_key();
        h1.cmp(&h2)
            .then(l1.total_cmp(&l2))
            .then(v1.cmp(&v2))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Colour {
    type Err = ArtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_hex(s)
    }
}

/// Format a colour as `#rrggbb`, clamping each channel into `0..=255` first
pub fn to_hex(r: i32, g: i32, b: i32) -> String {
    let clamp = |c: i32| c.clamp(0, 255);
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// Parse a `#rrggbb` string (case-insensitive)
pub fn from_hex(hex: &str) -> ArtResult<Colour> {
    let invalid = || ArtError::InvalidColour(hex.to_owned());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 7 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };
    Ok(Colour::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Ordered association of palette indices to colours.
///
/// Indices always run `0..len` in insertion order, which is the order they
/// are written out in. New slots can only be appended at `len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<(PaletteIndex, Colour)>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::greyscale()
    }
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The default eight entry ramp from white down to mid grey
    pub fn greyscale() -> Self {
        Self::from_colours(GREYSCALE.iter().filter_map(|hex| from_hex(hex).ok()))
    }

    /// Assign colours to indices `0..n` in iteration order
    pub fn from_colours(colours: impl IntoIterator<Item = Colour>) -> Self {
        Self {
            entries: colours
                .into_iter()
                .enumerate()
                .map(|(index, colour)| (index as PaletteIndex, colour))
                .collect(),
        }
    }

    /// Parse a list of hex strings into indices `0..n`
    pub fn from_hex_list<S: AsRef<str>>(colours: &[S]) -> ArtResult<Self> {
        let parsed = colours
            .iter()
            .map(|hex| from_hex(hex.as_ref().trim()))
            .collect::<ArtResult<Vec<_>>>()?;
        Ok(Self::from_colours(parsed))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: PaletteIndex) -> bool {
        self.entries.iter().any(|(i, _)| *i == index)
    }

    pub fn get(&self, index: PaletteIndex) -> ArtResult<Colour> {
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, colour)| *colour)
            .ok_or(ArtError::IndexNotFound(index))
    }

    /// Overwrite the colour at `index`, or append it when `index == len()`.
    ///
    /// Any other index fails with [`ArtError::IndexNotFound`].
    pub fn set(&mut self, index: PaletteIndex, colour: Colour) -> ArtResult<()> {
        let len = self.entries.len();
        match self.entries.iter_mut().find(|(i, _)| *i == index) {
            Some(entry) => entry.1 = colour,
            None if index as usize == len => self.entries.push((index, colour)),
            None => return Err(ArtError::IndexNotFound(index)),
        }
        Ok(())
    }

    /// True when the indices are exactly `0..len` in order
    pub fn is_contiguous(&self) -> bool {
        self.indices()
            .enumerate()
            .all(|(position, index)| index as usize == position)
    }

    /// Like [`Palette::set`], parsing the colour from a `#rrggbb` string
    pub fn set_hex(&mut self, index: PaletteIndex, hex: &str) -> ArtResult<()> {
        let colour = from_hex(hex)?;
        self.set(index, colour)
    }

    /// Indices in insertion order
    pub fn indices(&self) -> impl Iterator<Item = PaletteIndex> + '_ {
        self.entries.iter().map(|(index, _)| *index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, Colour)> + '_ {
        self.entries.iter().copied()
    }

    /// Overwrite indices `0..k` with `colours`, leaving every other entry alone.
    ///
    /// All colours are parsed before anything is written.
    pub fn replace_prefix<S: AsRef<str>>(&mut self, colours: &[S]) -> ArtResult<()> {
        let replacement = Self::from_hex_list(colours)?;
        for (index, colour) in replacement.iter() {
            self.set(index, colour)?;
        }
        Ok(())
    }

    /// Give every existing entry a random colour
    pub fn randomize(&mut self) {
        let mut rng = rand::rng();
        for (_, colour) in &mut self.entries {
            *colour = Colour::new(rng.random(), rng.random(), rng.random());
        }
    }

    /// Reorder colours so visually similar ones sit next to each other.
    ///
    /// Index slots stay in place; the colours move between them. Every pixel
    /// in `pixels` is remapped so it keeps showing the same colour. Pixels
    /// whose index is not in the palette are left alone.
    pub fn sort_by_perceptual_order(&mut self, pixels: &mut PixelBuffer) {
        let mut sorted: Vec<Colour> = self.entries.iter().map(|(_, c)| *c).collect();
        sorted.sort_by(|a, b| a.perceptual_cmp(*b));

        let new_entries: Vec<(PaletteIndex, Colour)> = self
            .entries
            .iter()
            .zip(sorted)
            .map(|((index, _), colour)| (*index, colour))
            .collect();

        // Old indices claim matching new slots in their original order, so
        // duplicate colours map one to one.
        let mut claimed = vec![false; new_entries.len()];
        let mut remap: Vec<(PaletteIndex, PaletteIndex)> = Vec::with_capacity(self.entries.len());
        for (old_index, colour) in &self.entries {
            let slot = new_entries
                .iter()
                .enumerate()
                .position(|(slot, (_, c))| !claimed[slot] && c == colour);
            if let Some(slot) = slot {
                claimed[slot] = true;
                remap.push((*old_index, new_entries[slot].0));
            }
        }

        pixels.remap(|index| {
            remap
                .iter()
                .find(|(old, _)| *old == index)
                .map_or(index, |(_, new)| *new)
        });
        self.entries = new_entries;
        log::debug!("Sorted palette of {} colours", self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_clamps() {
        assert_eq!(to_hex(300, -5, 16), "#ff0010");
        assert_eq!(from_hex(&to_hex(300, -5, 16)).unwrap(), Colour::new(255, 0, 16));
        for (r, g, b) in [(0, 0, 0), (255, 255, 255), (1, 128, 254), (-1, 256, 1000)] {
            let colour = from_hex(&to_hex(r, g, b)).unwrap();
            assert_eq!(
                (colour.r as i32, colour.g as i32, colour.b as i32),
                (r.clamp(0, 255), g.clamp(0, 255), b.clamp(0, 255))
            );
        }
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(from_hex("#ABCdef").unwrap(), Colour::new(0xab, 0xcd, 0xef));
        for bad in ["", "#fff", "ffffff", "#fffffff", "#gg0000", "#+10000", "##12345"] {
            assert!(
                matches!(from_hex(bad), Err(ArtError::InvalidColour(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalized_colour() {
        assert_eq!(
            Colour::from_normalized(1.0, 0.0, 0.5).unwrap(),
            Colour::new(255, 0, 128)
        );
        assert!(Colour::from_normalized(1.5, 0.0, 0.0).is_err());
        assert!(Colour::from_normalized(f32::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_greyscale_default() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 8);
        assert_eq!(palette.get(0).unwrap(), Colour::new(255, 255, 255));
        assert_eq!(palette.get(7).unwrap().to_hex(), "#858585");
        assert!(matches!(palette.get(8), Err(ArtError::IndexNotFound(8))));
    }

    #[test]
    fn test_set_appends_or_overwrites() {
        let mut palette = Palette::empty();
        palette.set(0, Colour::new(1, 1, 1)).unwrap();
        palette.set(1, Colour::new(2, 2, 2)).unwrap();
        palette.set(0, Colour::new(3, 3, 3)).unwrap();
        assert_eq!(palette.indices().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(palette.get(0).unwrap(), Colour::new(3, 3, 3));
        assert!(palette.is_contiguous());

        assert!(matches!(
            palette.set(5, Colour::new(4, 4, 4)),
            Err(ArtError::IndexNotFound(5))
        ));
        assert!(palette.set_hex(1, "nope").is_err());
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1).unwrap(), Colour::new(2, 2, 2));
    }

    #[test]
    fn test_replace_prefix_keeps_tail() {
        let mut palette = Palette::greyscale();
        palette.replace_prefix(&["#ff0000", "#00ff00"]).unwrap();
        assert_eq!(palette.get(0).unwrap(), Colour::new(255, 0, 0));
        assert_eq!(palette.get(1).unwrap(), Colour::new(0, 255, 0));
        assert_eq!(palette.get(2).unwrap().to_hex(), "#d5d5d5");
        assert_eq!(palette.len(), 8);

        let before = palette.clone();
        assert!(palette.replace_prefix(&["#000000", "bad"]).is_err());
        assert_eq!(palette, before);
    }

    #[test]
    fn test_replace_prefix_grows_palette() {
        let mut palette = Palette::from_hex_list(&["#000000"]).unwrap();
        palette.replace_prefix(&["#111111", "#222222", "#333333"]).unwrap();
        assert_eq!(palette.len(), 3);
        assert!(palette.is_contiguous());
        assert_eq!(palette.get(2).unwrap(), Colour::new(0x33, 0x33, 0x33));
    }

    #[test]
    fn test_hsv() {
        assert_eq!(Colour::new(255, 0, 0).to_hsv(), (0.0, 1.0, 1.0));
        let (h, s, v) = Colour::new(0, 0, 255).to_hsv();
        assert!((h - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!((s, v), (1.0, 1.0));
        assert_eq!(Colour::new(128, 128, 128).to_hsv().1, 0.0);
    }

    #[test]
    fn test_sort_keeps_pixel_appearance() {
        let mut palette = Palette::from_hex_list(&[
            "#ffffff", "#000000", "#ff0000", "#808080", "#0000ff",
        ])
        .unwrap();
        let mut pixels = PixelBuffer::new(5, 1);
        for x in 0..5 {
            pixels.set_pixel(x, 0, x as PaletteIndex).unwrap();
        }
        let before: Vec<Colour> = pixels
            .iter()
            .map(|index| palette.get(index).unwrap())
            .collect();

        palette.sort_by_perceptual_order(&mut pixels);

        let after: Vec<Colour> = pixels
            .iter()
            .map(|index| palette.get(index).unwrap())
            .collect();
        assert_eq!(before, after);
        assert_eq!(palette.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        // Greys share hue bucket 0 and ascend by luminance
        assert_eq!(palette.get(0).unwrap(), Colour::new(0, 0, 0));
    }

    #[test]
    fn test_sort_duplicates_map_one_to_one() {
        let mut palette =
            Palette::from_hex_list(&["#ffffff", "#000000", "#ffffff"]).unwrap();
        let mut pixels = PixelBuffer::new(3, 1);
        pixels.set_pixel(1, 0, 1).unwrap();
        pixels.set_pixel(2, 0, 2).unwrap();

        palette.sort_by_perceptual_order(&mut pixels);

        assert_eq!(palette.get(0).unwrap(), Colour::new(0, 0, 0));
        // old 0 claims the first white slot, old 2 the second
        assert_eq!(pixels.iter().collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn test_randomize_keeps_indices() {
        let mut palette = Palette::greyscale();
        palette.randomize();
        assert_eq!(palette.indices().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    }
}
