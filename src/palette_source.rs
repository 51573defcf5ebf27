use std::fs;
use std::path::Path;

use crate::error::{ArtError, ArtResult};

/// Something that can turn a source identifier into an ordered list of hex colours
pub trait PaletteSource {
    /// Return true if this source understands `source`
    fn accepts(&self, source: &str) -> bool;

    /// Fetch the colours, failing with [`ArtError::UnsupportedSource`] if
    /// `source` is not one this provider handles
    fn fetch(&self, source: &str) -> ArtResult<Vec<String>>;
}

/// Comma separated colours given inline: `list:#170900,#bb00ff`
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSource;

impl ListSource {
    pub const PREFIX: &'static str = "list:";

    /// Split a comma separated list, trimming blanks
    pub fn split(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|colour| !colour.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl PaletteSource for ListSource {
    fn accepts(&self, source: &str) -> bool {
        source.starts_with(Self::PREFIX)
    }

    fn fetch(&self, source: &str) -> ArtResult<Vec<String>> {
        let list = source
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| ArtError::UnsupportedSource(source.to_owned()))?;
        Ok(Self::split(list))
    }
}

/// The palette line of a saved art file: `file:path/to/art.pxlart`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    pub const PREFIX: &'static str = "file:";
}

impl PaletteSource for FileSource {
    fn accepts(&self, source: &str) -> bool {
        source.starts_with(Self::PREFIX)
    }

    fn fetch(&self, source: &str) -> ArtResult<Vec<String>> {
        let path = source
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| ArtError::UnsupportedSource(source.to_owned()))?;
        let text = fs::read_to_string(Path::new(path))?;
        text.lines()
            .filter_map(|line| line.split_once(", "))
            .find(|(key, _)| key.trim() == "palette")
            .map(|(_, colours)| colours.split_whitespace().map(str::to_owned).collect())
            .ok_or_else(|| ArtError::MalformedDocument(format!("{path} has no palette line")))
    }
}

/// Tries each source in turn, using the first that accepts the identifier
pub struct SourceChain {
    sources: Vec<Box<dyn PaletteSource>>,
}

impl std::fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceChain")
            .field("sources", &format!("<{} sources>", self.sources.len()))
            .finish()
    }
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new()
            .with(Box::new(ListSource))
            .with(Box::new(FileSource))
    }
}

impl SourceChain {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with(mut self, source: Box<dyn PaletteSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl PaletteSource for SourceChain {
    fn accepts(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s.accepts(source))
    }

    fn fetch(&self, source: &str) -> ArtResult<Vec<String>> {
        self.sources
            .iter()
            .find(|s| s.accepts(source))
            .ok_or_else(|| ArtError::UnsupportedSource(source.to_owned()))?
            .fetch(source)
    }
}
