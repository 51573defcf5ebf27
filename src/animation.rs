use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::Frame;

use crate::error::{ArtError, ArtResult};

/// An ordered list of frame images played in a loop
#[derive(Debug, Clone, Default)]
pub struct Animation {
    frames: Vec<PathBuf>,
    current: Option<usize>,
}

impl Animation {
    pub fn new<P: Into<PathBuf>>(frames: impl IntoIterator<Item = P>) -> Self {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            current: None,
        }
    }

    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame last returned by [`Animation::next_frame`]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Advance the cursor, wrapping at the end, and return that frame.
    ///
    /// The first call returns frame 0.
    pub fn next_frame(&mut self) -> ArtResult<&Path> {
        if self.frames.is_empty() {
            return Err(ArtError::EmptySequence);
        }
        let next = match self.current {
            None => 0,
            Some(current) => (current + 1) % self.frames.len(),
        };
        self.current = Some(next);
        Ok(&self.frames[next])
    }

    /// Forget the cursor so the next call starts at frame 0 again
    pub fn rewind(&mut self) {
        self.current = None;
    }

    /// Decode every frame in order and write them as one looping GIF.
    ///
    /// Frames keep the encoder's default timing.
    pub fn export_as_gif(&self, path: impl AsRef<Path>) -> ArtResult<()> {
        if self.frames.is_empty() {
            return Err(ArtError::EmptySequence);
        }
        let frames = self
            .frames
            .iter()
            .map(|frame| -> ArtResult<Frame> { Ok(Frame::new(image::open(frame)?.to_rgba8())) })
            .collect::<ArtResult<Vec<_>>>()?;

        let path = path.as_ref();
        let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(frames)?;
        log::info!(
            "Exported {} frame animation to {}",
            self.frames.len(),
            path.display()
        );
        Ok(())
    }
}
