//! Image sources: where encoded bytes come from.
//!
//! A source can report its dimensions without materializing pixels, decode
//! itself at a given sample size, and read its EXIF orientation. Files and
//! in-memory buffers are supported; the content loader that decides where
//! the bytes come from is outside this crate.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};

use image::ImageReader;

use super::orientation::read_orientation;
use super::subsample::subsample;
use super::{DecodeBounds, DecodeError, Orientation, RasterImage, SampleSize};

/// Capability to probe and decode an encoded image.
pub trait ImageSource {
    /// Human-readable identifier used in log messages.
    fn describe(&self) -> String;

    /// Read the source dimensions without decoding pixels.
    fn probe(&self) -> Result<DecodeBounds, DecodeError>;

    /// Decode the image, downsampled by `sample_size`.
    fn decode(&self, sample_size: SampleSize) -> Result<RasterImage, DecodeError>;

    /// Read the EXIF orientation tag.
    ///
    /// A source without EXIF data reports `Orientation::Normal`; an error is
    /// returned only when the metadata exists but cannot be read.
    fn read_orientation(&self) -> Result<Orientation, DecodeError>;
}

/// An image stored on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<BufReader<File>, DecodeError> {
        File::open(&self.path)
            .map(BufReader::new)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DecodeError::NotFound(self.path.display().to_string()),
                _ => DecodeError::Io(format!("{}: {e}", self.path.display())),
            })
    }
}

impl ImageSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn probe(&self) -> Result<DecodeBounds, DecodeError> {
        probe_reader(self.open()?)
    }

    fn decode(&self, sample_size: SampleSize) -> Result<RasterImage, DecodeError> {
        decode_reader(self.open()?, sample_size)
    }

    fn read_orientation(&self) -> Result<Orientation, DecodeError> {
        let mut reader = self.open()?;
        read_orientation(&mut reader)
    }
}

/// Encoded image bytes already held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    label: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: "<memory>".to_string(),
            bytes: bytes.into(),
        }
    }

    /// Attach a label (for example a cache key) used in log messages.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn cursor(&self) -> Result<Cursor<&[u8]>, DecodeError> {
        if self.bytes.is_empty() {
            return Err(DecodeError::InvalidArgument(format!(
                "{}: empty image buffer",
                self.label
            )));
        }
        Ok(Cursor::new(self.bytes.as_slice()))
    }
}

impl ImageSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} ({} bytes)", self.label, self.bytes.len())
    }

    fn probe(&self) -> Result<DecodeBounds, DecodeError> {
        probe_reader(self.cursor()?)
    }

    fn decode(&self, sample_size: SampleSize) -> Result<RasterImage, DecodeError> {
        decode_reader(self.cursor()?, sample_size)
    }

    fn read_orientation(&self) -> Result<Orientation, DecodeError> {
        let mut cursor = self.cursor()?;
        read_orientation(&mut cursor)
    }
}

fn probe_reader<R: BufRead + Seek>(reader: R) -> Result<DecodeBounds, DecodeError> {
    let (width, height) = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(e.to_string()))?
        .into_dimensions()
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(DecodeError::DecodeFailure(format!(
            "source reports empty dimensions {width}x{height}"
        )));
    }
    Ok(DecodeBounds::new(width, height))
}

fn decode_reader<R: BufRead + Seek>(
    reader: R,
    sample_size: SampleSize,
) -> Result<RasterImage, DecodeError> {
    let decoded = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(e.to_string()))?
        .decode()
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))?;

    RasterImage::from_rgba8(subsample(decoded.into_rgba8(), sample_size))
        .map_err(|e| DecodeError::DecodeFailure(e.to_string()))
}
