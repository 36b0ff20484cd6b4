//! Error types for page segmentation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for segmentation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, segmenting or saving a page.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The page image could not be read or decoded.
    #[error("Could not read the image at {}: {source}", path.display())]
    Load {
        /// Path of the page that failed to load
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// An emitted block could not be encoded or written.
    #[error("Could not write block to {}: {source}", path.display())]
    Save {
        /// Destination path of the block
        path: PathBuf,
        /// Encoder error
        #[source]
        source: image::ImageError,
    },

    /// The page has a zero dimension.
    #[error("Empty input: page is {width}x{height}")]
    EmptyInput {
        /// Page width in pixels
        width: usize,
        /// Page height in pixels
        height: usize,
    },

    /// A raw sample buffer does not match the declared dimensions.
    #[error("Buffer holds {actual} samples, expected {expected}")]
    BufferSize {
        /// width * height
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },

    /// Two grids that must share dimensions do not.
    #[error("Dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        /// (width, height) of the reference grid
        expected: (usize, usize),
        /// (width, height) of the offending grid
        actual: (usize, usize),
    },

    /// The segmentation configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors that only affect a single page of a batch.
    pub fn is_page_local(&self) -> bool {
        !matches!(self, Error::InvalidConfig(_))
    }
}
