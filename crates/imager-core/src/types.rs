//! Shared types for the imager editing core.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::history::MAX_HISTORY;

/// Re-export `RgbImage` so downstream crates can hand decoded images
/// to the core without depending on `image` directly.
pub use image::RgbImage;

/// An RGB color value.
///
/// Each channel is an 8-bit intensity, so any `Pixel` that exists is
/// valid. Untyped channel values (for example from a script or a
/// foreign API) go through [`Pixel::try_new`], which rejects anything
/// outside `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    /// Red intensity.
    pub red: u8,
    /// Green intensity.
    pub green: u8,
    /// Blue intensity.
    pub blue: u8,
}

impl Pixel {
    /// Pure red, the color of the jail bars.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a new pixel from 8-bit channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a pixel from wide integer channels.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidPixel`] if any channel is outside
    /// `0..=255`.
    pub fn try_new(red: i64, green: i64, blue: i64) -> Result<Self, ImagerError> {
        let invalid = || ImagerError::InvalidPixel { red, green, blue };
        Ok(Self {
            red: u8::try_from(red).map_err(|_| invalid())?,
            green: u8::try_from(green).map_err(|_| invalid())?,
            blue: u8::try_from(blue).map_err(|_| invalid())?,
        })
    }

    /// The channels as an `[r, g, b]` array.
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(pixel: Pixel) -> Self {
        pixel.channels()
    }
}

impl From<image::Rgb<u8>> for Pixel {
    fn from(rgb: image::Rgb<u8>) -> Self {
        Self::from(rgb.0)
    }
}

impl From<Pixel> for image::Rgb<u8> {
    fn from(pixel: Pixel) -> Self {
        Self(pixel.channels())
    }
}

impl TryFrom<(i64, i64, i64)> for Pixel {
    type Error = ImagerError;

    fn try_from((red, green, blue): (i64, i64, i64)) -> Result<Self, Self::Error> {
        Self::try_new(red, green, blue)
    }
}

/// Formats as a tuple, e.g. `(255, 0, 0)`.
impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Configuration for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept in the edit history, including
    /// the current one. Must be at least 1.
    pub max_history: usize,
}

impl EditorConfig {
    /// Default history bound.
    pub const DEFAULT_MAX_HISTORY: usize = MAX_HISTORY;
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: Self::DEFAULT_MAX_HISTORY,
        }
    }
}

/// Errors raised by the editing core.
///
/// Every variant is a precondition violation reported synchronously at
/// the offending call; no buffer is left partially modified.
#[derive(Debug, thiserror::Error)]
pub enum ImagerError {
    /// A channel value outside `0..=255`.
    #[error("({red}, {green}, {blue}) is not a pixel: channels must be in 0..=255")]
    InvalidPixel {
        /// Offending red value.
        red: i64,
        /// Offending green value.
        green: i64,
        /// Offending blue value.
        blue: i64,
    },

    /// A flat index past the end of the pixel data.
    #[error("index {index} is out of range for {len} pixels")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pixels in the buffer.
        len: usize,
    },

    /// A `(row, col)` position outside the image.
    #[error("position ({row}, {col}) is outside a {height}-row by {width}-column image")]
    PositionOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Image height (rows).
        height: usize,
        /// Image width (columns).
        width: usize,
    },

    /// A width or height that is zero or does not divide the pixel count.
    #[error("{value} does not evenly divide the {len} pixels in the image")]
    InvalidDimension {
        /// Requested width or height.
        value: usize,
        /// Number of pixels in the buffer.
        len: usize,
    },

    /// The initial pixel data or width was rejected.
    #[error("cannot construct pixel buffer: {0}")]
    Construction(String),

    /// A filter or configuration argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Failed to encode the output image.
    #[error("failed to encode image: {0}")]
    ImageEncode(String),
}
