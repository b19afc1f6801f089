//! Per-pixel color transforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::types::{ImagerError, Pixel};

/// Output tone for [`monochromify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Equal channels: `(b, b, b)`.
    #[default]
    Greyscale,
    /// Warm brown: `(b, 0.6 b, 0.4 b)`.
    Sepia,
}

impl Tone {
    /// Every tone, in declaration order.
    pub const ALL: [Self; 2] = [Self::Greyscale, Self::Sepia];

    /// Lowercase token used in scripts and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Greyscale => "greyscale",
            Self::Sepia => "sepia",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tone {
    type Err = ImagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.name() == s)
            .ok_or_else(|| ImagerError::InvalidArgument(format!("unknown tone: {s:?}")))
    }
}

/// Replace every channel `c` with `255 - c`.
pub fn invert(buffer: &mut PixelBuffer) {
    for pixel in buffer.pixels_mut() {
        *pixel = Pixel::new(255 - pixel.red, 255 - pixel.green, 255 - pixel.blue);
    }
}

/// Perceived brightness, `0.3 r + 0.6 g + 0.1 b`.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn brightness(pixel: Pixel) -> f64 {
    0.3 * f64::from(pixel.red) + 0.6 * f64::from(pixel.green) + 0.1 * f64::from(pixel.blue)
}

/// Convert every pixel to a single-hue rendition of its brightness.
///
/// Channels are truncated toward zero, never rounded: `(200, 100, 50)`
/// has brightness 125.0 and becomes `(125, 125, 125)` in greyscale or
/// `(125, 75, 50)` in sepia.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn monochromify(buffer: &mut PixelBuffer, tone: Tone) {
    for pixel in buffer.pixels_mut() {
        let b = brightness(*pixel);
        *pixel = match tone {
            Tone::Greyscale => {
                let level = b as u8;
                Pixel::new(level, level, level)
            }
            Tone::Sepia => Pixel::new(b as u8, (0.6 * b) as u8, (0.4 * b) as u8),
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn single(pixel: Pixel) -> PixelBuffer {
        PixelBuffer::new(vec![pixel], 1).unwrap()
    }

    // --- invert tests ---

    #[test]
    fn invert_complements_channels() {
        let mut buffer = single(Pixel::new(0, 100, 255));
        invert(&mut buffer);
        assert_eq!(buffer.get(0).unwrap(), Pixel::new(255, 155, 0));
    }

    #[test]
    fn invert_twice_is_identity() {
        let original = PixelBuffer::from_fn(5, 3, |row, col| {
            Pixel::new(
                u8::try_from(row * 40).unwrap(),
                u8::try_from(col * 50).unwrap(),
                u8::try_from(row * col).unwrap(),
            )
        })
        .unwrap();
        let mut buffer = original.clone();
        invert(&mut buffer);
        assert_ne!(buffer, original);
        invert(&mut buffer);
        assert_eq!(buffer, original);
    }

    // --- monochromify tests ---

    #[test]
    fn brightness_weights_channels() {
        assert!((brightness(Pixel::new(200, 100, 50)) - 125.0).abs() < f64::EPSILON);
        assert!((brightness(Pixel::WHITE) - 255.0).abs() < 1e-9);
        assert!(brightness(Pixel::BLACK).abs() < f64::EPSILON);
    }

    #[test]
    fn greyscale_scenario() {
        let mut buffer = single(Pixel::new(200, 100, 50));
        monochromify(&mut buffer, Tone::Greyscale);
        assert_eq!(buffer.get(0).unwrap(), Pixel::new(125, 125, 125));
    }

    #[test]
    fn sepia_scenario() {
        let mut buffer = single(Pixel::new(200, 100, 50));
        monochromify(&mut buffer, Tone::Sepia);
        assert_eq!(buffer.get(0).unwrap(), Pixel::new(125, 75, 50));
    }

    #[test]
    fn greyscale_truncates_instead_of_rounding() {
        // 0.3 * 1 + 0.6 * 1 + 0.1 * 8 = 1.7
        let mut buffer = single(Pixel::new(1, 1, 8));
        monochromify(&mut buffer, Tone::Greyscale);
        assert_eq!(buffer.get(0).unwrap(), Pixel::new(1, 1, 1));
    }

    #[test]
    fn greyscale_output_has_equal_channels() {
        let mut buffer = PixelBuffer::from_fn(4, 4, |row, col| {
            Pixel::new(
                u8::try_from(row * 60).unwrap(),
                u8::try_from(col * 70).unwrap(),
                33,
            )
        })
        .unwrap();
        monochromify(&mut buffer, Tone::Greyscale);
        for pixel in buffer.data() {
            assert_eq!(pixel.red, pixel.green);
            assert_eq!(pixel.green, pixel.blue);
        }
    }

    // --- Tone tests ---

    #[test]
    fn tone_parses_names() {
        assert_eq!("greyscale".parse::<Tone>().unwrap(), Tone::Greyscale);
        assert_eq!("sepia".parse::<Tone>().unwrap(), Tone::Sepia);
        assert!("purple".parse::<Tone>().is_err());
    }

    #[test]
    fn tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Sepia).unwrap(), "\"sepia\"");
        let tone: Tone = serde_json::from_str("\"greyscale\"").unwrap();
        assert_eq!(tone, Tone::Greyscale);
    }
}
