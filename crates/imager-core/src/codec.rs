//! Bridge between encoded image bytes and [`PixelBuffer`].
//!
//! Everything here works on in-memory bytes; reading and writing files
//! is left to the caller.

use image::{ImageEncoder, RgbImage};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::types::{ImagerError, Pixel};

/// Decode raw image bytes (PNG, JPEG, BMP, or WebP) into a pixel buffer.
///
/// Any alpha channel is discarded.
///
/// # Errors
///
/// Returns [`ImagerError::EmptyInput`] if `bytes` is empty,
/// [`ImagerError::ImageDecode`] if the format is unrecognized or the
/// data is corrupt, and [`ImagerError::Construction`] if the decoded
/// image has no pixels.
#[must_use = "returns the decoded pixel buffer"]
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, ImagerError> {
    if bytes.is_empty() {
        return Err(ImagerError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        source_len = bytes.len(),
        "decoded image"
    );
    from_rgb_image(&img.to_rgb8())
}

/// Copy an `RgbImage` into a new pixel buffer, row-major.
///
/// # Errors
///
/// Returns [`ImagerError::Construction`] if the image has no pixels.
pub fn from_rgb_image(image: &RgbImage) -> Result<PixelBuffer, ImagerError> {
    let data = image.pixels().map(|&rgb| Pixel::from(rgb)).collect();
    let width = usize::try_from(image.width())
        .map_err(|e| ImagerError::Construction(e.to_string()))?;
    PixelBuffer::new(data, width)
}

/// Copy a pixel buffer into a new `RgbImage`.
///
/// # Errors
///
/// Returns [`ImagerError::ImageEncode`] if a dimension does not fit in
/// `u32`.
pub fn to_rgb_image(buffer: &PixelBuffer) -> Result<RgbImage, ImagerError> {
    let width = dimension(buffer.width())?;
    let height = dimension(buffer.height())?;
    let raw: Vec<u8> = buffer.data().iter().flat_map(|p| p.channels()).collect();
    RgbImage::from_raw(width, height, raw).ok_or_else(|| {
        ImagerError::ImageEncode(format!("{width}x{height} buffer has the wrong length"))
    })
}

/// Encode a pixel buffer as 8-bit RGB PNG bytes.
///
/// # Errors
///
/// Returns [`ImagerError::ImageEncode`] if the PNG encoder fails or a
/// dimension does not fit in `u32`.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImagerError> {
    let image = to_rgb_image(buffer)?;
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImagerError::ImageEncode(e.to_string()))?;
    debug!(bytes = png_bytes.len(), "encoded png");
    Ok(png_bytes)
}

fn dimension(value: usize) -> Result<u32, ImagerError> {
    u32::try_from(value)
        .map_err(|_| ImagerError::ImageEncode(format!("dimension {value} exceeds u32")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn checker() -> PixelBuffer {
        PixelBuffer::from_fn(3, 2, |row, col| {
            if (row + col) % 2 == 0 {
                Pixel::RED
            } else {
                Pixel::new(0, 0, 255)
            }
        })
        .unwrap()
    }

    #[test]
    fn empty_input_returns_error() {
        assert!(matches!(decode(&[]), Err(ImagerError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_returns_image_decode_error() {
        let result = decode(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(ImagerError::ImageDecode(_))));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let buffer = checker();
        let png = encode_png(&buffer).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
        assert_eq!(decode(&png).unwrap(), buffer);
    }

    #[test]
    fn rgb_image_conversion_is_row_major() {
        let image = to_rgb_image(&checker()).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0]);
    }

    #[test]
    fn decode_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0]));
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(rgba.as_raw(), 2, 2, image::ExtendedColorType::Rgba8)
            .unwrap();

        let buffer = decode(&png).unwrap();
        assert_eq!(buffer.len(), 4);
        assert!(buffer.data().iter().all(|&p| p == Pixel::new(10, 20, 30)));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let image = RgbImage::new(0, 0);
        assert!(matches!(
            from_rgb_image(&image),
            Err(ImagerError::Construction(_))
        ));
    }
}
