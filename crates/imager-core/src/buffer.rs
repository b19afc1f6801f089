//! The editable pixel buffer.
//!
//! A [`PixelBuffer`] owns a flat, row-major sequence of [`Pixel`]s plus a
//! width and height. Pixels can be addressed either by flat index or by
//! `(row, col)`; the two are related by `index = row * width + col`.
//!
//! The invariant `width * height == len` holds after every operation.
//! Changing the width (or height) reinterprets the same flat sequence
//! with a different row length: no pixel moves.

use std::fmt;

use crate::types::{ImagerError, Pixel};

/// A non-empty, row-major RGB pixel buffer.
///
/// Cloning performs a deep copy of the pixel data, which is how edit
/// history snapshots and the frozen "before" views of the geometric
/// filters are taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Create a buffer from a flat pixel sequence and a width.
    ///
    /// The height is derived as `data.len() / width`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::Construction`] if `data` is empty or if
    /// `width` is zero or does not evenly divide `data.len()`.
    pub fn new(data: Vec<Pixel>, width: usize) -> Result<Self, ImagerError> {
        if data.is_empty() {
            return Err(ImagerError::Construction("pixel data is empty".into()));
        }
        if width == 0 || data.len() % width != 0 {
            return Err(ImagerError::Construction(format!(
                "width {width} does not evenly divide {} pixels",
                data.len()
            )));
        }
        let height = data.len() / width;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Create a `width` x `height` buffer filled with one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::Construction`] if either dimension is zero
    /// or their product overflows `usize`.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Result<Self, ImagerError> {
        Self::new(vec![pixel; area(width, height)?], width)
    }

    /// Create a `width` x `height` buffer by evaluating `f(row, col)`
    /// for every position in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::Construction`] if either dimension is zero
    /// or their product overflows `usize`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Pixel,
    ) -> Result<Self, ImagerError> {
        let mut data = Vec::with_capacity(area(width, height)?);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self::new(data, width)
    }

    /// Number of pixels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a buffer holds at least one pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The pixel data in row-major order.
    #[must_use]
    pub fn data(&self) -> &[Pixel] {
        &self.data
    }

    /// Iterate over the rows as slices of `width` pixels.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.data.chunks_exact(self.width)
    }

    /// Returns the pixel at flat index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<Pixel, ImagerError> {
        self.data
            .get(index)
            .copied()
            .ok_or(ImagerError::IndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }

    /// Sets the pixel at flat index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::IndexOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, pixel: Pixel) -> Result<(), ImagerError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(ImagerError::IndexOutOfRange { index, len })?;
        *slot = pixel;
        Ok(())
    }

    /// Returns the pixel at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::PositionOutOfRange`] if `row >= height()`
    /// or `col >= width()`.
    pub fn get_pixel(&self, row: usize, col: usize) -> Result<Pixel, ImagerError> {
        let index = self.index_of(row, col)?;
        Ok(self.data[index])
    }

    /// Sets the pixel at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::PositionOutOfRange`] if `row >= height()`
    /// or `col >= width()`.
    pub fn set_pixel(&mut self, row: usize, col: usize, pixel: Pixel) -> Result<(), ImagerError> {
        let index = self.index_of(row, col)?;
        self.data[index] = pixel;
        Ok(())
    }

    /// Exchanges the pixels at `(row1, col1)` and `(row2, col2)`.
    ///
    /// Both positions are checked before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::PositionOutOfRange`] if either position is
    /// outside the image.
    pub fn swap(
        &mut self,
        row1: usize,
        col1: usize,
        row2: usize,
        col2: usize,
    ) -> Result<(), ImagerError> {
        let a = self.index_of(row1, col1)?;
        let b = self.index_of(row2, col2)?;
        self.data.swap(a, b);
        Ok(())
    }

    /// Sets the width, recomputing the height as `len() / width`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidDimension`] if `width` is zero or
    /// does not evenly divide `len()`.
    pub fn set_width(&mut self, width: usize) -> Result<(), ImagerError> {
        let height = self.divide(width)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Sets the height, recomputing the width as `len() / height`.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidDimension`] if `height` is zero or
    /// does not evenly divide `len()`.
    pub fn set_height(&mut self, height: usize) -> Result<(), ImagerError> {
        let width = self.divide(height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Pixel at `(row, col)` for positions already known to be in bounds.
    pub(crate) fn at(&self, row: usize, col: usize) -> Pixel {
        self.data[row * self.width + col]
    }

    /// Write at `(row, col)` for positions already known to be in bounds.
    pub(crate) fn put(&mut self, row: usize, col: usize, pixel: Pixel) {
        self.data[row * self.width + col] = pixel;
    }

    /// Mutable access to the flat pixel data for whole-buffer passes.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    /// Exchange width and height. Always valid since the product is
    /// unchanged.
    pub(crate) fn swap_axes(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize, ImagerError> {
        if row >= self.height || col >= self.width {
            return Err(ImagerError::PositionOutOfRange {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }

    /// The complementary dimension for `value`, if `value` is valid.
    fn divide(&self, value: usize) -> Result<usize, ImagerError> {
        let len = self.data.len();
        if value == 0 || len % value != 0 {
            return Err(ImagerError::InvalidDimension { value, len });
        }
        Ok(len / value)
    }
}

/// Pixel count of a `width` x `height` image.
fn area(width: usize, height: usize) -> Result<usize, ImagerError> {
    width.checked_mul(height).ok_or_else(|| {
        ImagerError::Construction(format!("{width}x{height} image is too large"))
    })
}

/// Renders the buffer as a nested list, one row per line:
///
/// ```text
/// [[(255, 0, 0), (0, 255, 0)],
/// [(0, 0, 255), (0, 0, 0)]]
/// ```
impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                f.write_str(",\n")?;
            }
            f.write_str("[")?;
            for (c, pixel) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{pixel}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}
