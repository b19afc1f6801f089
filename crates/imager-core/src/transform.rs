//! Geometric transforms: transpose, reflections, and quarter-turn
//! rotations.
//!
//! All transforms edit the buffer in place. Transpose and the rotations
//! change the image shape (new width = old height), so they read from a
//! frozen copy of the pre-transform buffer while writing into the
//! reshaped live buffer. Reading and writing the same buffer would
//! overwrite pixels that have not been read yet.

use tracing::trace;

use crate::buffer::PixelBuffer;

/// Transpose the image: the pixel at new `(row, col)` is the pixel at
/// old `(col, row)`.
pub fn transpose(buffer: &mut PixelBuffer) {
    let frozen = buffer.clone();
    buffer.swap_axes();
    for row in 0..buffer.height() {
        for col in 0..buffer.width() {
            buffer.put(row, col, frozen.at(col, row));
        }
    }
    trace!(width = buffer.width(), height = buffer.height(), "transposed");
}

/// Mirror the image across its vertical axis (left <-> right).
pub fn reflect_horizontal(buffer: &mut PixelBuffer) {
    let width = buffer.width();
    for left in 0..width / 2 {
        let right = width - 1 - left;
        for row in 0..buffer.height() {
            let a = buffer.at(row, left);
            buffer.put(row, left, buffer.at(row, right));
            buffer.put(row, right, a);
        }
    }
}

/// Mirror the image across its horizontal axis (top <-> bottom).
pub fn reflect_vertical(buffer: &mut PixelBuffer) {
    let height = buffer.height();
    for col in 0..buffer.width() {
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let a = buffer.at(top, col);
            buffer.put(top, col, buffer.at(bottom, col));
            buffer.put(bottom, col, a);
        }
    }
}

/// Rotate the image 90 degrees clockwise.
///
/// New `(row, col)` takes old `(old_height - 1 - col, row)`.
pub fn rotate_right(buffer: &mut PixelBuffer) {
    let frozen = buffer.clone();
    buffer.swap_axes();
    let last_row = frozen.height() - 1;
    for row in 0..buffer.height() {
        for col in 0..buffer.width() {
            buffer.put(row, col, frozen.at(last_row - col, row));
        }
    }
    trace!(width = buffer.width(), height = buffer.height(), "rotated right");
}

/// Rotate the image 90 degrees counter-clockwise.
///
/// New `(row, col)` takes old `(col, old_width - 1 - row)`.
pub fn rotate_left(buffer: &mut PixelBuffer) {
    let frozen = buffer.clone();
    buffer.swap_axes();
    let last_col = frozen.width() - 1;
    for row in 0..buffer.height() {
        for col in 0..buffer.width() {
            buffer.put(row, col, frozen.at(col, last_col - row));
        }
    }
    trace!(width = buffer.width(), height = buffer.height(), "rotated left");
}
