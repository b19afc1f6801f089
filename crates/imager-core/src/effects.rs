//! Whole-image effects: jail bars, vignetting, and pixellation.
//!
//! Arithmetic here follows a fixed evaluation order and truncates toward
//! zero so that results are bit-identical to reference renders. Fused
//! multiply-add would change the last bit of some intermediate values,
//! which is why `suboptimal_flops` is allowed locally.

use tracing::trace;

use crate::buffer::PixelBuffer;
use crate::types::{ImagerError, Pixel};

/// Thickness in rows of the top and bottom jail bars.
pub const HBAR_THICKNESS: usize = 3;

/// Thickness in columns of each vertical jail bar.
pub const VBAR_THICKNESS: usize = 4;

/// Width of image that earns one more interior bar.
pub const INTERIOR_BAR_SPACING: usize = 50;

/// Minimum width for [`jail`]: room for the left and right bars.
pub const JAIL_MIN_WIDTH: usize = 2 * VBAR_THICKNESS;

/// Minimum height for [`jail`]: room for one horizontal bar.
pub const JAIL_MIN_HEIGHT: usize = HBAR_THICKNESS;

/// Check that `buffer` is large enough to hold the jail bars.
///
/// # Errors
///
/// Returns [`ImagerError::InvalidArgument`] when the buffer is narrower
/// than [`JAIL_MIN_WIDTH`] or shorter than [`JAIL_MIN_HEIGHT`].
pub fn check_jail(buffer: &PixelBuffer) -> Result<(), ImagerError> {
    if buffer.width() < JAIL_MIN_WIDTH || buffer.height() < JAIL_MIN_HEIGHT {
        return Err(ImagerError::InvalidArgument(format!(
            "jail needs at least a {JAIL_MIN_WIDTH}x{JAIL_MIN_HEIGHT} image, got {}x{}",
            buffer.width(),
            buffer.height(),
        )));
    }
    Ok(())
}

/// Check a pixellation block size.
///
/// # Errors
///
/// Returns [`ImagerError::InvalidArgument`] if `step` is zero.
pub fn check_step(step: usize) -> Result<(), ImagerError> {
    if step == 0 {
        return Err(ImagerError::InvalidArgument(
            "pixellate step must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// Starting columns of the vertical jail bars for an image `width`
/// columns wide.
///
/// There are `n + 2` bars, `n = (width - 8) / 50`, spread as evenly as
/// possible: each bar starts `4 + spacing` columns after the previous
/// one, truncated to a whole column.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn vertical_bar_columns(width: usize) -> Vec<usize> {
    if width < JAIL_MIN_WIDTH {
        return Vec::new();
    }
    let interior = (width - JAIL_MIN_WIDTH) / INTERIOR_BAR_SPACING;
    let bars = interior + 2;
    let spacing = (width - VBAR_THICKNESS * bars) as f64 / (interior + 1) as f64;
    let last = width - VBAR_THICKNESS;

    let mut columns = Vec::with_capacity(bars);
    let mut col = 0.0_f64;
    for _ in 0..bars {
        columns.push((col as usize).min(last));
        col = col + VBAR_THICKNESS as f64 + spacing;
    }
    columns
}

/// Draw a red cage over the image.
///
/// Three-row bars span the top and bottom edges; four-column bars run
/// down the left and right edges plus one interior bar per 50 columns
/// beyond the first 8.
///
/// # Errors
///
/// Returns [`ImagerError::InvalidArgument`] if the image is too small
/// for the bars (see [`check_jail`]). Nothing is drawn in that case.
pub fn jail(buffer: &mut PixelBuffer) -> Result<(), ImagerError> {
    check_jail(buffer)?;

    let (width, height) = (buffer.width(), buffer.height());
    for top in [0, height - HBAR_THICKNESS] {
        for row in top..top + HBAR_THICKNESS {
            for col in 0..width {
                buffer.put(row, col, Pixel::RED);
            }
        }
    }

    let columns = vertical_bar_columns(width);
    for &left in &columns {
        for row in 0..height {
            for col in left..left + VBAR_THICKNESS {
                buffer.put(row, col, Pixel::RED);
            }
        }
    }
    trace!(?columns, "drew jail bars");
    Ok(())
}

/// Darken each pixel by `1 - (d / hfd)^2`, where `d` is its distance
/// from the image center and `hfd` is half the diagonal.
///
/// The center is `(height / 2, width / 2)` in real coordinates, so on
/// even dimensions it falls between pixels. Channels are truncated.
#[allow(
    clippy::suboptimal_flops,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn vignette(buffer: &mut PixelBuffer) {
    let width = buffer.width() as f64;
    let height = buffer.height() as f64;
    let half_diagonal = 0.5 * (width * width + height * height).sqrt();

    for row in 0..buffer.height() {
        let dy = row as f64 - height / 2.0;
        for col in 0..buffer.width() {
            let dx = col as f64 - width / 2.0;
            let d = (dy * dy + dx * dx).sqrt();
            let ratio = d / half_diagonal;
            let v = 1.0 - ratio * ratio;

            let pixel = buffer.at(row, col);
            buffer.put(
                row,
                col,
                Pixel::new(
                    (v * f64::from(pixel.red)) as u8,
                    (v * f64::from(pixel.green)) as u8,
                    (v * f64::from(pixel.blue)) as u8,
                ),
            );
        }
    }
}

/// Replace each `step` x `step` block with its average color.
///
/// Blocks start at the top-left corner; those on the right and bottom
/// edges are cut short when the dimensions are not multiples of `step`.
/// Each channel average is the floor of the block sum over the block
/// pixel count. Blocks are disjoint, so every average is taken over
/// original pixel values.
///
/// # Errors
///
/// Returns [`ImagerError::InvalidArgument`] if `step` is zero. Nothing
/// is written in that case.
pub fn pixellate(buffer: &mut PixelBuffer, step: usize) -> Result<(), ImagerError> {
    check_step(step)?;

    let (width, height) = (buffer.width(), buffer.height());
    for top in (0..height).step_by(step) {
        let bottom = (top + step).min(height);
        for left in (0..width).step_by(step) {
            let right = (left + step).min(width);
            let average = block_average(buffer, top..bottom, left..right);
            for row in top..bottom {
                for col in left..right {
                    buffer.put(row, col, average);
                }
            }
        }
    }
    trace!(step, "pixellated");
    Ok(())
}

/// Floor-averaged color over a non-empty block.
fn block_average(
    buffer: &PixelBuffer,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
) -> Pixel {
    let mut sums = [0_u64; 3];
    let mut count = 0_u64;
    for row in rows {
        for col in cols.clone() {
            for (sum, channel) in sums.iter_mut().zip(buffer.at(row, col).channels()) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }
    // Each mean is at most 255, so the conversion cannot fail.
    let mean = |sum: u64| u8::try_from(sum / count.max(1)).unwrap_or(u8::MAX);
    Pixel::new(mean(sums[0]), mean(sums[1]), mean(sums[2]))
}
