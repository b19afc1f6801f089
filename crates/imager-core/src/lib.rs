//! imager-core: Undoable pixel-buffer editing (sans-IO).
//!
//! An image is a [`PixelBuffer`]: a flat, row-major sequence of RGB
//! [`Pixel`]s addressable both by flat index and by `(row, col)`. An
//! [`EditHistory`] keeps a bounded stack of buffer snapshots for undo,
//! and an [`Editor`] drives that history with [`Filter`]s:
//! geometric transforms, color transforms, and block effects.
//!
//! This crate has **no I/O dependencies** -- it works on in-memory
//! buffers and byte slices. Reading and writing files lives in the
//! `imager` command-line crate.

pub mod buffer;
pub mod codec;
pub mod color;
pub mod editor;
pub mod effects;
pub mod filter;
pub mod history;
pub mod transform;
pub mod types;

pub use buffer::PixelBuffer;
pub use color::Tone;
pub use editor::{EditAction, Editor};
pub use filter::{Filter, ImageFilter};
pub use history::{EditHistory, MAX_HISTORY};
pub use types::{EditorConfig, ImagerError, Pixel, RgbImage};

/// Decode `image_bytes`, perform `actions` in order, and return the
/// edited image.
///
/// A convenience wrapper for one-shot edits; use [`Editor`] directly
/// to keep the history around.
///
/// # Errors
///
/// Returns the decode error from [`codec::decode`], the configuration
/// error from [`Editor::with_config`], or the first failing action's
/// error from [`Editor::perform`].
pub fn edit(
    image_bytes: &[u8],
    actions: &[EditAction],
    config: &EditorConfig,
) -> Result<PixelBuffer, ImagerError> {
    let original = codec::decode(image_bytes)?;
    let mut editor = Editor::with_config(original, config)?;
    editor.perform_all(actions)?;
    Ok(editor.current().clone())
}
