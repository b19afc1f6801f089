//! Named filter operations.
//!
//! [`Filter`] enumerates every pixel-transforming operation the editor
//! supports, so that a shell can build, log, serialize, and replay edits
//! as plain data. Each filter is applied through the [`ImageFilter`]
//! trait, which separates argument checking from the pixel pass: a
//! filter that passes [`ImageFilter::validate`] cannot fail part way
//! through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color::{self, Tone};
use crate::effects;
use crate::transform;
use crate::types::ImagerError;

/// A pixel-transforming operation on a [`PixelBuffer`].
pub trait ImageFilter {
    /// Check every argument and buffer precondition without writing.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidArgument`] describing the first
    /// violated precondition.
    fn validate(&self, buffer: &PixelBuffer) -> Result<(), ImagerError>;

    /// Validate, then transform `buffer` in place.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) error, in which case
    /// `buffer` is untouched.
    fn apply(&self, buffer: &mut PixelBuffer) -> Result<(), ImagerError>;
}

/// Every filter the editor can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum Filter {
    /// Complement every channel.
    Invert,
    /// Swap rows and columns.
    Transpose,
    /// Mirror left to right.
    ReflectHorizontal,
    /// Mirror top to bottom.
    ReflectVertical,
    /// Quarter turn clockwise.
    RotateRight,
    /// Quarter turn counter-clockwise.
    RotateLeft,
    /// Greyscale or sepia rendition of brightness.
    Monochromify {
        /// Output tone.
        tone: Tone,
    },
    /// Red bars around the edges and across the interior.
    Jail,
    /// Darken toward the corners.
    Vignette,
    /// Average over `step` x `step` blocks.
    Pixellate {
        /// Block edge length in pixels. Must be positive.
        step: usize,
    },
}

impl Filter {
    /// Short name used in logs, independent of arguments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Transpose => "transpose",
            Self::ReflectHorizontal => "reflect-horizontal",
            Self::ReflectVertical => "reflect-vertical",
            Self::RotateRight => "rotate-right",
            Self::RotateLeft => "rotate-left",
            Self::Monochromify { .. } => "monochromify",
            Self::Jail => "jail",
            Self::Vignette => "vignette",
            Self::Pixellate { .. } => "pixellate",
        }
    }

    /// Whether the filter swaps width and height.
    #[must_use]
    pub const fn reshapes(&self) -> bool {
        matches!(self, Self::Transpose | Self::RotateRight | Self::RotateLeft)
    }
}

impl ImageFilter for Filter {
    fn validate(&self, buffer: &PixelBuffer) -> Result<(), ImagerError> {
        match *self {
            Self::Jail => effects::check_jail(buffer),
            Self::Pixellate { step } => effects::check_step(step),
            _ => Ok(()),
        }
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> Result<(), ImagerError> {
        self.validate(buffer)?;
        match *self {
            Self::Invert => color::invert(buffer),
            Self::Transpose => transform::transpose(buffer),
            Self::ReflectHorizontal => transform::reflect_horizontal(buffer),
            Self::ReflectVertical => transform::reflect_vertical(buffer),
            Self::RotateRight => transform::rotate_right(buffer),
            Self::RotateLeft => transform::rotate_left(buffer),
            Self::Monochromify { tone } => color::monochromify(buffer, tone),
            Self::Jail => effects::jail(buffer)?,
            Self::Vignette => effects::vignette(buffer),
            Self::Pixellate { step } => effects::pixellate(buffer, step)?,
        }
        debug!(
            filter = %self,
            width = buffer.width(),
            height = buffer.height(),
            "applied filter"
        );
        Ok(())
    }
}

/// Formats as the command-line token accepted by [`FromStr`]:
/// `invert`, `sepia`, `pixellate=4`, and so on.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monochromify { tone } => write!(f, "{tone}"),
            Self::Pixellate { step } => write!(f, "pixellate={step}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Filter {
    type Err = ImagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(step) = token.strip_prefix("pixellate=") {
            let step = step.parse().map_err(|_| {
                ImagerError::InvalidArgument(format!("pixellate step {step:?} is not a whole number"))
            })?;
            return Ok(Self::Pixellate { step });
        }
        let filter = match token {
            "invert" => Self::Invert,
            "transpose" => Self::Transpose,
            "reflect-horizontal" => Self::ReflectHorizontal,
            "reflect-vertical" => Self::ReflectVertical,
            "rotate-right" => Self::RotateRight,
            "rotate-left" => Self::RotateLeft,
            "jail" => Self::Jail,
            "vignette" => Self::Vignette,
            "pixellate" => {
                return Err(ImagerError::InvalidArgument(
                    "pixellate needs a step, e.g. pixellate=4".into(),
                ));
            }
            other => match other.parse::<Tone>() {
                Ok(tone) => Self::Monochromify { tone },
                Err(_) => {
                    return Err(ImagerError::InvalidArgument(format!(
                        "unknown filter: {other:?}"
                    )));
                }
            },
        };
        Ok(filter)
    }
}
