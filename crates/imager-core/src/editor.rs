//! Editing session: an [`EditHistory`] driven by [`Filter`]s.
//!
//! The [`Editor`] owns the history and applies filters to its current
//! snapshot. Every successful [`Editor::apply`] is undoable; a filter
//! that fails validation leaves both the history and the image exactly
//! as they were.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::PixelBuffer;
use crate::filter::{Filter, ImageFilter};
use crate::history::EditHistory;
use crate::types::{EditorConfig, ImagerError};

/// One step of an editing script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    /// Apply a filter as a new undoable version.
    Apply(Filter),
    /// Discard the most recent version.
    Undo,
    /// Return to the original image, clearing the history.
    Reset,
}

impl From<Filter> for EditAction {
    fn from(filter: Filter) -> Self {
        Self::Apply(filter)
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply(filter) => write!(f, "{filter}"),
            Self::Undo => f.write_str("undo"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// Parses `undo`, `reset`, or any filter token (see [`Filter`]).
impl FromStr for EditAction {
    type Err = ImagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "undo" => Ok(Self::Undo),
            "reset" => Ok(Self::Reset),
            other => other.parse().map(Self::Apply),
        }
    }
}

/// An image under edit, with undo.
#[derive(Debug, Clone)]
pub struct Editor {
    history: EditHistory,
}

impl Editor {
    /// Start editing `original` with the default configuration.
    #[must_use]
    pub fn new(original: PixelBuffer) -> Self {
        Self {
            history: EditHistory::new(original),
        }
    }

    /// Start editing `original` with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidArgument`] if
    /// `config.max_history` is zero.
    pub fn with_config(original: PixelBuffer, config: &EditorConfig) -> Result<Self, ImagerError> {
        Ok(Self {
            history: EditHistory::with_limit(original, config.max_history)?,
        })
    }

    /// The image as it currently stands.
    #[must_use]
    pub const fn current(&self) -> &PixelBuffer {
        self.history.current()
    }

    /// The image as first loaded.
    #[must_use]
    pub const fn original(&self) -> &PixelBuffer {
        self.history.original()
    }

    /// The underlying snapshot history.
    #[must_use]
    pub const fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Apply `filter` as a new undoable version.
    ///
    /// Validation runs before the snapshot is committed. A filter that
    /// passes validation cannot fail while applying, so every error is
    /// reported with the history unchanged.
    ///
    /// # Errors
    ///
    /// Returns the filter's validation error without committing a
    /// snapshot or touching any pixel.
    pub fn apply(&mut self, filter: &Filter) -> Result<(), ImagerError> {
        filter.validate(self.history.current())?;
        self.history.commit();
        filter.apply(self.history.current_mut())?;
        info!(filter = %filter, depth = self.history.len(), "applied");
        Ok(())
    }

    /// Discard the most recent version.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        debug!(undone, depth = self.history.len(), "undo");
        undone
    }

    /// Return to the original image with a single-entry history.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Perform one scripted action.
    ///
    /// Returns whether the image changed version: always `true` for
    /// [`Apply`](EditAction::Apply) and [`Reset`](EditAction::Reset),
    /// and the result of [`undo`](Self::undo) for
    /// [`Undo`](EditAction::Undo).
    ///
    /// # Errors
    ///
    /// Returns the error from [`apply`](Self::apply).
    pub fn perform(&mut self, action: &EditAction) -> Result<bool, ImagerError> {
        match action {
            EditAction::Apply(filter) => self.apply(filter).map(|()| true),
            EditAction::Undo => Ok(self.undo()),
            EditAction::Reset => {
                self.reset();
                Ok(true)
            }
        }
    }

    /// Perform each action in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`perform`](Self::perform). Actions
    /// before it remain applied.
    pub fn perform_all<'a>(
        &mut self,
        actions: impl IntoIterator<Item = &'a EditAction>,
    ) -> Result<(), ImagerError> {
        for action in actions {
            self.perform(action)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::Tone;
    use crate::types::Pixel;

    fn image() -> PixelBuffer {
        PixelBuffer::from_fn(10, 6, |row, col| {
            Pixel::new(
                u8::try_from(row * 40).unwrap(),
                u8::try_from(col * 25).unwrap(),
                90,
            )
        })
        .unwrap()
    }

    // --- Editor tests ---

    #[test]
    fn apply_then_undo_restores_image() {
        let mut editor = Editor::new(image());
        editor.apply(&Filter::RotateRight).unwrap();
        assert_eq!(editor.current().width(), 6);
        assert_eq!(editor.history().len(), 2);

        assert!(editor.undo());
        assert_eq!(editor.current(), &image());
        assert!(!editor.undo());
    }

    #[test]
    fn rejected_filter_commits_nothing() {
        let mut editor = Editor::new(image());
        let err = editor.apply(&Filter::Pixellate { step: 0 }).unwrap_err();
        assert!(matches!(err, ImagerError::InvalidArgument(_)));
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.current(), &image());
    }

    #[test]
    fn jail_on_small_image_commits_nothing() {
        let small = PixelBuffer::filled(4, 4, Pixel::WHITE).unwrap();
        let mut editor = Editor::new(small.clone());
        assert!(editor.apply(&Filter::Jail).is_err());
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.current(), &small);
    }

    #[test]
    fn reset_discards_all_versions() {
        let mut editor = Editor::new(image());
        editor.apply(&Filter::Invert).unwrap();
        editor.apply(&Filter::Vignette).unwrap();
        editor.reset();
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.current(), &image());
        assert_eq!(editor.original(), &image());
    }

    #[test]
    fn config_bounds_history() {
        let config = EditorConfig { max_history: 2 };
        let mut editor = Editor::with_config(image(), &config).unwrap();
        editor.apply(&Filter::Invert).unwrap();
        editor.apply(&Filter::ReflectVertical).unwrap();
        assert_eq!(editor.history().len(), 2);
        assert!(editor.undo());
        assert!(!editor.undo());

        let mut inverted = image();
        crate::color::invert(&mut inverted);
        assert_eq!(editor.current(), &inverted);
    }

    #[test]
    fn rejected_filter_on_full_history_keeps_every_version() {
        let config = EditorConfig { max_history: 2 };
        let mut editor = Editor::with_config(image(), &config).unwrap();
        editor.apply(&Filter::Invert).unwrap();
        assert_eq!(editor.history().len(), 2);

        assert!(editor.apply(&Filter::Pixellate { step: 0 }).is_err());
        assert_eq!(editor.history().len(), 2);
        assert!(editor.undo());
        assert_eq!(editor.current(), &image());
    }

    #[test]
    fn zero_history_config_is_rejected() {
        let config = EditorConfig { max_history: 0 };
        assert!(Editor::with_config(image(), &config).is_err());
    }

    // --- EditAction tests ---

    #[test]
    fn action_tokens_parse() {
        assert_eq!("undo".parse::<EditAction>().unwrap(), EditAction::Undo);
        assert_eq!("reset".parse::<EditAction>().unwrap(), EditAction::Reset);
        assert_eq!(
            "pixellate=3".parse::<EditAction>().unwrap(),
            EditAction::Apply(Filter::Pixellate { step: 3 })
        );
        assert!("redo".parse::<EditAction>().is_err());
    }

    #[test]
    fn actions_deserialize_from_json_script() {
        let script = r#"[
            {"apply": {"filter": "monochromify", "tone": "sepia"}},
            {"apply": {"filter": "vignette"}},
            "undo",
            "reset"
        ]"#;
        let actions: Vec<EditAction> = serde_json::from_str(script).unwrap();
        assert_eq!(
            actions,
            vec![
                EditAction::Apply(Filter::Monochromify { tone: Tone::Sepia }),
                EditAction::Apply(Filter::Vignette),
                EditAction::Undo,
                EditAction::Reset,
            ]
        );
    }

    #[test]
    fn perform_reports_version_changes() {
        let mut editor = Editor::new(image());
        assert!(!editor.perform(&EditAction::Undo).unwrap());
        assert!(editor.perform(&Filter::Transpose.into()).unwrap());
        assert!(editor.perform(&EditAction::Undo).unwrap());
        assert!(editor.perform(&EditAction::Reset).unwrap());
    }

    #[test]
    fn perform_all_stops_at_first_error() {
        let mut editor = Editor::new(image());
        let actions = [
            EditAction::Apply(Filter::Invert),
            EditAction::Apply(Filter::Pixellate { step: 0 }),
            EditAction::Apply(Filter::Invert),
        ];
        assert!(editor.perform_all(&actions).is_err());
        assert_eq!(editor.history().len(), 2);
    }
}
