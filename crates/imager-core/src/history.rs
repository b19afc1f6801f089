//! Bounded edit history with undo.
//!
//! An [`EditHistory`] keeps the untouched original image and a stack of
//! snapshots, most recent last. Filters mutate the most recent snapshot
//! in place, so callers [`commit`](EditHistory::commit) before each
//! undoable edit. The stack never holds fewer than one or more than
//! `limit` snapshots; committing past the bound discards the oldest.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::buffer::PixelBuffer;
use crate::types::ImagerError;

/// Default maximum number of snapshots, including the current one.
pub const MAX_HISTORY: usize = 20;

/// A bounded undo stack of [`PixelBuffer`] snapshots.
#[derive(Debug, Clone)]
pub struct EditHistory {
    original: PixelBuffer,
    /// Older snapshots, oldest first. Never longer than `limit - 1`.
    previous: VecDeque<PixelBuffer>,
    /// The most recent snapshot: the one filters edit.
    current: PixelBuffer,
    limit: usize,
}

impl EditHistory {
    /// Start a history for `original` bounded at [`MAX_HISTORY`]
    /// snapshots.
    ///
    /// The history starts with one snapshot: a copy of `original`.
    #[must_use]
    pub fn new(original: PixelBuffer) -> Self {
        let current = original.clone();
        Self {
            original,
            previous: VecDeque::new(),
            current,
            limit: MAX_HISTORY,
        }
    }

    /// Start a history bounded at `limit` snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`ImagerError::InvalidArgument`] if `limit` is zero.
    pub fn with_limit(original: PixelBuffer, limit: usize) -> Result<Self, ImagerError> {
        if limit == 0 {
            return Err(ImagerError::InvalidArgument(
                "history limit must be at least 1".into(),
            ));
        }
        Ok(Self {
            limit,
            ..Self::new(original)
        })
    }

    /// The image the history was started with. Never modified.
    #[must_use]
    pub const fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// The most recent snapshot.
    #[must_use]
    pub const fn current(&self) -> &PixelBuffer {
        &self.current
    }

    /// Mutable access to the most recent snapshot, for filters.
    pub const fn current_mut(&mut self) -> &mut PixelBuffer {
        &mut self.current
    }

    /// Number of snapshots held, including the current one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len() + 1
    }

    /// Always `false`: the current snapshot is never removed.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Maximum number of snapshots held.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Whether [`undo`](Self::undo) would discard a snapshot.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.previous.is_empty()
    }

    /// Snapshots from oldest to most recent.
    pub fn snapshots(&self) -> impl Iterator<Item = &PixelBuffer> {
        self.previous.iter().chain(std::iter::once(&self.current))
    }

    /// Push a copy of the current snapshot, making the copy current.
    ///
    /// If the history then exceeds its limit, the oldest snapshot is
    /// discarded.
    pub fn commit(&mut self) {
        self.previous.push_back(self.current.clone());
        while self.len() > self.limit {
            self.previous.pop_front();
            debug!(limit = self.limit, "evicted oldest snapshot");
        }
        debug!(depth = self.len(), "committed snapshot");
    }

    /// Discard the current snapshot, restoring the one before it.
    ///
    /// Returns `false` without changing anything when only one snapshot
    /// remains.
    pub fn undo(&mut self) -> bool {
        let Some(prior) = self.previous.pop_back() else {
            trace!("nothing to undo");
            return false;
        };
        self.current = prior;
        trace!(depth = self.len(), "undid snapshot");
        true
    }

    /// Discard every snapshot and start over from a fresh copy of the
    /// original.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.current = self.original.clone();
        debug!("history reset to original");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Pixel;

    fn image() -> PixelBuffer {
        PixelBuffer::new(
            vec![
                Pixel::new(10, 20, 30),
                Pixel::new(40, 50, 60),
                Pixel::new(70, 80, 90),
                Pixel::new(100, 110, 120),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn new_history_has_one_copy_of_original() {
        let history = EditHistory::new(image());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), &image());
        assert_eq!(history.original(), &image());
        assert!(!history.can_undo());
    }

    #[test]
    fn undo_on_fresh_history_is_noop() {
        let mut history = EditHistory::new(image());
        assert!(!history.undo());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), &image());
    }

    #[test]
    fn commit_then_undo_restores_prior_snapshot() {
        let mut history = EditHistory::new(image());
        history.commit();
        assert_eq!(history.len(), 2);

        history.current_mut().set(0, Pixel::WHITE).unwrap();
        assert_eq!(history.current().get(0).unwrap(), Pixel::WHITE);

        assert!(history.undo());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), &image());
        assert!(!history.undo());
    }

    #[test]
    fn editing_current_never_touches_original() {
        let mut history = EditHistory::new(image());
        history.current_mut().set(3, Pixel::BLACK).unwrap();
        history.current_mut().set_width(4).unwrap();
        assert_eq!(history.original(), &image());
    }

    #[test]
    fn history_is_bounded() {
        let mut history = EditHistory::new(image());
        for k in 0..(MAX_HISTORY + 7) {
            history.commit();
            assert!(history.len() <= MAX_HISTORY);
            assert_eq!(history.len(), (k + 2).min(MAX_HISTORY));
        }
        assert_eq!(history.len(), MAX_HISTORY);
    }

    #[test]
    fn eviction_drops_oldest_snapshot() {
        let mut history = EditHistory::with_limit(image(), 3).unwrap();
        // Tag each snapshot through pixel 0's red channel: 1, 2, 3, 4.
        for tag in 1..=4 {
            history.commit();
            history
                .current_mut()
                .set(0, Pixel::new(tag, 0, 0))
                .unwrap();
        }
        let tags: Vec<u8> = history
            .snapshots()
            .map(|s| s.get(0).unwrap().red)
            .collect();
        assert_eq!(tags, vec![2, 3, 4]);

        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.current().get(0).unwrap().red, 2);
    }

    #[test]
    fn limit_of_one_never_allows_undo() {
        let mut history = EditHistory::with_limit(image(), 1).unwrap();
        history.commit();
        history.current_mut().set(0, Pixel::WHITE).unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history.undo());
        assert_eq!(history.current().get(0).unwrap(), Pixel::WHITE);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(matches!(
            EditHistory::with_limit(image(), 0),
            Err(ImagerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn reset_restores_single_copy_of_original() {
        let mut history = EditHistory::new(image());
        for _ in 0..5 {
            history.commit();
            history.current_mut().set(1, Pixel::RED).unwrap();
        }
        history.reset();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), &image());
        assert!(!history.undo());

        // The fresh copy is independent of the original.
        history.current_mut().set(1, Pixel::RED).unwrap();
        assert_eq!(history.original(), &image());
    }
}
