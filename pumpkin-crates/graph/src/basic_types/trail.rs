use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::pumpkin_assert_simple;

/// A stack of entries partitioned by checkpoints.
///
/// Entries pushed after a checkpoint are handed back (most recent first) when synchronising to an
/// earlier checkpoint, so that the owner can undo them. The entries currently on the trail are in
/// the order in which they were pushed, which is what allows the trail to be replayed as an event
/// log.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    /// `delimiters[i]` is the length of the trail at the moment checkpoint `i + 1` was created.
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            delimiters: Vec::default(),
            entries: Vec::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.delimiters.push(self.entries.len());
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.delimiters.len()
    }

    /// Removes every entry pushed after `checkpoint` was created, returning them in reverse order
    /// of insertion.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        pumpkin_assert_simple!(
            checkpoint < self.checkpoint(),
            "cannot synchronise to checkpoint {checkpoint} from checkpoint {}",
            self.checkpoint()
        );

        let new_len = self.delimiters[checkpoint];
        self.delimiters.truncate(checkpoint);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
