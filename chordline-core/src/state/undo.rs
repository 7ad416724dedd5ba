use std::collections::VecDeque;

/// Snapshot undo/redo history.
///
/// Snapshots are taken before a mutation: `push` receives the state as it was
/// just before the change. Undo hands back the most recent pre-mutation
/// snapshot and keeps the live state on the redo stack; any new push clears
/// redo. The undo stack is capped at `max_depth`, evicting the oldest entry.
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: VecDeque<T>,
    max_depth: usize,
}

impl<T: Clone> History<T> {
    /// A depth below 1 is raised to 1.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record `before`, the state prior to the mutation about to be applied.
    pub fn push(&mut self, before: T) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.pop_front();
            log::debug!(target: "history", "evicted oldest snapshot (cap {})", self.max_depth);
        }
        self.undo_stack.push_back(before);
        self.redo_stack.clear();
    }

    /// Step back. Returns the state to restore, or `None` at the start of
    /// history.
    pub fn undo(&mut self, live: &T) -> Option<T> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(live.clone());
        log::debug!(
            target: "history",
            "undo: {} undo / {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(entry)
    }

    /// Step forward again after an undo. Returns `None` when nothing was undone
    /// since the last push.
    pub fn redo(&mut self, live: &T) -> Option<T> {
        let entry = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(live.clone());
        log::debug!(
            target: "history",
            "redo: {} undo / {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of steps that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
