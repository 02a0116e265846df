//! Bounded undo/redo history of whole snapshots.
//!
//! The history is a list of snapshots plus a cursor pointing at the current
//! one. Committing drops any redo branch past the cursor; when the list grows
//! past [`MAX_HISTORY`] the oldest snapshot is discarded.

/// Maximum number of snapshots kept.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// History holding only `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, MAX_HISTORY)
    }

    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new current snapshot.
    pub fn commit(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back; returns the snapshot now current, or `None` at the start.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward; returns the snapshot now current, or `None` at the tail.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_inverse() {
        let mut h = History::new(0);
        for i in 1..=5 {
            h.commit(i);
        }
        for expected in (0..5).rev() {
            assert_eq!(h.undo(), Some(&expected));
        }
        assert_eq!(h.undo(), None);
        for expected in 1..=5 {
            assert_eq!(h.redo(), Some(&expected));
        }
        assert_eq!(h.redo(), None);
        assert_eq!(*h.current(), 5);
    }

    #[test]
    fn test_commit_truncates_redo_branch() {
        let mut h = History::new(0);
        h.commit(1);
        h.commit(2);
        h.undo();
        h.undo();
        h.commit(9);
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(&0));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut h = History::new(0);
        for i in 1..60 {
            h.commit(i);
        }
        // 60 snapshots total; 10 oldest dropped
        assert_eq!(h.len(), MAX_HISTORY);
        assert_eq!(h.cursor(), MAX_HISTORY - 1);
        assert_eq!(*h.current(), 59);
        while h.undo().is_some() {}
        assert_eq!(*h.current(), 10);
    }

    #[test]
    fn test_sixty_commits_after_initial() {
        let mut h = History::new(-1);
        for i in 0..60 {
            h.commit(i);
        }
        assert_eq!(h.len(), 50);
        assert_eq!(h.cursor(), 49);
        while h.undo().is_some() {}
        assert_eq!(*h.current(), 10);
    }

    #[test]
    fn test_reset() {
        let mut h = History::new(1);
        h.commit(2);
        h.reset(7);
        assert_eq!(h.len(), 1);
        assert!(!h.can_undo());
        assert_eq!(*h.current(), 7);
    }
}
