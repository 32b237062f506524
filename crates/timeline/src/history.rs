//! Snapshot-based undo/redo history.
//!
//! Entries are full copies of the committed clip list. The manager holds a
//! cursor into a bounded window of entries:
//! - entries after the cursor are redo candidates and are dropped on push
//! - a push identical to the entry under the cursor is skipped
//! - once the window is full the oldest entry is evicted
//!
//! Restoring an entry is not an edit, so `undo`/`redo` never push.

use crate::Clip;

/// A single entry in the undo/redo history.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Human-readable label describing the action (e.g. "Move clip").
    pub label: String,
    pub clips: Vec<Clip>,
}

#[derive(Clone, Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    index: usize,
    max_entries: usize,
}

impl HistoryManager {
    /// Creates a history whose first entry is `baseline`.
    pub fn new(max_entries: usize, baseline: Vec<Clip>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "Initial state".to_string(),
                clips: baseline,
            }],
            index: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Records a committed state. Returns `false` when the snapshot matches
    /// the current entry and nothing was recorded.
    pub fn push(&mut self, label: &str, clips: Vec<Clip>) -> bool {
        if self.entries.get(self.index).map_or(false, |e| e.clips == clips) {
            tracing::debug!(label, "Push skipped: state unchanged");
            return false;
        }

        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            label: label.to_string(),
            clips,
        });

        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;

        tracing::debug!(
            label,
            depth = self.entries.len(),
            index = self.index,
            "History entry pushed"
        );
        true
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        let undone = &self.entries[self.index].label;
        tracing::debug!(label = %undone, index = self.index - 1, "Undo");
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        let entry = &self.entries[self.index];
        tracing::debug!(label = %entry.label, index = self.index, "Redo");
        Some(entry)
    }

    /// Drops every entry and starts over from `baseline`.
    pub fn reset(&mut self, baseline: Vec<Clip>) {
        *self = Self::new(self.max_entries, baseline);
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaKind;

    fn state(start: f64) -> Vec<Clip> {
        let mut clip = Clip::new(MediaKind::Image, "still.png", start, start + 1.0);
        clip.id = crate::ClipId(uuid::Uuid::nil());
        vec![clip]
    }

    #[test]
    fn identical_push_is_skipped() {
        let mut history = HistoryManager::new(50, Vec::new());
        assert!(history.push("Add", state(1.0)));
        assert!(!history.push("Add again", state(1.0)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn window_slides_when_full() {
        let mut history = HistoryManager::new(5, Vec::new());
        for i in 0..10 {
            history.push("Edit", state(i as f64));
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.index(), 4);
        assert_eq!(history.current().clips, state(9.0));

        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(history.current().clips, state(5.0));
    }

    #[test]
    fn push_after_undo_discards_redo_branch() {
        let mut history = HistoryManager::new(50, Vec::new());
        history.push("a", state(1.0));
        history.push("b", state(2.0));
        history.undo();
        assert!(history.can_redo());
        history.push("c", state(3.0));
        assert!(!history.can_redo());
        assert_eq!(history.labels().collect::<Vec<_>>(), vec!["Initial state", "a", "c"]);
    }

    #[test]
    fn undo_and_redo_stop_at_the_ends() {
        let mut history = HistoryManager::new(50, Vec::new());
        assert!(history.undo().is_none());
        history.push("a", state(1.0));
        assert!(history.redo().is_none());
        assert_eq!(history.undo().unwrap().clips, Vec::new());
        assert_eq!(history.redo().unwrap().clips, state(1.0));
    }
}
