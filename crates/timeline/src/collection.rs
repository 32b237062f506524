use std::collections::HashMap;

use crate::{Clip, ClipId, ClipPatch, Seconds};

/// The set of placed clips.
///
/// Clips are kept in a `Vec` so the render layer can borrow an ordered slice.
/// After [`ClipCollection::commit`] the slice is sorted by start time with
/// ties broken by insertion order. In-place edits made during a gesture leave
/// the order untouched until the gesture commits.
#[derive(Debug, Clone, Default)]
pub struct ClipCollection {
    clips: Vec<Clip>,
    inserted: HashMap<ClipId, u64>,
    next_seq: u64,
}

impl ClipCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from a snapshot; the snapshot order becomes the
    /// insertion order.
    pub fn from_snapshot(clips: Vec<Clip>) -> Self {
        let mut collection = Self::default();
        for clip in clips {
            collection.push_raw(clip);
        }
        collection
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn snapshot(&self) -> Vec<Clip> {
        self.clips.clone()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn contains(&self, id: &ClipId) -> bool {
        self.inserted.contains_key(id)
    }

    pub fn get(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == *id)
    }

    pub fn get_mut(&mut self, id: &ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == *id)
    }

    pub fn position(&self, id: &ClipId) -> Option<usize> {
        self.clips.iter().position(|c| c.id == *id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ClipId> + '_ {
        self.clips.iter().map(|c| c.id)
    }

    /// Inserts a clip, repairing its interval first. Clips whose times cannot
    /// be repaired are dropped and `None` is returned. An id that is already
    /// present is replaced by a fresh one.
    pub fn insert(&mut self, mut clip: Clip, min_duration: Seconds) -> Option<ClipId> {
        if !clip.sanitize(min_duration) {
            tracing::warn!(clip = %clip.id, start = clip.start, end = clip.end, "rejected clip with malformed interval");
            return None;
        }
        if self.contains(&clip.id) {
            let fresh = ClipId::new();
            tracing::warn!(clip = %clip.id, replacement = %fresh, "duplicate clip id regenerated");
            clip.id = fresh;
        }
        let id = clip.id;
        self.push_raw(clip);
        Some(id)
    }

    fn push_raw(&mut self, clip: Clip) {
        self.inserted.insert(clip.id, self.next_seq);
        self.next_seq += 1;
        self.clips.push(clip);
    }

    /// Removes every listed clip, returning the clips that were present.
    pub fn remove(&mut self, ids: &[ClipId]) -> Vec<Clip> {
        let mut removed = Vec::new();
        self.clips.retain(|clip| {
            if ids.contains(&clip.id) {
                removed.push(clip.clone());
                false
            } else {
                true
            }
        });
        for clip in &removed {
            self.inserted.remove(&clip.id);
        }
        removed
    }

    /// Applies a patch. Returns `false` (state unchanged) for unknown ids and
    /// for patches that cannot be repaired into a valid interval.
    pub fn update(&mut self, id: &ClipId, patch: &ClipPatch, min_duration: Seconds) -> bool {
        let Some(clip) = self.get_mut(id) else {
            tracing::warn!(clip = %id, "patch for unknown clip ignored");
            return false;
        };
        match patch.apply_to(clip, min_duration) {
            Some(next) => {
                *clip = next;
                true
            }
            None => {
                tracing::warn!(clip = %id, ?patch, "rejected patch with malformed interval");
                false
            }
        }
    }

    /// Overwrites the bounds of a clip without reordering. Used for live
    /// gesture feedback; callers are expected to have clamped already.
    pub fn set_bounds(&mut self, id: &ClipId, start: Seconds, end: Seconds) -> bool {
        match self.get_mut(id) {
            Some(clip) => {
                clip.start = start;
                clip.end = end;
                true
            }
            None => false,
        }
    }

    /// Materializes the committed order: ascending start, ties by insertion.
    pub fn commit(&mut self) {
        let inserted = &self.inserted;
        self.clips.sort_by(|a, b| {
            a.start
                .total_cmp(&b.start)
                .then_with(|| inserted.get(&a.id).cmp(&inserted.get(&b.id)))
        });
    }

    pub fn is_sorted(&self) -> bool {
        self.clips.windows(2).all(|w| w[0].start <= w[1].start)
    }

    /// Ids of the clips from `from` to `to` inclusive in the current order,
    /// regardless of which comes first.
    pub fn span(&self, from: &ClipId, to: &ClipId) -> Option<Vec<ClipId>> {
        let a = self.position(from)?;
        let b = self.position(to)?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Some(self.clips[lo..=hi].iter().map(|c| c.id).collect())
    }
}

impl PartialEq for ClipCollection {
    fn eq(&self, other: &Self) -> bool {
        self.clips == other.clips
    }
}
