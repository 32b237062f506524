//! Multi-clip selection for the timeline: click, toggle, range and marquee.

use std::collections::HashSet;

use crate::{Clip, ClipCollection, ClipId, TrackBands};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    /// Set of selected clip IDs
    selected: HashSet<ClipId>,
    /// Reference point for range selection
    anchor: Option<ClipId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single clip, clearing previous selection
    pub fn select_only(&mut self, id: ClipId) {
        self.selected.clear();
        self.selected.insert(id);
        self.anchor = Some(id);
    }

    /// Toggle clip selection (Cmd/Ctrl-click); the clicked clip becomes the anchor
    pub fn toggle(&mut self, id: ClipId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.anchor = Some(id);
    }

    /// Union the contiguous span between the anchor and `id` (Shift-click).
    /// Without a usable anchor this degrades to a plain click.
    pub fn select_range(&mut self, clips: &ClipCollection, id: ClipId) {
        let span = self.anchor.and_then(|anchor| clips.span(&anchor, &id));
        match span {
            Some(ids) => self.selected.extend(ids),
            None => self.select_only(id),
        }
    }

    /// Replace the selection with `ids` (Cmd/Ctrl + A, paste)
    pub fn set_all(&mut self, ids: impl IntoIterator<Item = ClipId>) {
        self.selected.clear();
        self.selected.extend(ids);
        if self.anchor.map_or(true, |a| !self.selected.contains(&a)) {
            self.anchor = None;
        }
    }

    /// Replace the selection with every clip matching `predicate`
    pub fn box_select<'a, F>(&mut self, clips: impl IntoIterator<Item = &'a Clip>, predicate: F)
    where
        F: Fn(&Clip) -> bool,
    {
        let ids: Vec<ClipId> = clips
            .into_iter()
            .filter(|clip| predicate(clip))
            .map(|clip| clip.id)
            .collect();
        self.set_all(ids);
    }

    /// Clear all selections
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drop ids that no longer exist, e.g. after undo
    pub fn retain_existing(&mut self, clips: &ClipCollection) {
        self.selected.retain(|id| clips.contains(id));
        if self.anchor.map_or(false, |a| !clips.contains(&a)) {
            self.anchor = None;
        }
    }

    pub fn set_anchor(&mut self, id: Option<ClipId>) {
        self.anchor = id;
    }

    pub fn anchor(&self) -> Option<ClipId> {
        self.anchor
    }

    /// Check if a clip is selected
    pub fn is_selected(&self, id: &ClipId) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> &HashSet<ClipId> {
        &self.selected
    }

    /// Selected ids in timeline order
    pub fn ordered_ids(&self, clips: &ClipCollection) -> Vec<ClipId> {
        clips.ids().filter(|id| self.selected.contains(id)).collect()
    }
}

/// Axis-aligned rectangle in timeline pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    pub fn from_two_points(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            right: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Whether a clip's time extent and track band overlap this rectangle.
    pub fn hits_clip(&self, clip: &Clip, pixels_per_second: f64, bands: &TrackBands) -> bool {
        let x0 = clip.start * pixels_per_second;
        let x1 = clip.end * pixels_per_second;
        let band = bands.band(clip.track());
        x0 <= self.right && self.left <= x1 && band.intersects(self.top, self.bottom)
    }
}

/// Rectangle selection state (for drag selection)
#[derive(Clone, Debug)]
pub struct MarqueeSelection {
    pub start_pos: (f64, f64),
    pub current_pos: (f64, f64),
    /// Set once the pointer has travelled past the click threshold.
    pub active: bool,
}

impl MarqueeSelection {
    pub fn new(start_pos: (f64, f64)) -> Self {
        Self {
            start_pos,
            current_pos: start_pos,
            active: false,
        }
    }

    pub fn update(&mut self, current_pos: (f64, f64), threshold_px: f64) {
        self.current_pos = current_pos;
        if self.distance() >= threshold_px {
            self.active = true;
        }
    }

    pub fn distance(&self) -> f64 {
        let dx = self.current_pos.0 - self.start_pos.0;
        let dy = self.current_pos.1 - self.start_pos.1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the selection rectangle
    pub fn rect(&self) -> PixelRect {
        PixelRect::from_two_points(self.start_pos, self.current_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MediaKind, MIN_DURATION};

    fn collection(spans: &[(f64, f64, MediaKind)]) -> (ClipCollection, Vec<ClipId>) {
        let mut clips = ClipCollection::new();
        let ids = spans
            .iter()
            .map(|(s, e, kind)| {
                clips
                    .insert(Clip::new(*kind, "m", *s, *e), MIN_DURATION)
                    .unwrap()
            })
            .collect();
        clips.commit();
        (clips, ids)
    }

    #[test]
    fn toggle_moves_anchor_and_flips_membership() {
        let (_, ids) = collection(&[(0.0, 1.0, MediaKind::Image), (1.0, 2.0, MediaKind::Image)]);
        let mut selection = SelectionState::new();
        selection.select_only(ids[0]);
        selection.toggle(ids[1]);
        assert_eq!(selection.count(), 2);
        assert_eq!(selection.anchor(), Some(ids[1]));
        selection.toggle(ids[0]);
        assert!(!selection.is_selected(&ids[0]));
        assert_eq!(selection.anchor(), Some(ids[0]));
    }

    #[test]
    fn range_unions_span_and_keeps_anchor() {
        let (clips, ids) = collection(&[
            (0.0, 1.0, MediaKind::Video),
            (2.0, 3.0, MediaKind::Audio),
            (4.0, 5.0, MediaKind::Video),
            (6.0, 7.0, MediaKind::Video),
        ]);
        let mut selection = SelectionState::new();
        selection.select_only(ids[3]);
        selection.toggle(ids[0]);
        selection.toggle(ids[0]);
        // anchor is ids[0], which is now deselected
        selection.select_range(&clips, ids[2]);
        assert_eq!(selection.ordered_ids(&clips), vec![ids[0], ids[1], ids[2], ids[3]]);
        assert_eq!(selection.anchor(), Some(ids[0]));
    }

    #[test]
    fn range_without_anchor_is_plain_click() {
        let (clips, ids) = collection(&[(0.0, 1.0, MediaKind::Video), (2.0, 3.0, MediaKind::Video)]);
        let mut selection = SelectionState::new();
        selection.select_range(&clips, ids[1]);
        assert_eq!(selection.ordered_ids(&clips), vec![ids[1]]);
        assert_eq!(selection.anchor(), Some(ids[1]));
    }

    #[test]
    fn rect_respects_track_bands() {
        let bands = TrackBands::default();
        let video = Clip::new(MediaKind::Video, "v", 1.0, 3.0);
        let audio = Clip::new(MediaKind::Audio, "a", 1.0, 3.0);
        // spans x 50..150 at 50 px/s, only the visual band vertically
        let rect = PixelRect::from_two_points((120.0, 50.0), (20.0, 60.0));
        assert!(rect.hits_clip(&video, 50.0, &bands));
        assert!(!rect.hits_clip(&audio, 50.0, &bands));

        let miss = PixelRect::from_two_points((160.0, 0.0), (300.0, 200.0));
        assert!(!miss.hits_clip(&video, 50.0, &bands));
    }

    #[test]
    fn marquee_activates_past_threshold() {
        let mut marquee = MarqueeSelection::new((10.0, 10.0));
        marquee.update((12.0, 11.0), 4.0);
        assert!(!marquee.active);
        marquee.update((30.0, 40.0), 4.0);
        assert!(marquee.active);
        marquee.update((11.0, 10.0), 4.0);
        assert!(marquee.active);
    }

    #[test]
    fn retain_existing_prunes_removed_ids() {
        let (mut clips, ids) = collection(&[(0.0, 1.0, MediaKind::Video), (2.0, 3.0, MediaKind::Video)]);
        let mut selection = SelectionState::new();
        selection.set_all(ids.clone());
        selection.set_anchor(Some(ids[0]));
        clips.remove(&[ids[0]]);
        selection.retain_existing(&clips);
        assert_eq!(selection.count(), 1);
        assert_eq!(selection.anchor(), None);
    }
}
