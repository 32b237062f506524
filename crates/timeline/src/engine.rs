//! The arrangement engine: one owned object holding the clip collection,
//! selection, history, clipboard and the in-flight gesture.
//!
//! Every committed edit goes through one private `commit` step, which
//! re-sorts the collection and records a history snapshot. Gesture updates
//! write bounds in place without committing so the render layer does not
//! relayout mid-drag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Clip, ClipCollection, ClipId, ClipPatch, Clipboard, DragCandidate, DragMode, DragSession,
    EngineConfig, HistoryManager, KeyCommand, MarqueeSelection, Seconds, SelectionState,
    SnapContext, SnapHit, TimelineError,
};

/// Playback-side inputs owned by external collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackState {
    pub total_duration: Seconds,
    pub playhead: Seconds,
    pub pixels_per_second: f64,
    pub lyric_anchors: Vec<Seconds>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            total_duration: 0.0,
            playhead: 0.0,
            pixels_per_second: 50.0,
            lyric_anchors: Vec::new(),
        }
    }
}

/// Modifier state of a clip click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickModifiers {
    /// Cmd/Ctrl: add or remove the clip.
    #[serde(default)]
    pub toggle: bool,
    /// Shift: extend from the anchor.
    #[serde(default)]
    pub range: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarqueeOutcome {
    /// The rectangle selected this many clips.
    Selected(usize),
    /// The drag was too short and became a click-to-seek.
    Seeked(Seconds),
}

pub type SeekHandler = Box<dyn FnMut(Seconds)>;

pub struct TimelineEngine {
    config: EngineConfig,
    clips: ClipCollection,
    selection: SelectionState,
    history: HistoryManager,
    clipboard: Clipboard,
    playback: PlaybackState,
    drag: Option<DragSession>,
    active_snap: Option<SnapHit>,
    marquee: Option<MarqueeSelection>,
    seek: Option<SeekHandler>,
}

impl fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineEngine")
            .field("clips", &self.clips.len())
            .field("selected", &self.selection.count())
            .field("history_index", &self.history.index())
            .field("history_len", &self.history.len())
            .field("drag", &self.drag)
            .field("marquee", &self.marquee)
            .finish()
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

fn snap_context<'a>(
    config: &'a EngineConfig,
    playback: &'a PlaybackState,
    clips: &'a [Clip],
    exclude: Option<ClipId>,
) -> SnapContext<'a> {
    SnapContext {
        settings: &config.snap,
        total_duration: playback.total_duration,
        playhead: playback.playhead,
        lyric_anchors: &playback.lyric_anchors,
        pixels_per_second: playback.pixels_per_second,
        clips,
        exclude,
    }
}

impl TimelineEngine {
    pub fn new(config: EngineConfig) -> Result<Self, TimelineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let history = HistoryManager::new(config.max_history, Vec::new());
        let playback = PlaybackState {
            pixels_per_second: config.zoom.clamp(PlaybackState::default().pixels_per_second),
            ..PlaybackState::default()
        };
        Self {
            config,
            clips: ClipCollection::new(),
            selection: SelectionState::new(),
            history,
            clipboard: Clipboard::new(),
            playback,
            drag: None,
            active_snap: None,
            marquee: None,
            seek: None,
        }
    }

    pub fn with_seek_handler(mut self, handler: impl FnMut(Seconds) + 'static) -> Self {
        self.set_seek_handler(handler);
        self
    }

    pub fn set_seek_handler(&mut self, handler: impl FnMut(Seconds) + 'static) {
        self.seek = Some(Box::new(handler));
    }

    // ---- read side -------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clips in committed order, or in live order while a drag is active.
    pub fn clips(&self) -> &[Clip] {
        self.clips.clips()
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    pub fn collection(&self) -> &ClipCollection {
        &self.clips
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<ClipId> {
        self.selection.ordered_ids(&self.clips)
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Anchor the active gesture is currently snapped to, for a guide line.
    pub fn active_snap(&self) -> Option<SnapHit> {
        self.active_snap
    }

    pub fn marquee(&self) -> Option<&MarqueeSelection> {
        self.marquee.as_ref()
    }

    // ---- playback inputs -------------------------------------------------

    pub fn set_total_duration(&mut self, duration: Seconds) {
        if duration.is_finite() && duration >= 0.0 {
            self.playback.total_duration = duration;
        }
    }

    pub fn set_playhead(&mut self, time: Seconds) {
        if time.is_finite() {
            self.playback.playhead = time.max(0.0);
        }
    }

    pub fn set_pixels_per_second(&mut self, pixels_per_second: f64) {
        if pixels_per_second.is_finite() {
            self.playback.pixels_per_second = self.config.zoom.clamp(pixels_per_second);
        }
    }

    pub fn set_lyric_anchors(&mut self, times: impl IntoIterator<Item = Seconds>) {
        self.playback.lyric_anchors = times.into_iter().filter(|t| t.is_finite()).collect();
    }

    fn request_seek(&mut self, time: Seconds) {
        tracing::debug!(time, "seek requested");
        if let Some(seek) = self.seek.as_mut() {
            seek(time);
        }
    }

    /// Click-to-seek on the timeline background.
    pub fn seek_to_pixel(&mut self, x: f64) -> Option<Seconds> {
        if !x.is_finite() {
            return None;
        }
        let mut time = (x / self.playback.pixels_per_second).max(0.0);
        if self.playback.total_duration > 0.0 {
            time = time.min(self.playback.total_duration);
        }
        self.request_seek(time);
        Some(time)
    }

    // ---- mutation entry points -------------------------------------------

    /// Committed edits are refused while a drag owns the pointer, so the live
    /// clip order and the history stay untouched until pointer-up.
    fn gesture_blocks(&self, action: &str) -> bool {
        match &self.drag {
            Some(drag) => {
                tracing::warn!(action, clip = %drag.clip_id, "edit ignored: gesture in progress");
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, label: &str) -> bool {
        self.clips.commit();
        let pushed = self.history.push(label, self.clips.snapshot());
        tracing::debug!(label, clips = self.clips.len(), pushed, "committed");
        pushed
    }

    /// Adds clips handed over by the import layer. Returns the ids that were
    /// accepted; malformed clips are dropped.
    pub fn add_clips(&mut self, clips: impl IntoIterator<Item = Clip>) -> Vec<ClipId> {
        if self.gesture_blocks("add clips") {
            return Vec::new();
        }
        let min_duration = self.config.min_duration;
        let added: Vec<ClipId> = clips
            .into_iter()
            .filter_map(|clip| self.clips.insert(clip, min_duration))
            .collect();
        if !added.is_empty() {
            self.commit("Add clips");
        }
        added
    }

    /// Removes clips. Removing any selected clip clears the selection.
    pub fn remove_clips(&mut self, ids: &[ClipId]) -> usize {
        if self.gesture_blocks("remove clips") {
            return 0;
        }
        let removed = self.clips.remove(ids);
        if removed.is_empty() {
            return 0;
        }
        if removed.iter().any(|clip| self.selection.is_selected(&clip.id)) {
            self.selection.clear();
        }
        self.commit("Remove clips");
        removed.len()
    }

    /// Applies a patch to one clip. Unknown ids and unrepairable patches
    /// leave everything unchanged.
    pub fn update_clip(&mut self, id: &ClipId, patch: &ClipPatch) -> bool {
        if self.gesture_blocks("update clip") {
            return false;
        }
        if !self.clips.update(id, patch, self.config.min_duration) {
            return false;
        }
        self.commit("Update clip");
        true
    }

    // ---- selection -------------------------------------------------------

    pub fn click_clip(&mut self, id: ClipId, modifiers: ClickModifiers) -> bool {
        if !self.clips.contains(&id) {
            return false;
        }
        if modifiers.range {
            self.selection.select_range(&self.clips, id);
        } else if modifiers.toggle {
            self.selection.toggle(id);
        } else {
            self.selection.select_only(id);
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selection.set_all(self.clips.ids().collect::<Vec<_>>());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn begin_marquee(&mut self, x: f64, y: f64) {
        self.marquee = Some(MarqueeSelection::new((x, y)));
    }

    /// Grows the rectangle; once past the click threshold the selection is
    /// replaced by whatever the rectangle touches.
    pub fn update_marquee(&mut self, x: f64, y: f64) -> Option<usize> {
        let marquee = self.marquee.as_mut()?;
        marquee.update((x, y), self.config.marquee_threshold_px);
        if !marquee.active {
            return None;
        }
        let rect = marquee.rect();
        let pps = self.playback.pixels_per_second;
        let bands = self.config.track_bands;
        self.selection
            .box_select(self.clips.clips(), |clip| rect.hits_clip(clip, pps, &bands));
        Some(self.selection.count())
    }

    pub fn end_marquee(&mut self, x: f64, y: f64) -> Option<MarqueeOutcome> {
        self.update_marquee(x, y);
        let marquee = self.marquee.take()?;
        if marquee.active {
            return Some(MarqueeOutcome::Selected(self.selection.count()));
        }
        self.selection.clear();
        self.seek_to_pixel(marquee.start_pos.0)
            .map(MarqueeOutcome::Seeked)
    }

    // ---- gestures --------------------------------------------------------

    /// Pointer-down on a clip body or edge handle. Ignored while another
    /// gesture owns the pointer or when the clip is unknown.
    pub fn pointer_down(&mut self, id: ClipId, mode: DragMode, pointer_x: f64) -> bool {
        if let Some(active) = &self.drag {
            tracing::warn!(active = %active.clip_id, requested = %id, "pointer-down ignored: gesture in progress");
            return false;
        }
        if !pointer_x.is_finite() {
            return false;
        }
        let Some(clip) = self.clips.get(&id) else {
            return false;
        };
        tracing::debug!(clip = %id, ?mode, pointer_x, "gesture begin");
        self.drag = Some(DragSession::begin(clip, mode, pointer_x));
        self.active_snap = None;
        true
    }

    /// Pointer-move during a gesture: recompute and apply live bounds.
    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<DragCandidate> {
        let drag = self.drag.as_mut()?;
        let candidate = {
            let context = snap_context(
                &self.config,
                &self.playback,
                self.clips.clips(),
                Some(drag.clip_id),
            );
            drag.update(pointer_x, &context, self.config.min_duration)?
        };
        self.clips
            .set_bounds(&drag.clip_id, candidate.start, candidate.end);
        self.active_snap = candidate.snap;
        Some(candidate)
    }

    /// Pointer-up: commits whatever the last candidate was as one history
    /// entry. Without an active gesture this is ignored.
    pub fn pointer_up(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.active_snap = None;
        let label = match drag.mode {
            DragMode::Move => "Move clip",
            DragMode::ResizeStart => "Trim clip start",
            DragMode::ResizeEnd => "Trim clip end",
        };
        tracing::debug!(clip = %drag.clip_id, mode = ?drag.mode, "gesture end");
        self.commit(label);
        true
    }

    /// Escape or focus loss. An active gesture is committed, not reverted.
    pub fn cancel_interaction(&mut self) {
        if self.drag.is_some() {
            self.pointer_up();
        }
        self.marquee = None;
        self.selection.clear();
    }

    // ---- editing commands ------------------------------------------------

    pub fn delete_selection(&mut self) -> usize {
        if self.selection.is_empty() || self.gesture_blocks("delete") {
            return 0;
        }
        let ids = self.selected_ids();
        self.selection.clear();
        let removed = self.clips.remove(&ids);
        if !removed.is_empty() {
            self.commit("Delete clips");
        }
        removed.len()
    }

    /// Shifts every selected clip by one nudge step (`direction` < 0 moves
    /// left). Seeks to the first selected clip's new start when it moved.
    pub fn nudge_selection(&mut self, direction: f64) -> bool {
        if !direction.is_finite() || direction == 0.0 || self.gesture_blocks("nudge") {
            return false;
        }
        let ids = self.selected_ids();
        let Some(first) = ids.first().copied() else {
            return false;
        };
        let first_start = self.clips.get(&first).map(|c| c.start);
        let step = self.config.nudge_step * direction.signum();
        for id in &ids {
            if let Some(clip) = self.clips.get(id) {
                let delta = step.max(-clip.start);
                let (start, end) = (clip.start + delta, clip.end + delta);
                self.clips.set_bounds(id, start, end);
            }
        }
        self.commit("Nudge clips");
        let moved_start = self.clips.get(&first).map(|c| c.start);
        if let Some(start) = moved_start.filter(|s| Some(*s) != first_start) {
            self.request_seek(start);
        }
        true
    }

    pub fn copy(&mut self) -> usize {
        let ids = self.selected_ids();
        let clips = ids.iter().filter_map(|id| self.clips.get(id));
        self.clipboard.store(clips)
    }

    pub fn cut(&mut self) -> usize {
        if self.gesture_blocks("cut") {
            return 0;
        }
        let copied = self.copy();
        if copied > 0 {
            self.delete_selection();
        }
        copied
    }

    /// Pastes the clipboard so its earliest clip starts at the playhead and
    /// selects exactly the new clips.
    pub fn paste(&mut self) -> Vec<ClipId> {
        if self.gesture_blocks("paste") {
            return Vec::new();
        }
        let fresh = self.clipboard.instantiate(self.playback.playhead);
        if fresh.is_empty() {
            return Vec::new();
        }
        let min_duration = self.config.min_duration;
        let pasted: Vec<ClipId> = fresh
            .into_iter()
            .filter_map(|clip| self.clips.insert(clip, min_duration))
            .collect();
        self.commit("Paste clips");
        self.selection.set_all(pasted.iter().copied());
        self.selection.set_anchor(pasted.first().copied());
        tracing::debug!(count = pasted.len(), at = self.playback.playhead, "pasted");
        pasted
    }

    // ---- history ---------------------------------------------------------

    fn restore(&mut self, clips: Vec<Clip>) {
        self.clips = ClipCollection::from_snapshot(clips);
        self.selection.retain_existing(&self.clips);
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture_blocks("undo") {
            return false;
        }
        let Some(entry) = self.history.undo() else {
            return false;
        };
        let clips = entry.clips.clone();
        self.restore(clips);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture_blocks("redo") {
            return false;
        }
        let Some(entry) = self.history.redo() else {
            return false;
        };
        let clips = entry.clips.clone();
        self.restore(clips);
        true
    }

    /// Makes the current collection the only history entry.
    pub fn reset_history(&mut self) {
        if self.gesture_blocks("reset history") {
            return;
        }
        self.history.reset(self.clips.snapshot());
    }

    // ---- keyboard --------------------------------------------------------

    /// Runs a keyboard command. Nothing happens while a text field has focus.
    pub fn handle_key(&mut self, command: KeyCommand, text_focus: bool) -> bool {
        if text_focus {
            return false;
        }
        match command {
            KeyCommand::Delete => self.delete_selection() > 0,
            KeyCommand::NudgeLeft => self.nudge_selection(-1.0),
            KeyCommand::NudgeRight => self.nudge_selection(1.0),
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::Copy => self.copy() > 0,
            KeyCommand::Cut => self.cut() > 0,
            KeyCommand::Paste => !self.paste().is_empty(),
            KeyCommand::ToggleSnap => {
                self.config.snap.toggle();
                tracing::debug!(enabled = self.config.snap.enabled, "snapping toggled");
                true
            }
            KeyCommand::SelectAll => {
                self.select_all();
                true
            }
            KeyCommand::DeselectAll => {
                self.cancel_interaction();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MediaKind, SnapAnchor};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine_with(spans: &[(f64, f64)]) -> (TimelineEngine, Vec<ClipId>) {
        let mut engine = TimelineEngine::default();
        let ids = engine.add_clips(
            spans
                .iter()
                .map(|(s, e)| Clip::new(MediaKind::Video, "clip.mp4", *s, *e)),
        );
        (engine, ids)
    }

    #[test]
    fn drag_commits_one_history_entry() {
        let (mut engine, ids) = engine_with(&[(0.0, 5.0), (5.0, 10.0)]);
        engine.set_pixels_per_second(40.0);
        let before = engine.history().len();

        assert!(engine.pointer_down(ids[1], DragMode::ResizeStart, 200.0));
        for x in [199.0, 198.5, 198.0] {
            engine.pointer_move(x);
        }
        assert_eq!(engine.history().len(), before);
        assert_eq!(
            engine.active_snap().map(|s| s.anchor),
            Some(SnapAnchor::ClipEnd(ids[0]))
        );
        assert!(engine.pointer_up());
        assert_eq!(engine.clip(&ids[1]).map(|c| c.start), Some(5.0));
        assert!(engine.active_snap().is_none());
        // snapped back to the original start: nothing to record
        assert_eq!(engine.history().len(), before);
    }

    #[test]
    fn live_drag_does_not_reorder_until_pointer_up() {
        let (mut engine, ids) = engine_with(&[(0.0, 2.0), (10.0, 12.0)]);
        engine.set_pixels_per_second(100.0);
        engine.pointer_down(ids[0], DragMode::Move, 0.0);
        engine.pointer_move(2033.0);
        assert_eq!(engine.clips()[0].id, ids[0]);
        engine.pointer_up();
        assert_eq!(engine.clips()[0].id, ids[1]);
        assert!(engine.collection().is_sorted());
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let (mut engine, ids) = engine_with(&[(0.0, 2.0), (4.0, 6.0)]);
        assert!(engine.pointer_down(ids[0], DragMode::Move, 0.0));
        assert!(!engine.pointer_down(ids[1], DragMode::Move, 0.0));
        assert_eq!(engine.drag_session().map(|d| d.clip_id), Some(ids[0]));
    }

    #[test]
    fn pointer_up_without_gesture_is_ignored() {
        let (mut engine, _) = engine_with(&[(0.0, 2.0)]);
        assert!(!engine.pointer_up());
        assert!(engine.pointer_move(10.0).is_none());
    }

    #[test]
    fn nudge_shifts_selection_and_seeks() {
        let seeks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seeks);
        let (engine, ids) = engine_with(&[(0.05, 1.0), (3.0, 4.0)]);
        let mut engine = engine.with_seek_handler(move |t| sink.borrow_mut().push(t));

        engine.select_all();
        assert!(engine.handle_key(KeyCommand::NudgeLeft, false));
        let first = engine.clip(&ids[0]).unwrap();
        assert_eq!(first.start, 0.0);
        assert!((first.end - 0.95).abs() < 1e-9);
        let second = engine.clip(&ids[1]).unwrap();
        assert!((second.start - 2.9).abs() < 1e-9);
        assert_eq!(seeks.borrow().as_slice(), &[0.0]);
    }

    #[test]
    fn edits_wait_for_pointer_up() {
        let (mut engine, ids) = engine_with(&[(0.0, 2.0), (10.0, 12.0)]);
        engine.set_pixels_per_second(100.0);
        engine.click_clip(ids[1], ClickModifiers::default());
        engine.pointer_down(ids[0], DragMode::Move, 0.0);
        engine.pointer_move(2033.0);
        let history_len = engine.history_len();

        assert!(!engine.handle_key(KeyCommand::NudgeRight, false));
        assert!(!engine.handle_key(KeyCommand::Delete, false));
        assert!(!engine.handle_key(KeyCommand::Undo, false));
        assert!(engine.add_clips([Clip::new(MediaKind::Audio, "a.wav", 1.0, 2.0)]).is_empty());
        let order: Vec<ClipId> = engine.clips().iter().map(|c| c.id).collect();
        assert_eq!(order, ids);
        assert_eq!(engine.clip(&ids[1]).map(|c| c.start), Some(10.0));
        assert_eq!(engine.history_len(), history_len);

        assert!(engine.pointer_up());
        assert_eq!(engine.history_len(), history_len + 1);
        assert!(engine.undo());
        assert_eq!(engine.clip(&ids[0]).map(|c| c.start), Some(0.0));
    }

    #[test]
    fn nudge_against_zero_does_not_seek() {
        let seeks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seeks);
        let (engine, ids) = engine_with(&[(0.0, 1.0)]);
        let mut engine = engine.with_seek_handler(move |t| sink.borrow_mut().push(t));
        engine.click_clip(ids[0], ClickModifiers::default());

        engine.nudge_selection(-1.0);
        assert!(seeks.borrow().is_empty());
        engine.nudge_selection(1.0);
        assert_eq!(seeks.borrow().len(), 1);
    }

    #[test]
    fn removing_a_selected_clip_clears_selection() {
        let (mut engine, ids) = engine_with(&[(0.0, 1.0), (2.0, 3.0), (4.0, 5.0)]);
        engine.click_clip(ids[0], ClickModifiers::default());
        engine.click_clip(ids[1], ClickModifiers { toggle: true, range: false });
        engine.remove_clips(&[ids[2]]);
        assert_eq!(engine.selection().count(), 2);
        engine.remove_clips(&[ids[1]]);
        assert!(engine.selection().is_empty());
        assert!(engine.selection().anchor().is_none());
    }

    #[test]
    fn snap_key_toggles_snapping() {
        let (mut engine, ids) = engine_with(&[(0.0, 5.0), (5.0, 10.0)]);
        engine.set_pixels_per_second(40.0);
        assert!(engine.handle_key(KeyCommand::ToggleSnap, false));
        assert!(!engine.config().snap.enabled);
        engine.pointer_down(ids[1], DragMode::ResizeStart, 200.0);
        let candidate = engine.pointer_move(198.0).unwrap();
        assert!((candidate.start - 4.95).abs() < 1e-9);
        assert!(candidate.snap.is_none());
    }

    #[test]
    fn text_focus_disables_keys() {
        let (mut engine, _) = engine_with(&[(0.0, 2.0)]);
        engine.select_all();
        assert!(!engine.handle_key(KeyCommand::Delete, true));
        assert_eq!(engine.clips().len(), 1);
        assert!(engine.handle_key(KeyCommand::Delete, false));
        assert!(engine.clips().is_empty());
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn short_marquee_seeks_and_clears_selection() {
        let seeks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seeks);
        let (mut engine, _) = engine_with(&[(0.0, 2.0)]);
        engine.set_seek_handler(move |t| sink.borrow_mut().push(t));
        engine.set_pixels_per_second(100.0);
        engine.select_all();

        engine.begin_marquee(250.0, 60.0);
        let outcome = engine.end_marquee(251.0, 61.0);
        assert_eq!(outcome, Some(MarqueeOutcome::Seeked(2.5)));
        assert!(engine.selection().is_empty());
        assert_eq!(seeks.borrow().as_slice(), &[2.5]);
    }

    #[test]
    fn marquee_replaces_selection_by_track() {
        let mut engine = TimelineEngine::default();
        engine.set_pixels_per_second(100.0);
        let ids = engine.add_clips([
            Clip::new(MediaKind::Video, "v.mp4", 0.0, 2.0),
            Clip::new(MediaKind::Audio, "a.wav", 0.0, 2.0),
            Clip::new(MediaKind::Image, "i.png", 5.0, 6.0),
        ]);
        engine.click_clip(ids[2], ClickModifiers::default());

        engine.begin_marquee(50.0, 45.0);
        assert_eq!(engine.update_marquee(150.0, 90.0), Some(1));
        assert_eq!(engine.selected_ids(), vec![ids[0]]);
        assert_eq!(engine.update_marquee(150.0, 150.0), Some(2));
        assert_eq!(
            engine.end_marquee(150.0, 150.0),
            Some(MarqueeOutcome::Selected(2))
        );
        assert!(!engine.selection().is_selected(&ids[2]));
    }

    #[test]
    fn cancel_commits_active_gesture() {
        let (mut engine, ids) = engine_with(&[(0.0, 2.0)]);
        engine.set_pixels_per_second(100.0);
        engine.click_clip(ids[0], ClickModifiers::default());
        engine.pointer_down(ids[0], DragMode::ResizeEnd, 200.0);
        engine.pointer_move(333.0);
        engine.cancel_interaction();
        assert!(engine.drag_session().is_none());
        assert!(engine.selection().is_empty());
        let clip = engine.clip(&ids[0]).unwrap();
        assert!((clip.end - 3.33).abs() < 1e-9);
        assert!(engine.can_undo());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            min_duration: 0.0,
            ..EngineConfig::default()
        };
        assert!(TimelineEngine::new(config).is_err());
    }
}
