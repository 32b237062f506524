use serde::{Deserialize, Serialize};

use crate::{clamp_resize_end, clamp_resize_start, Clip, ClipId, Seconds, SnapContext, SnapHit};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Bounds proposed by one pointer move.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DragCandidate {
    pub start: Seconds,
    pub end: Seconds,
    pub snap: Option<SnapHit>,
}

/// State of one pointer gesture on a clip, from pointer-down to pointer-up.
///
/// Every update is computed from the bounds recorded at pointer-down, so
/// intermediate moves never accumulate rounding.
#[derive(Clone, Debug)]
pub struct DragSession {
    pub clip_id: ClipId,
    pub mode: DragMode,
    /// Pointer x in timeline pixels at pointer-down.
    pub pointer_origin_x: f64,
    pub original_start: Seconds,
    pub original_end: Seconds,
    last: Option<DragCandidate>,
}

impl DragSession {
    pub fn begin(clip: &Clip, mode: DragMode, pointer_x: f64) -> Self {
        Self {
            clip_id: clip.id,
            mode,
            pointer_origin_x: pointer_x,
            original_start: clip.start,
            original_end: clip.end,
            last: None,
        }
    }

    pub fn original_duration(&self) -> Seconds {
        self.original_end - self.original_start
    }

    /// Last candidate applied, if the pointer moved at all.
    pub fn last_candidate(&self) -> Option<DragCandidate> {
        self.last
    }

    /// Recomputes the clip bounds for the pointer at `pointer_x`. Returns
    /// `None` when the input is malformed; the previous candidate stays valid.
    pub fn update(
        &mut self,
        pointer_x: f64,
        snap: &SnapContext<'_>,
        min_duration: Seconds,
    ) -> Option<DragCandidate> {
        if !pointer_x.is_finite() || !(snap.pixels_per_second > 0.0) {
            return None;
        }
        let delta = (pointer_x - self.pointer_origin_x) / snap.pixels_per_second;

        let candidate = match self.mode {
            DragMode::Move => {
                let duration = self.original_duration();
                let (start, hit) = snap.resolve_move(self.original_start + delta, duration);
                let start = start.max(0.0);
                DragCandidate {
                    start,
                    end: start + duration,
                    snap: hit,
                }
            }
            DragMode::ResizeStart => {
                let hit = snap.resolve(self.original_start + delta);
                let proposed = hit.map_or(self.original_start + delta, |h| h.time);
                let (start, end) = clamp_resize_start(proposed, self.original_end, min_duration)?;
                DragCandidate { start, end, snap: hit }
            }
            DragMode::ResizeEnd => {
                let hit = snap.resolve(self.original_end + delta);
                let proposed = hit.map_or(self.original_end + delta, |h| h.time);
                let (start, end) = clamp_resize_end(self.original_start, proposed, min_duration)?;
                DragCandidate { start, end, snap: hit }
            }
        };

        tracing::trace!(
            clip = %self.clip_id,
            mode = ?self.mode,
            start = candidate.start,
            end = candidate.end,
            snapped = candidate.snap.is_some(),
            "drag candidate"
        );
        self.last = Some(candidate);
        Some(candidate)
    }
}
