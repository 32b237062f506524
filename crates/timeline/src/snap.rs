//! Snap resolution for dragged clip edges.
//!
//! A proposed time is compared against every anchor the current
//! [`SnapSettings`] allow: timeline bounds, the playhead, the edges of the
//! other clips, lyric timestamps and the nearest grid line. The closest anchor
//! inside the pixel tolerance wins; on an exact tie the first anchor found is
//! kept, in the order listed above.

use serde::{Deserialize, Serialize};

use crate::{Clip, ClipId, Seconds, SnapSettings};

/// Anchor family that produced a snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapAnchor {
    Zero,
    Duration,
    Playhead,
    ClipStart(ClipId),
    ClipEnd(ClipId),
    Lyric,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapHit {
    pub time: Seconds,
    pub anchor: SnapAnchor,
}

/// Everything the resolver reads. Borrowed for the duration of one query.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    pub settings: &'a SnapSettings,
    pub total_duration: Seconds,
    pub playhead: Seconds,
    pub lyric_anchors: &'a [Seconds],
    pub pixels_per_second: f64,
    pub clips: &'a [Clip],
    /// Clip being manipulated; its own edges are never anchors.
    pub exclude: Option<ClipId>,
}

/// Grid spacing for the current zoom: finer lines as the view zooms in.
pub fn grid_interval(pixels_per_second: f64) -> Seconds {
    if pixels_per_second >= 150.0 {
        0.5
    } else if pixels_per_second >= 100.0 {
        1.0
    } else if pixels_per_second >= 60.0 {
        2.0
    } else if pixels_per_second >= 40.0 {
        5.0
    } else if pixels_per_second >= 25.0 {
        10.0
    } else {
        15.0
    }
}

impl<'a> SnapContext<'a> {
    /// Pixel tolerance converted to seconds at the current zoom.
    pub fn tolerance(&self) -> Seconds {
        if self.pixels_per_second > 0.0 {
            self.settings.tolerance_px / self.pixels_per_second
        } else {
            0.0
        }
    }

    fn anchors(&self, proposed: Seconds) -> Vec<(Seconds, SnapAnchor)> {
        let settings = self.settings;
        let mut anchors = Vec::new();

        if settings.to_bounds {
            anchors.push((0.0, SnapAnchor::Zero));
            anchors.push((self.total_duration, SnapAnchor::Duration));
        }
        if settings.to_playhead {
            anchors.push((self.playhead, SnapAnchor::Playhead));
        }
        if settings.to_clips {
            for clip in self.clips {
                if Some(clip.id) == self.exclude {
                    continue;
                }
                anchors.push((clip.start, SnapAnchor::ClipStart(clip.id)));
                anchors.push((clip.end, SnapAnchor::ClipEnd(clip.id)));
            }
        }
        if settings.to_lyrics {
            anchors.extend(self.lyric_anchors.iter().map(|t| (*t, SnapAnchor::Lyric)));
        }
        if settings.to_grid && self.pixels_per_second > 0.0 {
            let interval = grid_interval(self.pixels_per_second);
            anchors.push(((proposed / interval).round() * interval, SnapAnchor::Grid));
        }

        anchors
    }

    /// Nearest anchor within tolerance of `proposed`, if any.
    pub fn resolve(&self, proposed: Seconds) -> Option<SnapHit> {
        if !self.settings.enabled || !proposed.is_finite() {
            return None;
        }
        let tolerance = self.tolerance();
        let mut best: Option<(SnapHit, Seconds)> = None;

        for (time, anchor) in self.anchors(proposed) {
            if !time.is_finite() {
                continue;
            }
            let dist = (proposed - time).abs();
            if dist > tolerance {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((SnapHit { time, anchor }, dist)),
            }
        }

        best.map(|(hit, _)| hit)
    }

    /// Snapped time, or `proposed` unchanged when nothing is in reach.
    pub fn resolve_time(&self, proposed: Seconds) -> Seconds {
        self.resolve(proposed).map_or(proposed, |hit| hit.time)
    }

    /// Snaps a whole clip being moved. Start and end are tested independently;
    /// the smaller deviation decides the start and the duration is preserved.
    pub fn resolve_move(
        &self,
        proposed_start: Seconds,
        duration: Seconds,
    ) -> (Seconds, Option<SnapHit>) {
        let start_hit = self.resolve(proposed_start);
        let end_hit = self.resolve(proposed_start + duration);

        let start_dev = start_hit.map(|hit| (hit.time - proposed_start).abs());
        let end_dev = end_hit.map(|hit| (hit.time - (proposed_start + duration)).abs());

        match (start_hit, end_hit) {
            (Some(s), Some(e)) => {
                if start_dev <= end_dev {
                    (s.time, Some(s))
                } else {
                    (e.time - duration, Some(e))
                }
            }
            (Some(s), None) => (s.time, Some(s)),
            (None, Some(e)) => (e.time - duration, Some(e)),
            (None, None) => (proposed_start, None),
        }
    }
}
