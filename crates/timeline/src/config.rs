use serde::{Deserialize, Serialize};

use crate::{Seconds, TimelineError, TrackKind, MIN_DURATION};

/// Which anchor families the snap resolver considers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Enable snapping
    pub enabled: bool,

    /// Snap to zero and to the playback duration
    pub to_bounds: bool,

    /// Snap to playhead
    pub to_playhead: bool,

    /// Snap to other clips' edges
    pub to_clips: bool,

    /// Snap to lyric line timestamps
    pub to_lyrics: bool,

    /// Snap to the zoom-dependent grid
    pub to_grid: bool,

    /// Snap tolerance in pixels
    pub tolerance_px: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            to_bounds: true,
            to_playhead: true,
            to_clips: true,
            to_lyrics: true,
            to_grid: true,
            tolerance_px: 10.0,
        }
    }
}

impl SnapSettings {
    /// Toggle snapping on/off
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

/// Half-open vertical pixel band `[top, bottom)` a track occupies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn intersects(&self, top: f64, bottom: f64) -> bool {
        self.top < bottom && top < self.bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackBands {
    pub visual: Band,
    pub audio: Band,
}

impl Default for TrackBands {
    fn default() -> Self {
        Self {
            visual: Band::new(40.0, 100.0),
            audio: Band::new(110.0, 170.0),
        }
    }
}

impl TrackBands {
    pub fn band(&self, track: TrackKind) -> Band {
        match track {
            TrackKind::Visual => self.visual,
            TrackKind::Audio => self.audio,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 200.0,
        }
    }
}

impl ZoomBounds {
    pub fn clamp(&self, pixels_per_second: f64) -> f64 {
        pixels_per_second.clamp(self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub min_duration: Seconds,
    pub max_history: usize,
    /// Arrow-key nudge distance.
    pub nudge_step: Seconds,
    /// Marquee drags shorter than this are treated as a seek click.
    pub marquee_threshold_px: f64,
    pub zoom: ZoomBounds,
    pub track_bands: TrackBands,
    pub snap: SnapSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_duration: MIN_DURATION,
            max_history: 50,
            nudge_step: 0.1,
            marquee_threshold_px: 4.0,
            zoom: ZoomBounds::default(),
            track_bands: TrackBands::default(),
            snap: SnapSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), TimelineError> {
        let invalid = |msg: &str| Err(TimelineError::InvalidConfig(msg.to_string()));

        if !(self.min_duration.is_finite() && self.min_duration > 0.0) {
            return invalid("min_duration must be a positive number of seconds");
        }
        if self.max_history == 0 {
            return invalid("max_history must hold at least one entry");
        }
        if !(self.nudge_step.is_finite() && self.nudge_step > 0.0) {
            return invalid("nudge_step must be positive");
        }
        if !(self.marquee_threshold_px.is_finite() && self.marquee_threshold_px >= 0.0) {
            return invalid("marquee_threshold_px must not be negative");
        }
        if !(self.zoom.min > 0.0 && self.zoom.min <= self.zoom.max && self.zoom.max.is_finite()) {
            return invalid("zoom bounds must satisfy 0 < min <= max");
        }
        if !(self.snap.tolerance_px.is_finite() && self.snap.tolerance_px >= 0.0) {
            return invalid("snap tolerance must not be negative");
        }
        let TrackBands { visual, audio } = self.track_bands;
        if visual.top >= visual.bottom || audio.top >= audio.bottom {
            return invalid("track bands must have positive height");
        }
        if visual.intersects(audio.top, audio.bottom) {
            return invalid("visual and audio track bands overlap");
        }
        Ok(())
    }
}
