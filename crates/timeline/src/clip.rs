use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Seconds;

/// Shortest interval a clip may occupy on the timeline.
pub const MIN_DURATION: Seconds = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ClipId(pub Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to the imported media resource. The engine never dereferences it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct SourceRef(pub String);

impl From<&str> for SourceRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Track family the clip is laid out on.
    pub fn track(&self) -> TrackKind {
        match self {
            Self::Image | Self::Video => TrackKind::Visual,
            Self::Audio => TrackKind::Audio,
        }
    }

    /// Whether `muted` and `volume` mean anything for this kind.
    pub fn has_audio(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

/// Visual and audio tracks are disjoint and never share overlap checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Visual,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    #[serde(default)]
    pub id: ClipId,
    pub media_kind: MediaKind,
    pub source: SourceRef,
    pub start: Seconds,
    pub end: Seconds,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub layer: Option<u32>,
}

fn default_volume() -> f32 {
    1.0
}

impl Clip {
    pub fn new(
        media_kind: MediaKind,
        source: impl Into<SourceRef>,
        start: Seconds,
        end: Seconds,
    ) -> Self {
        Self {
            id: ClipId::new(),
            media_kind,
            source: source.into(),
            start,
            end,
            display_name: String::new(),
            muted: false,
            volume: default_volume(),
            layer: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn duration(&self) -> Seconds {
        self.end - self.start
    }

    pub fn track(&self) -> TrackKind {
        self.media_kind.track()
    }

    pub fn contains(&self, time: Seconds) -> bool {
        time >= self.start && time < self.end
    }

    /// Copy of this clip under a fresh identity, shifted by `offset` seconds.
    pub fn duplicate_shifted(&self, offset: Seconds) -> Self {
        Self {
            id: ClipId::new(),
            start: self.start + offset,
            end: self.end + offset,
            ..self.clone()
        }
    }

    /// Applies the interval invariant in place. Returns `false` and leaves the
    /// clip untouched when the times cannot be repaired.
    pub fn sanitize(&mut self, min_duration: Seconds) -> bool {
        let Some((start, end)) = clamp_interval(self.start, self.end, min_duration) else {
            return false;
        };
        self.start = start;
        self.end = end;
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            default_volume()
        };
        true
    }
}

/// Partial update accepted by [`crate::TimelineEngine::update_clip`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClipPatch {
    #[serde(default)]
    pub start: Option<Seconds>,
    #[serde(default)]
    pub end: Option<Seconds>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub muted: Option<bool>,
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default)]
    pub layer: Option<Option<u32>>,
}

impl ClipPatch {
    pub fn times(start: Seconds, end: Seconds) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Produces the patched clip, or `None` when the result would violate the
    /// interval invariant beyond repair.
    pub fn apply_to(&self, clip: &Clip, min_duration: Seconds) -> Option<Clip> {
        let mut next = clip.clone();
        if let Some(start) = self.start {
            next.start = start;
        }
        if let Some(end) = self.end {
            next.end = end;
        }
        if let Some(name) = &self.display_name {
            next.display_name = name.clone();
        }
        if let Some(muted) = self.muted {
            next.muted = muted;
        }
        if let Some(volume) = self.volume {
            next.volume = volume;
        }
        if let Some(layer) = self.layer {
            next.layer = layer;
        }

        let (start, end) = match (self.start, self.end) {
            (Some(_), None) => clamp_resize_start(next.start, next.end, min_duration)?,
            (None, Some(_)) => clamp_resize_end(next.start, next.end, min_duration)?,
            _ => clamp_interval(next.start, next.end, min_duration)?,
        };
        next.start = start;
        next.end = end;
        next.sanitize(min_duration).then_some(next)
    }
}

fn valid(min_duration: Seconds, times: &[Seconds]) -> bool {
    min_duration.is_finite() && min_duration > 0.0 && times.iter().all(|t| t.is_finite())
}

/// General repair: start is pulled to zero, end is pushed out to honour the
/// minimum duration.
pub fn clamp_interval(
    start: Seconds,
    end: Seconds,
    min_duration: Seconds,
) -> Option<(Seconds, Seconds)> {
    if !valid(min_duration, &[start, end]) {
        return None;
    }
    let start = start.max(0.0);
    let end = end.max(start + min_duration);
    Some((start, end))
}

/// Repair for a moved start edge: the end edge is fixed.
pub fn clamp_resize_start(
    start: Seconds,
    end: Seconds,
    min_duration: Seconds,
) -> Option<(Seconds, Seconds)> {
    if !valid(min_duration, &[start, end]) || end < min_duration {
        return None;
    }
    let start = start.min(end - min_duration).max(0.0);
    Some((start, end))
}

/// Repair for a moved end edge: the start edge is fixed.
pub fn clamp_resize_end(
    start: Seconds,
    end: Seconds,
    min_duration: Seconds,
) -> Option<(Seconds, Seconds)> {
    if !valid(min_duration, &[start, end]) || start < 0.0 {
        return None;
    }
    Some((start, end.max(start + min_duration)))
}
