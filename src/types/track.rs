use crate::ops::{gaps, overlap, snap};
use crate::types::clip::{Clip, ClipId, MediaKind};
use crate::types::timeline::Gap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Effects,
}

impl TrackKind {
    /// Whether media of `kind` may be placed on a track of this kind.
    ///
    /// Audio tracks take video media too: that is how separated audio plays
    /// back from the original file.
    pub fn accepts(self, kind: MediaKind) -> bool {
        match self {
            TrackKind::Video => matches!(kind, MediaKind::Video | MediaKind::Image),
            TrackKind::Audio => matches!(kind, MediaKind::Audio | MediaKind::Video),
            TrackKind::Effects => true,
        }
    }

    /// Track kind a freshly dropped piece of media lands on.
    pub fn for_media(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video | MediaKind::Image => TrackKind::Video,
            MediaKind::Audio => TrackKind::Audio,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Effects => "Effects",
        }
    }
}

/// A row of clips. Clips are stored in insertion order; every time-based
/// query treats them as intervals on one shared axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
    pub muted: bool,
}

impl Track {
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Track {
            id: TrackId::new(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            muted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clip(&self, clip_id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub(crate) fn clip_mut(&mut self, clip_id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    pub(crate) fn take_clip(&mut self, clip_id: ClipId) -> Option<Clip> {
        let idx = self.clips.iter().position(|c| c.id == clip_id)?;
        Some(self.clips.remove(idx))
    }

    /// Latest effective end of any clip, 0 for an empty track.
    pub fn end_time(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::effective_end)
            .fold(0.0, f64::max)
    }

    /// Sum of the clips' effective durations.
    pub fn covered_duration(&self) -> f64 {
        self.clips.iter().map(Clip::effective_duration).sum()
    }

    /// Clips ordered by start time.
    pub fn sorted_clips(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        clips
    }

    pub fn has_overlap(&self, start: f64, duration: f64, exclude: Option<ClipId>) -> bool {
        overlap::has_overlap(&self.clips, start, duration, exclude)
    }

    pub fn snap_to_edge(&self, time: f64, exclude: Option<ClipId>, threshold: f64) -> Option<f64> {
        snap::snap_to_edge(&self.clips, time, exclude, threshold)
    }

    pub fn gaps(&self, threshold: f64) -> Vec<Gap> {
        gaps::find_gaps(&self.clips, threshold)
    }

    pub fn overlapping_pairs(&self) -> Vec<(ClipId, ClipId)> {
        overlap::overlapping_pairs(&self.clips)
    }
}
