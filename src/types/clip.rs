use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

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
        self.0.fmt(f)
    }
}

/// Kind of the media asset a clip points at, as reported by the media collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

/// A half-open interval `[start, end)` on the timeline axis.
pub trait Span {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    fn length(&self) -> f64 {
        self.end() - self.start()
    }

    fn contains_time(&self, time: f64) -> bool {
        time >= self.start() && time < self.end()
    }

    /// Half-open overlap test against `[start, end)`.
    fn overlaps(&self, start: f64, end: f64) -> bool {
        start < self.end() && end > self.start()
    }
}

/// What the caller hands over when placing new media on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub media_id: String,
    pub name: String,
    pub media_kind: MediaKind,
    pub start_time: f64,
    pub duration: f64,
}

impl ClipSpec {
    pub fn new(
        media_id: impl Into<String>,
        name: impl Into<String>,
        media_kind: MediaKind,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            media_id: media_id.into(),
            name: name.into(),
            media_kind,
            start_time,
            duration,
        }
    }
}

/// One placed media reference on a track.
///
/// `duration` is the full length of the underlying media and never changes;
/// `trim_start`/`trim_end` carve the visible part out of it. Construction and
/// the crate's setters keep `trim_start + trim_end < duration` and
/// `start_time >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub(crate) id: ClipId,
    pub(crate) media_id: String,
    pub(crate) name: String,
    pub(crate) media_kind: MediaKind,
    pub(crate) duration: f64,
    pub(crate) start_time: f64,
    pub(crate) trim_start: f64,
    pub(crate) trim_end: f64,
}

impl Clip {
    pub fn new(spec: ClipSpec) -> Self {
        Clip {
            id: ClipId::new(),
            media_id: spec.media_id,
            name: spec.name,
            media_kind: spec.media_kind,
            duration: non_negative(spec.duration),
            start_time: non_negative(spec.start_time),
            trim_start: 0.0,
            trim_end: 0.0,
        }
    }

    /// A fresh clip over the same media with the same trims, under a new id.
    pub(crate) fn derive(&self, name: String, start_time: f64) -> Self {
        Clip {
            id: ClipId::new(),
            media_id: self.media_id.clone(),
            name,
            media_kind: self.media_kind,
            duration: self.duration,
            start_time: non_negative(start_time),
            trim_start: self.trim_start,
            trim_end: self.trim_end,
        }
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn media_id(&self) -> &str {
        &self.media_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn trim_start(&self) -> f64 {
        self.trim_start
    }

    pub fn trim_end(&self) -> f64 {
        self.trim_end
    }

    pub fn effective_duration(&self) -> f64 {
        self.duration - self.trim_start - self.trim_end
    }

    pub fn effective_end(&self) -> f64 {
        self.start_time + self.effective_duration()
    }

    pub(crate) fn set_start_time(&mut self, start_time: f64) {
        self.start_time = non_negative(start_time);
    }

    /// Overwrite both trims, clamped so at least `min_visible` of media remains.
    pub(crate) fn set_trim(&mut self, trim_start: f64, trim_end: f64, min_visible: f64) {
        let (trim_start, trim_end) = clamp_trim(self.duration, trim_start, trim_end, min_visible);
        self.trim_start = trim_start;
        self.trim_end = trim_end;
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Repair a clip that came from outside the engine (e.g. a loaded project
    /// file). Valid values are kept as they are, including trims that leave
    /// less than `min_visible`, which a near-edge split legitimately produces.
    /// Only when nothing of the media would remain are the trims re-clamped.
    pub(crate) fn normalize(&mut self, min_visible: f64) {
        self.duration = non_negative(self.duration);
        self.start_time = non_negative(self.start_time);
        self.trim_start = non_negative(self.trim_start);
        self.trim_end = non_negative(self.trim_end);
        if self.duration > 0.0 && self.trim_start + self.trim_end >= self.duration {
            self.set_trim(self.trim_start, self.trim_end, min_visible);
        }
    }
}

impl Span for Clip {
    fn start(&self) -> f64 {
        self.start_time
    }

    fn end(&self) -> f64 {
        self.effective_end()
    }
}

/// Clamp a pair of trims against a media duration.
///
/// Both trims end up in `[0, duration - min_visible]` and their sum never
/// exceeds `duration - min_visible`; `trim_start` wins when they compete.
/// Media shorter than `min_visible` cannot be trimmed at all.
pub fn clamp_trim(duration: f64, trim_start: f64, trim_end: f64, min_visible: f64) -> (f64, f64) {
    let limit = (non_negative(duration) - non_negative(min_visible)).max(0.0);
    let trim_start = non_negative(trim_start).min(limit);
    let trim_end = non_negative(trim_end).min(limit - trim_start);
    (trim_start, trim_end)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(duration: f64, start_time: f64) -> Clip {
        Clip::new(ClipSpec::new("media", "Clip", MediaKind::Video, start_time, duration))
    }

    #[test]
    fn test_new_clip_is_untrimmed() {
        let c = clip(10.0, 2.0);
        assert_eq!(c.trim_start(), 0.0);
        assert_eq!(c.trim_end(), 0.0);
        assert_eq!(c.effective_duration(), 10.0);
        assert_eq!(c.effective_end(), 12.0);
    }

    #[test]
    fn test_construction_sanitizes_timing() {
        let c = clip(-3.0, -1.0);
        assert_eq!(c.duration(), 0.0);
        assert_eq!(c.start_time(), 0.0);

        let c = clip(f64::NAN, f64::INFINITY);
        assert_eq!(c.duration(), 0.0);
        assert_eq!(c.start_time(), 0.0);
    }

    #[test]
    fn test_clamp_trim_limits() {
        assert_eq!(clamp_trim(10.0, -1.0, -2.0, 0.1), (0.0, 0.0));
        assert_eq!(clamp_trim(10.0, 2.0, 3.0, 0.1), (2.0, 3.0));

        let (s, e) = clamp_trim(10.0, 20.0, 5.0, 0.1);
        assert!((s - 9.9).abs() < 1e-9);
        assert_eq!(e, 0.0);

        let (s, e) = clamp_trim(10.0, 6.0, 6.0, 0.1);
        assert_eq!(s, 6.0);
        assert!((e - 3.9).abs() < 1e-9);
        assert!(s + e < 10.0);
    }

    #[test]
    fn test_clamp_trim_on_tiny_media() {
        assert_eq!(clamp_trim(0.05, 1.0, 1.0, 0.1), (0.0, 0.0));
    }

    #[test]
    fn test_set_trim_is_idempotent() {
        let mut c = clip(5.0, 0.0);
        c.set_trim(4.0, 4.0, 0.1);
        let first = (c.trim_start(), c.trim_end());
        c.set_trim(4.0, 4.0, 0.1);
        assert_eq!(first, (c.trim_start(), c.trim_end()));
        assert!(c.effective_duration() >= 0.1 - 1e-9);
    }

    #[test]
    fn test_span_overlap_is_half_open() {
        let c = clip(5.0, 10.0);
        assert!(c.overlaps(14.0, 16.0));
        assert!(c.overlaps(8.0, 11.0));
        assert!(!c.overlaps(15.0, 16.0));
        assert!(!c.overlaps(8.0, 10.0));
        assert!(c.contains_time(10.0));
        assert!(!c.contains_time(15.0));
    }

    #[test]
    fn test_derive_keeps_media_and_trims() {
        let mut c = clip(8.0, 0.0);
        c.set_trim(1.0, 2.0, 0.1);
        let d = c.derive("Copy".to_string(), 20.0);
        assert_ne!(d.id(), c.id());
        assert_eq!(d.media_id(), c.media_id());
        assert_eq!(d.trim_start(), 1.0);
        assert_eq!(d.trim_end(), 2.0);
        assert_eq!(d.start_time(), 20.0);
    }

    #[test]
    fn test_normalize_repairs_loaded_values() {
        let mut c = clip(4.0, 0.0);
        c.start_time = -2.0;
        c.trim_start = 3.0;
        c.trim_end = 3.0;
        c.normalize(0.1);
        assert_eq!(c.start_time(), 0.0);
        assert!(c.trim_start() + c.trim_end() <= 3.9 + 1e-9);
    }

    #[test]
    fn test_normalize_keeps_valid_short_remainder() {
        let mut c = clip(8.0, 0.0);
        c.trim_end = 7.95;
        c.normalize(0.1);
        assert_eq!(c.trim_start(), 0.0);
        assert_eq!(c.trim_end(), 7.95);

        c.trim_start = f64::NAN;
        c.trim_end = -1.0;
        c.normalize(0.1);
        assert_eq!((c.trim_start(), c.trim_end()), (0.0, 0.0));
    }
}
