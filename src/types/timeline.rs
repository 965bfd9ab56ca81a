use crate::ops::clip_ops::{self, SplitSuffix};
use crate::ops::{gaps, snap};
use crate::types::clip::{Clip, ClipId, ClipSpec, Span};
use crate::types::config::EngineConfig;
use crate::types::track::{Track, TrackId, TrackKind};
use serde::{Deserialize, Serialize};

/// An uncovered stretch between two consecutive clips on a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

impl Span for Gap {
    fn start(&self) -> f64 {
        self.start_time
    }

    fn end(&self) -> f64 {
        self.end_time
    }
}

/// The ordered stack of tracks. Order is visual only.
///
/// Methods here are plain structural transforms with no history; they report
/// "nothing happened" through `None`/`false` and leave the timeline untouched
/// in that case. `EditorSession` wraps them with undo support.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline { tracks: Vec::new() }
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub(crate) fn track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    pub fn clip(&self, track_id: TrackId, clip_id: ClipId) -> Option<&Clip> {
        self.track(track_id)?.clip(clip_id)
    }

    /// Locate a clip anywhere on the timeline.
    pub fn find_clip(&self, clip_id: ClipId) -> Option<(&Track, &Clip)> {
        self.tracks
            .iter()
            .find_map(|t| t.clip(clip_id).map(|c| (t, c)))
    }

    pub fn contains(&self, track_id: TrackId, clip_id: ClipId) -> bool {
        self.clip(track_id, clip_id).is_some()
    }

    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    fn next_track_name(&self, kind: TrackKind) -> String {
        let n = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        format!("{} {}", kind.label(), n)
    }

    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let track = Track::new(kind, self.next_track_name(kind));
        let id = track.id;
        self.tracks.push(track);
        id
    }

    pub fn remove_track(&mut self, track_id: TrackId) -> Option<Track> {
        let idx = self.tracks.iter().position(|t| t.id == track_id)?;
        Some(self.tracks.remove(idx))
    }

    /// Drop every track that has no clips left. Returns how many went.
    pub fn prune_empty_tracks(&mut self) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|t| !t.is_empty());
        before - self.tracks.len()
    }

    pub fn add_clip(&mut self, track_id: TrackId, spec: ClipSpec) -> Option<ClipId> {
        self.insert_clip(track_id, Clip::new(spec))
    }

    pub(crate) fn insert_clip(&mut self, track_id: TrackId, clip: Clip) -> Option<ClipId> {
        let track = self.track_mut(track_id)?;
        let id = clip.id;
        track.clips.push(clip);
        Some(id)
    }

    /// Remove a clip, pruning its track if that was the last clip.
    pub fn remove_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Option<Clip> {
        let clip = self.track_mut(track_id)?.take_clip(clip_id)?;
        self.prune_empty_tracks();
        Some(clip)
    }

    /// Relocate a clip verbatim to another track. The source track is pruned
    /// if it ends up empty.
    pub fn move_clip(&mut self, from: TrackId, to: TrackId, clip_id: ClipId) -> bool {
        if from == to || self.track(to).is_none() {
            return false;
        }
        let Some(clip) = self.track_mut(from).and_then(|t| t.take_clip(clip_id)) else {
            return false;
        };
        if let Some(target) = self.track_mut(to) {
            target.clips.push(clip);
        }
        self.prune_empty_tracks();
        true
    }

    pub fn set_clip_trim(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        trim_start: f64,
        trim_end: f64,
        min_visible: f64,
    ) -> bool {
        match self.track_mut(track_id).and_then(|t| t.clip_mut(clip_id)) {
            Some(clip) => {
                clip.set_trim(trim_start, trim_end, min_visible);
                true
            }
            None => false,
        }
    }

    pub fn set_clip_start_time(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        start_time: f64,
    ) -> bool {
        match self.track_mut(track_id).and_then(|t| t.clip_mut(clip_id)) {
            Some(clip) => {
                clip.set_start_time(start_time);
                true
            }
            None => false,
        }
    }

    pub fn rename_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        name: impl Into<String>,
    ) -> bool {
        match self.track_mut(track_id).and_then(|t| t.clip_mut(clip_id)) {
            Some(clip) => {
                clip.rename(name.into());
                true
            }
            None => false,
        }
    }

    /// Flip the mute flag. Returns the new state.
    pub fn toggle_mute(&mut self, track_id: TrackId) -> Option<bool> {
        let track = self.track_mut(track_id)?;
        track.muted = !track.muted;
        Some(track.muted)
    }

    /// Split one clip at `time`. The new right-hand clip is inserted directly
    /// after the original and its id returned.
    pub fn split_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        time: f64,
        suffix: SplitSuffix,
    ) -> Option<ClipId> {
        let track = self.track_mut(track_id)?;
        let idx = track.clips.iter().position(|c| c.id == clip_id)?;
        let (left, right) = clip_ops::cut_clip_at(&track.clips[idx], time, suffix)?;
        let right_id = right.id;
        track.clips[idx] = left;
        track.clips.insert(idx + 1, right);
        Some(right_id)
    }

    /// Split every clip under `time`, on every track.
    pub fn split_at(&mut self, time: f64, suffix: SplitSuffix) -> Vec<ClipId> {
        let targets: Vec<(TrackId, ClipId)> = self
            .active_clips_at(time)
            .into_iter()
            .map(|(t, c)| (t.id, c.id))
            .collect();
        targets
            .into_iter()
            .filter_map(|(track_id, clip_id)| self.split_clip(track_id, clip_id, time, suffix))
            .collect()
    }

    pub fn duplicate_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        gap: f64,
    ) -> Option<ClipId> {
        let copy = clip_ops::duplicate_clip(self.clip(track_id, clip_id)?, gap);
        self.insert_clip(track_id, copy)
    }

    /// Add a held-frame clip at `playhead`. It goes on the source's track when
    /// that window is free there, otherwise on a new track of the same kind.
    pub fn freeze_frame(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        playhead: f64,
        config: &EngineConfig,
    ) -> Option<(TrackId, ClipId)> {
        let track = self.track(track_id)?;
        let frozen = clip_ops::freeze_frame_clip(
            track.clip(clip_id)?,
            playhead,
            config.freeze_duration,
            config.min_visible_duration,
        )?;
        let kind = track.kind;
        let blocked = track.has_overlap(frozen.start_time, frozen.effective_duration(), None);

        let target = if blocked { self.add_track(kind) } else { track_id };
        let id = self.insert_clip(target, frozen)?;
        Some((target, id))
    }

    /// Put the audio of a video clip on a new audio track, referencing the same media.
    pub fn separate_audio(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
    ) -> Option<(TrackId, ClipId)> {
        let track = self.track(track_id)?;
        if track.kind != TrackKind::Video {
            return None;
        }
        let audio = clip_ops::separated_audio_clip(track.clip(clip_id)?)?;
        let audio_track = self.add_track(TrackKind::Audio);
        let id = self.insert_clip(audio_track, audio)?;
        Some((audio_track, id))
    }

    pub fn close_gaps(&mut self, track_id: TrackId) -> bool {
        match self.track_mut(track_id) {
            Some(track) => gaps::close_gaps(&mut track.clips),
            None => false,
        }
    }

    /// Latest effective end over all tracks; 0 for an empty timeline.
    pub fn total_duration(&self) -> f64 {
        self.tracks.iter().map(Track::end_time).fold(0.0, f64::max)
    }

    /// `total_duration` with a caller-chosen floor, for rulers and scrollbars.
    pub fn display_duration(&self, min_duration: f64) -> f64 {
        self.total_duration().max(min_duration)
    }

    /// Gaps on one track; empty if the track does not exist.
    pub fn gaps_in_track(&self, track_id: TrackId, threshold: f64) -> Vec<Gap> {
        self.track(track_id)
            .map(|t| t.gaps(threshold))
            .unwrap_or_default()
    }

    /// Overlap predicate for a candidate placement. A missing track has nothing to collide with.
    pub fn has_overlap(
        &self,
        track_id: TrackId,
        start: f64,
        duration: f64,
        exclude: Option<ClipId>,
    ) -> bool {
        self.track(track_id)
            .is_some_and(|t| t.has_overlap(start, duration, exclude))
    }

    pub fn snap_to_edge(
        &self,
        track_id: TrackId,
        time: f64,
        exclude: Option<ClipId>,
        threshold: f64,
    ) -> Option<f64> {
        self.track(track_id)?.snap_to_edge(time, exclude, threshold)
    }

    /// Like `snap_to_edge`, but considers clip edges on every track.
    pub fn snap_to_edge_any_track(
        &self,
        time: f64,
        exclude: Option<ClipId>,
        threshold: f64,
    ) -> Option<f64> {
        let points = self
            .tracks
            .iter()
            .flat_map(|t| snap::snap_points(&t.clips, exclude));
        snap::nearest_within(points, time, threshold)
    }

    /// Returns every clip under `time`, paired with its track.
    pub fn active_clips_at(&self, time: f64) -> Vec<(&Track, &Clip)> {
        self.tracks
            .iter()
            .flat_map(|track| {
                track
                    .clips
                    .iter()
                    .filter(move |clip| clip.contains_time(time))
                    .map(move |clip| (track, clip))
            })
            .collect()
    }

    /// Returns every clip intersecting `[start, end)`.
    pub fn clips_in_range(&self, start: f64, end: f64) -> Vec<(&Track, &Clip)> {
        self.tracks
            .iter()
            .flat_map(|track| {
                track
                    .clips
                    .iter()
                    .filter(move |clip| clip.overlaps(start, end))
                    .map(move |clip| (track, clip))
            })
            .collect()
    }

    /// First track of the media's default kind where `spec` fits without overlap.
    pub fn find_free_track(&self, spec: &ClipSpec) -> Option<TrackId> {
        let kind = TrackKind::for_media(spec.media_kind);
        self.tracks
            .iter()
            .filter(|t| t.kind == kind)
            .find(|t| !t.has_overlap(spec.start_time.max(0.0), spec.duration.max(0.0), None))
            .map(|t| t.id)
    }

    /// Re-apply clip invariants after the timeline came in from outside.
    pub(crate) fn normalize(&mut self, min_visible: f64) {
        for clip in self.tracks.iter_mut().flat_map(|t| t.clips.iter_mut()) {
            clip.normalize(min_visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::clip::MediaKind;

    fn spec(start: f64, duration: f64) -> ClipSpec {
        ClipSpec::new("media", "Clip", MediaKind::Video, start, duration)
    }

    fn timeline_with_track() -> (Timeline, TrackId) {
        let mut timeline = Timeline::new();
        let track = timeline.add_track(TrackKind::Video);
        (timeline, track)
    }

    #[test]
    fn test_track_names_count_per_kind() {
        let mut timeline = Timeline::new();
        let v1 = timeline.add_track(TrackKind::Video);
        let a1 = timeline.add_track(TrackKind::Audio);
        let v2 = timeline.add_track(TrackKind::Video);
        assert_eq!(timeline.track(v1).unwrap().name, "Video 1");
        assert_eq!(timeline.track(a1).unwrap().name, "Audio 1");
        assert_eq!(timeline.track(v2).unwrap().name, "Video 2");
    }

    #[test]
    fn test_gap_example() {
        let (mut timeline, track) = timeline_with_track();
        timeline.add_clip(track, spec(0.0, 10.0)).unwrap();
        let b = timeline.add_clip(track, spec(12.0, 5.0)).unwrap();

        assert_eq!(
            timeline.gaps_in_track(track, 0.1),
            vec![Gap {
                start_time: 10.0,
                end_time: 12.0,
                duration: 2.0
            }]
        );

        assert!(timeline.close_gaps(track));
        assert_eq!(timeline.clip(track, b).unwrap().start_time(), 10.0);
        assert!(timeline.gaps_in_track(track, 0.1).is_empty());
    }

    #[test]
    fn test_remove_last_clip_prunes_track() {
        let (mut timeline, track) = timeline_with_track();
        let other = timeline.add_track(TrackKind::Audio);
        let clip = timeline.add_clip(track, spec(0.0, 2.0)).unwrap();

        assert!(timeline.remove_clip(track, clip).is_some());
        assert!(timeline.track(track).is_none());
        // The sweep takes every empty track, not only the one that lost a clip.
        assert!(timeline.track(other).is_none());
    }

    #[test]
    fn test_move_clip_is_verbatim() {
        let (mut timeline, from) = timeline_with_track();
        let to = timeline.add_track(TrackKind::Video);
        timeline.add_clip(to, spec(20.0, 1.0)).unwrap();
        let clip = timeline.add_clip(from, spec(3.0, 4.0)).unwrap();
        timeline.set_clip_trim(from, clip, 1.0, 0.5, 0.1);
        let before = timeline.clip(from, clip).unwrap().clone();

        assert!(timeline.move_clip(from, to, clip));
        assert_eq!(timeline.clip(to, clip), Some(&before));
        assert!(timeline.track(from).is_none());
    }

    #[test]
    fn test_move_clip_rejects_bad_targets() {
        let (mut timeline, from) = timeline_with_track();
        let clip = timeline.add_clip(from, spec(0.0, 1.0)).unwrap();
        assert!(!timeline.move_clip(from, from, clip));
        assert!(!timeline.move_clip(from, TrackId::new(), clip));
        assert!(timeline.contains(from, clip));
    }

    #[test]
    fn test_split_clip_at_playhead() {
        let (mut timeline, track) = timeline_with_track();
        let a = timeline.add_clip(track, spec(0.0, 8.0)).unwrap();
        let b = timeline.split_clip(track, a, 3.0, SplitSuffix::Split).unwrap();

        let clips = &timeline.track(track).unwrap().clips;
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].id(), a);
        assert_eq!(clips[1].id(), b);
        assert_eq!(clips[0].effective_duration(), 3.0);
        assert_eq!(clips[1].effective_duration(), 5.0);
        assert_eq!(clips[1].start_time(), 3.0);
    }

    #[test]
    fn test_split_clip_at_playhead_no_split() {
        let (mut timeline, track) = timeline_with_track();
        let a = timeline.add_clip(track, spec(0.0, 10.0)).unwrap();
        assert!(timeline.split_clip(track, a, 0.0, SplitSuffix::Split).is_none());
        assert!(timeline.split_clip(track, a, 10.0, SplitSuffix::Split).is_none());
        assert!(timeline.split_clip(track, a, 20.0, SplitSuffix::Split).is_none());
        assert_eq!(timeline.clip_count(), 1);
    }

    #[test]
    fn test_split_at_hits_every_track() {
        let mut timeline = Timeline::new();
        let v = timeline.add_track(TrackKind::Video);
        let a = timeline.add_track(TrackKind::Audio);
        timeline.add_clip(v, spec(0.0, 10.0)).unwrap();
        timeline
            .add_clip(a, ClipSpec::new("song", "Song", MediaKind::Audio, 2.0, 6.0))
            .unwrap();
        timeline
            .add_clip(a, ClipSpec::new("song", "Song", MediaKind::Audio, 9.0, 6.0))
            .unwrap();

        let created = timeline.split_at(5.0, SplitSuffix::Split);
        assert_eq!(created.len(), 2);
        assert_eq!(timeline.clip_count(), 5);
    }

    #[test]
    fn test_freeze_frame_moves_to_new_track_when_blocked() {
        let (mut timeline, track) = timeline_with_track();
        let a = timeline.add_clip(track, spec(0.0, 10.0)).unwrap();
        let config = EngineConfig::default();

        let (target, frozen) = timeline.freeze_frame(track, a, 4.0, &config).unwrap();
        assert_ne!(target, track);
        assert_eq!(timeline.track(target).unwrap().kind, TrackKind::Video);
        let frozen = timeline.clip(target, frozen).unwrap();
        assert_eq!(frozen.start_time(), 4.0);
        assert_eq!(frozen.effective_duration(), 1.0);

        let (target, _) = timeline.freeze_frame(track, a, 10.0, &config).unwrap();
        assert_eq!(target, track);
    }

    #[test]
    fn test_separate_audio_needs_video_track() {
        let (mut timeline, video) = timeline_with_track();
        let clip = timeline.add_clip(video, spec(1.0, 5.0)).unwrap();
        let (audio_track, audio_clip) = timeline.separate_audio(video, clip).unwrap();

        assert_eq!(timeline.track(audio_track).unwrap().kind, TrackKind::Audio);
        let audio = timeline.clip(audio_track, audio_clip).unwrap();
        assert_eq!(audio.media_id(), "media");
        assert_eq!(audio.start_time(), 1.0);

        assert!(timeline.separate_audio(audio_track, audio_clip).is_none());
    }

    #[test]
    fn test_total_duration() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.total_duration(), 0.0);
        assert_eq!(timeline.display_duration(10.0), 10.0);

        let v = timeline.add_track(TrackKind::Video);
        let a = timeline.add_track(TrackKind::Audio);
        timeline.add_clip(v, spec(0.0, 8.0)).unwrap();
        let long = timeline
            .add_clip(a, ClipSpec::new("song", "Song", MediaKind::Audio, 5.0, 20.0))
            .unwrap();
        assert_eq!(timeline.total_duration(), 25.0);

        timeline.set_clip_trim(a, long, 0.0, 5.0, 0.1);
        assert_eq!(timeline.total_duration(), 20.0);
        assert_eq!(timeline.display_duration(10.0), 20.0);
    }

    #[test]
    fn test_active_clips_at() {
        let mut timeline = Timeline::new();
        let v = timeline.add_track(TrackKind::Video);
        let a = timeline.add_track(TrackKind::Audio);
        timeline.add_clip(v, spec(0.0, 10.0)).unwrap();
        timeline
            .add_clip(a, ClipSpec::new("song", "Song", MediaKind::Audio, 0.0, 10.0))
            .unwrap();

        assert_eq!(timeline.active_clips_at(5.0).len(), 2);
        assert_eq!(timeline.active_clips_at(0.0).len(), 2);
        assert!(timeline.active_clips_at(10.0).is_empty());
        assert!(timeline.active_clips_at(11.0).is_empty());
    }

    #[test]
    fn test_clips_in_range() {
        let (mut timeline, track) = timeline_with_track();
        timeline.add_clip(track, spec(0.0, 10.0)).unwrap();

        assert_eq!(timeline.clips_in_range(5.0, 15.0).len(), 1);
        assert_eq!(timeline.clips_in_range(-5.0, 1.0).len(), 1);
        assert!(timeline.clips_in_range(11.0, 20.0).is_empty());
    }

    #[test]
    fn test_snap_any_track() {
        let mut timeline = Timeline::new();
        let v = timeline.add_track(TrackKind::Video);
        let a = timeline.add_track(TrackKind::Audio);
        let moving = timeline.add_clip(v, spec(0.0, 4.0)).unwrap();
        timeline
            .add_clip(a, ClipSpec::new("song", "Song", MediaKind::Audio, 7.0, 3.0))
            .unwrap();

        assert_eq!(timeline.snap_to_edge(v, 6.9, Some(moving), 0.5), None);
        assert_eq!(timeline.snap_to_edge_any_track(6.9, Some(moving), 0.5), Some(7.0));
        assert_eq!(timeline.snap_to_edge_any_track(4.2, None, 0.5), Some(4.0));
    }

    #[test]
    fn test_find_free_track() {
        let mut timeline = Timeline::new();
        let a = timeline.add_track(TrackKind::Audio);
        let v1 = timeline.add_track(TrackKind::Video);
        let v2 = timeline.add_track(TrackKind::Video);
        timeline.add_clip(v1, spec(0.0, 10.0)).unwrap();

        assert_eq!(timeline.find_free_track(&spec(5.0, 2.0)), Some(v2));
        let image = ClipSpec::new("still", "Still", MediaKind::Image, 5.0, 2.0);
        assert_eq!(timeline.find_free_track(&image), Some(v2));
        assert_eq!(timeline.find_free_track(&spec(10.0, 2.0)), Some(v1));
        let song = ClipSpec::new("song", "Song", MediaKind::Audio, 0.0, 30.0);
        assert_eq!(timeline.find_free_track(&song), Some(a));

        let mut no_video = Timeline::new();
        no_video.add_track(TrackKind::Audio);
        no_video.add_track(TrackKind::Effects);
        assert_eq!(no_video.find_free_track(&spec(0.0, 1.0)), None);
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let (mut timeline, track) = timeline_with_track();
        let before = timeline.clone();
        let ghost_track = TrackId::new();
        let ghost_clip = ClipId::new();

        assert!(timeline.add_clip(ghost_track, spec(0.0, 1.0)).is_none());
        assert!(timeline.remove_clip(track, ghost_clip).is_none());
        assert!(!timeline.set_clip_trim(track, ghost_clip, 1.0, 1.0, 0.1));
        assert!(!timeline.set_clip_start_time(ghost_track, ghost_clip, 1.0));
        assert!(timeline.toggle_mute(ghost_track).is_none());
        assert!(timeline.split_clip(track, ghost_clip, 1.0, SplitSuffix::Split).is_none());
        assert!(timeline.duplicate_clip(track, ghost_clip, 0.1).is_none());
        assert!(!timeline.close_gaps(ghost_track));
        assert_eq!(timeline, before);
    }
}
