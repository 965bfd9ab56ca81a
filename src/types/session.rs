use crate::ops::clip_ops::SplitSuffix;
use crate::types::clip::{Clip, ClipId, ClipSpec};
use crate::types::config::EngineConfig;
use crate::types::error::{EditorError, EditorResult};
use crate::types::history::{History, HistoryState};
use crate::types::selection::{ClipRef, Selection};
use crate::types::timeline::{Gap, Timeline};
use crate::types::track::{TrackId, TrackKind};

/// One editing session: the timeline plus its undo history and selection.
///
/// Every structural change goes through this type. A change that applies
/// records the pre-change timeline in history and clears redo; a call that
/// has nothing to do (unknown id, split outside the clip, ...) leaves both
/// the timeline and the history untouched.
///
/// The session is single-owner and synchronous. A multi-threaded host must
/// put the whole session behind one lock.
#[derive(Debug, Clone)]
pub struct EditorSession {
    timeline: Timeline,
    history: History,
    selection: Selection,
    config: EngineConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_timeline(Timeline::new(), config)
    }

    /// Start a session over an existing timeline (e.g. one just loaded from disk).
    pub fn with_timeline(timeline: Timeline, config: EngineConfig) -> Self {
        EditorSession {
            timeline,
            history: History::new(config.max_history),
            selection: Selection::new(),
            config,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `op` against the timeline as one undoable step.
    ///
    /// `None` from `op` means nothing applied; the timeline is put back to
    /// exactly what it was and no history is recorded.
    fn edit<T>(
        &mut self,
        label: &str,
        op: impl FnOnce(&mut Timeline, &EngineConfig) -> Option<T>,
    ) -> Option<T> {
        let before = self.timeline.clone();
        match op(&mut self.timeline, &self.config) {
            Some(out) => {
                self.history.push(label, before);
                Some(out)
            }
            None => {
                self.timeline = before;
                tracing::trace!(label, "Edit ignored: nothing to do");
                None
            }
        }
    }

    // --- Primitive mutations ---

    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        self.history.push("Add track", self.timeline.clone());
        let track_id = self.timeline.add_track(kind);
        tracing::debug!(track_id = %track_id, kind = kind.label(), "Added track");
        track_id
    }

    /// Remove a track together with all of its clips.
    pub fn remove_track(&mut self, track_id: TrackId) -> bool {
        let removed = self.edit("Remove track", |t, _| t.remove_track(track_id));
        if let Some(track) = &removed {
            tracing::debug!(track_id = %track_id, clips = track.clips.len(), "Removed track");
        }
        removed.is_some()
    }

    /// Place a new untrimmed clip. Overlap is not checked here; see
    /// [`has_overlap`](Self::has_overlap) and
    /// [`try_add_clip_to_track`](Self::try_add_clip_to_track).
    pub fn add_clip_to_track(&mut self, track_id: TrackId, spec: ClipSpec) -> Option<ClipId> {
        let clip_id = self.edit("Add clip", |t, _| t.add_clip(track_id, spec))?;
        tracing::debug!(track_id = %track_id, clip_id = %clip_id, "Added clip");
        Some(clip_id)
    }

    /// Remove a clip; its track goes too if it was the last one.
    pub fn remove_clip_from_track(&mut self, track_id: TrackId, clip_id: ClipId) -> bool {
        let removed = self
            .edit("Remove clip", |t, _| t.remove_clip(track_id, clip_id))
            .is_some();
        if removed {
            tracing::debug!(track_id = %track_id, clip_id = %clip_id, "Removed clip");
        }
        removed
    }

    pub fn move_clip_to_track(&mut self, from: TrackId, to: TrackId, clip_id: ClipId) -> bool {
        let moved = self
            .edit("Move clip", |t, _| t.move_clip(from, to, clip_id).then_some(()))
            .is_some();
        if moved {
            self.selection.retarget(clip_id, to);
            tracing::debug!(from = %from, to = %to, clip_id = %clip_id, "Moved clip");
        }
        moved
    }

    /// Overwrite a clip's trims. Out-of-range values are clamped, never rejected.
    pub fn update_clip_trim(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        trim_start: f64,
        trim_end: f64,
    ) -> bool {
        self.edit("Trim clip", |t, config| {
            t.set_clip_trim(
                track_id,
                clip_id,
                trim_start,
                trim_end,
                config.min_visible_duration,
            )
            .then_some(())
        })
        .is_some()
    }

    /// Overwrite a clip's start (clamped to >= 0). Overlap is not checked here.
    pub fn update_clip_start_time(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        start_time: f64,
    ) -> bool {
        self.edit("Move clip in time", |t, _| {
            t.set_clip_start_time(track_id, clip_id, start_time).then_some(())
        })
        .is_some()
    }

    /// Flip a track's mute flag. Returns the new state.
    pub fn toggle_track_mute(&mut self, track_id: TrackId) -> Option<bool> {
        let muted = self.edit("Toggle mute", |t, _| t.toggle_mute(track_id))?;
        tracing::debug!(track_id = %track_id, muted, "Toggled track mute");
        Some(muted)
    }

    pub fn rename_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        name: impl Into<String>,
    ) -> bool {
        let name = name.into();
        self.edit("Rename clip", |t, _| {
            t.rename_clip(track_id, clip_id, name).then_some(())
        })
        .is_some()
    }

    // --- Composite operations ---

    /// Split a clip at `time`. Returns the id of the new right-hand clip, or
    /// None when `time` is not strictly inside the clip.
    pub fn split_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        time: f64,
        suffix: SplitSuffix,
    ) -> Option<ClipId> {
        let new_id = self.edit("Split clip", |t, _| t.split_clip(track_id, clip_id, time, suffix))?;
        tracing::debug!(clip_id = %clip_id, new_clip_id = %new_id, time, "Split clip");
        Some(new_id)
    }

    /// Split everything under the playhead, on all tracks, as one undo step.
    pub fn split_at_playhead(&mut self, playhead: f64) -> Vec<ClipId> {
        let created = self
            .edit("Split at playhead", |t, _| {
                let created = t.split_at(playhead, SplitSuffix::Split);
                (!created.is_empty()).then_some(created)
            })
            .unwrap_or_default();
        if !created.is_empty() {
            tracing::debug!(playhead, clips = created.len(), "Split at playhead");
        }
        created
    }

    pub fn duplicate_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> Option<ClipId> {
        let copy_id = self.edit("Duplicate clip", |t, config| {
            t.duplicate_clip(track_id, clip_id, config.duplicate_gap)
        })?;
        tracing::debug!(clip_id = %clip_id, copy_id = %copy_id, "Duplicated clip");
        Some(copy_id)
    }

    /// Add a held frame of `clip_id` at the playhead. Returns where it landed.
    pub fn freeze_frame(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        playhead: f64,
    ) -> Option<(TrackId, ClipId)> {
        let (target, frozen) = self.edit("Freeze frame", |t, config| {
            t.freeze_frame(track_id, clip_id, playhead, config)
        })?;
        tracing::debug!(
            clip_id = %clip_id,
            track_id = %target,
            frozen_id = %frozen,
            playhead,
            "Freeze frame"
        );
        Some((target, frozen))
    }

    /// Give a video clip's sound its own audio track.
    pub fn separate_audio(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
    ) -> Option<(TrackId, ClipId)> {
        let (audio_track, audio_clip) =
            self.edit("Separate audio", |t, _| t.separate_audio(track_id, clip_id))?;
        tracing::debug!(
            clip_id = %clip_id,
            audio_track = %audio_track,
            audio_clip = %audio_clip,
            "Separated audio"
        );
        Some((audio_track, audio_clip))
    }

    /// Pack a track's clips end to end. No-op when nothing would move.
    pub fn close_gaps_in_track(&mut self, track_id: TrackId) -> bool {
        self.edit("Close gaps", |t, _| t.close_gaps(track_id).then_some(()))
            .is_some()
    }

    /// Remove every selected clip that still exists, as one undo step.
    /// Returns how many clips were removed.
    pub fn delete_selected(&mut self) -> usize {
        let targets: Vec<ClipRef> = self
            .selection
            .resolve(&self.timeline)
            .into_iter()
            .map(|(r, _)| r)
            .collect();
        let removed = self
            .edit("Delete selection", |t, _| {
                let removed = targets
                    .iter()
                    .filter(|r| t.remove_clip(r.track_id, r.clip_id).is_some())
                    .count();
                (removed > 0).then_some(removed)
            })
            .unwrap_or(0);
        self.selection.clear_selected_clips();
        if removed > 0 {
            tracing::debug!(removed, "Deleted selected clips");
        }
        removed
    }

    /// Drop media onto the timeline: first free track of the media's kind,
    /// or a new track when none fits.
    pub fn place_clip(&mut self, spec: ClipSpec) -> Option<(TrackId, ClipId)> {
        let placed = self.edit("Place clip", |t, _| {
            let track_id = match t.find_free_track(&spec) {
                Some(id) => id,
                None => t.add_track(TrackKind::for_media(spec.media_kind)),
            };
            t.add_clip(track_id, spec).map(|clip_id| (track_id, clip_id))
        })?;
        tracing::debug!(track_id = %placed.0, clip_id = %placed.1, "Placed clip");
        Some(placed)
    }

    // --- Checked placement ---

    /// Like [`add_clip_to_track`](Self::add_clip_to_track), but refuses
    /// incompatible media and overlapping placement.
    pub fn try_add_clip_to_track(
        &mut self,
        track_id: TrackId,
        spec: ClipSpec,
    ) -> EditorResult<ClipId> {
        let track = self
            .timeline
            .track(track_id)
            .ok_or(EditorError::TrackNotFound(track_id))?;
        if !track.kind.accepts(spec.media_kind) {
            return Err(EditorError::IncompatibleMedia {
                track_kind: track.kind,
                media_kind: spec.media_kind,
            });
        }
        let candidate = Clip::new(spec.clone());
        self.check_free(track_id, &candidate, None)?;
        self.add_clip_to_track(track_id, spec)
            .ok_or(EditorError::TrackNotFound(track_id))
    }

    /// Like [`move_clip_to_track`](Self::move_clip_to_track), but refuses
    /// incompatible targets and overlapping placement.
    pub fn try_move_clip_to_track(
        &mut self,
        from: TrackId,
        to: TrackId,
        clip_id: ClipId,
    ) -> EditorResult<()> {
        let clip = self
            .timeline
            .track(from)
            .ok_or(EditorError::TrackNotFound(from))?
            .clip(clip_id)
            .ok_or(EditorError::ClipNotFound(clip_id))?
            .clone();
        let target = self
            .timeline
            .track(to)
            .ok_or(EditorError::TrackNotFound(to))?;
        if !target.kind.accepts(clip.media_kind()) {
            return Err(EditorError::IncompatibleMedia {
                track_kind: target.kind,
                media_kind: clip.media_kind(),
            });
        }
        if from == to {
            return Ok(());
        }
        self.check_free(to, &clip, None)?;
        self.move_clip_to_track(from, to, clip_id);
        Ok(())
    }

    /// Like [`update_clip_start_time`](Self::update_clip_start_time), but
    /// refuses a position that would overlap another clip on the track.
    pub fn try_update_clip_start_time(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        start_time: f64,
    ) -> EditorResult<()> {
        let mut candidate = self
            .timeline
            .track(track_id)
            .ok_or(EditorError::TrackNotFound(track_id))?
            .clip(clip_id)
            .ok_or(EditorError::ClipNotFound(clip_id))?
            .clone();
        candidate.set_start_time(start_time);
        self.check_free(track_id, &candidate, Some(clip_id))?;
        self.update_clip_start_time(track_id, clip_id, start_time);
        Ok(())
    }

    fn check_free(
        &self,
        track_id: TrackId,
        candidate: &Clip,
        exclude: Option<ClipId>,
    ) -> EditorResult<()> {
        let start = candidate.start_time();
        let duration = candidate.effective_duration();
        if self.timeline.has_overlap(track_id, start, duration, exclude) {
            tracing::debug!(track_id = %track_id, start, duration, "Placement refused: overlap");
            return Err(EditorError::Overlap {
                track_id,
                start,
                end: start + duration,
            });
        }
        Ok(())
    }

    // --- History ---

    /// Restore the state before the last applied edit. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.timeline.clone()) {
            Some(previous) => {
                self.timeline = previous;
                self.revalidate_selection();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.timeline.clone()) {
            Some(next) => {
                self.timeline = next;
                self.revalidate_selection();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    fn revalidate_selection(&mut self) {
        let dropped = self.selection.retain_existing(&self.timeline);
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped stale selection entries");
        }
    }

    // --- Selection ---

    pub fn select_clip(&mut self, track_id: TrackId, clip_id: ClipId, additive: bool) {
        self.selection.select_clip(track_id, clip_id, additive);
    }

    pub fn deselect_clip(&mut self, clip_id: ClipId) {
        self.selection.deselect_clip(clip_id);
    }

    pub fn set_selected_clips(&mut self, clips: impl IntoIterator<Item = ClipRef>) {
        self.selection.set_selected_clips(clips);
    }

    pub fn clear_selected_clips(&mut self) {
        self.selection.clear_selected_clips();
    }

    // --- Queries ---

    pub fn total_duration(&self) -> f64 {
        self.timeline.total_duration()
    }

    /// Total duration, but never below the configured minimum.
    pub fn display_duration(&self) -> f64 {
        self.timeline
            .display_duration(self.config.min_timeline_duration)
    }

    pub fn gaps_in_track(&self, track_id: TrackId) -> Vec<Gap> {
        self.timeline
            .gaps_in_track(track_id, self.config.gap_threshold)
    }

    pub fn has_overlap(
        &self,
        track_id: TrackId,
        start: f64,
        duration: f64,
        exclude: Option<ClipId>,
    ) -> bool {
        self.timeline.has_overlap(track_id, start, duration, exclude)
    }

    pub fn snap_to_edge(
        &self,
        track_id: TrackId,
        time: f64,
        exclude: Option<ClipId>,
        threshold: f64,
    ) -> Option<f64> {
        self.timeline.snap_to_edge(track_id, time, exclude, threshold)
    }
}
