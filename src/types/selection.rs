//! Clip selection, kept apart from the timeline's structure.
//!
//! Entries are weak references: an undo can remove the clip an entry points
//! at, so every lookup goes through the timeline and silently skips misses.

use crate::types::clip::{Clip, ClipId};
use crate::types::timeline::Timeline;
use crate::types::track::TrackId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipRef {
    pub track_id: TrackId,
    pub clip_id: ClipId,
}

impl ClipRef {
    pub fn new(track_id: TrackId, clip_id: ClipId) -> Self {
        Self { track_id, clip_id }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    entries: Vec<ClipRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clip. Unless `additive`, the previous selection is replaced.
    pub fn select_clip(&mut self, track_id: TrackId, clip_id: ClipId, additive: bool) {
        if !additive {
            self.entries.clear();
        }
        let entry = ClipRef::new(track_id, clip_id);
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn deselect_clip(&mut self, clip_id: ClipId) {
        self.entries.retain(|e| e.clip_id != clip_id);
    }

    /// Replace the whole selection, dropping duplicates.
    pub fn set_selected_clips(&mut self, clips: impl IntoIterator<Item = ClipRef>) {
        self.entries.clear();
        for entry in clips {
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
    }

    pub fn clear_selected_clips(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ClipRef] {
        &self.entries
    }

    pub fn is_selected(&self, clip_id: ClipId) -> bool {
        self.entries.iter().any(|e| e.clip_id == clip_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Selected clips that still exist, in selection order.
    pub fn resolve<'t>(&self, timeline: &'t Timeline) -> Vec<(ClipRef, &'t Clip)> {
        self.entries
            .iter()
            .filter_map(|e| timeline.clip(e.track_id, e.clip_id).map(|c| (*e, c)))
            .collect()
    }

    /// Drop entries whose clip is gone. Returns how many were removed.
    pub fn retain_existing(&mut self, timeline: &Timeline) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| timeline.contains(e.track_id, e.clip_id));
        before - self.entries.len()
    }

    /// Point entries for `clip_id` at the track it now lives on.
    pub(crate) fn retarget(&mut self, clip_id: ClipId, track_id: TrackId) {
        for entry in self.entries.iter_mut().filter(|e| e.clip_id == clip_id) {
            entry.track_id = track_id;
        }
    }
}
