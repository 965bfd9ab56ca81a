use crate::types::clip::{ClipId, MediaKind};
use crate::types::track::{TrackId, TrackKind};
use thiserror::Error;

/// Errors surfaced by persistence, config loading and the checked placement calls.
///
/// The primitive editing operations never produce these; they degrade to no-ops.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    /// The candidate interval `[start, end)` collides with a clip already on the track.
    #[error("Clip would overlap an existing clip on track {track_id} ({start:.3}s..{end:.3}s)")]
    Overlap { track_id: TrackId, start: f64, end: f64 },

    #[error("{media_kind:?} media cannot go on a {track_kind:?} track")]
    IncompatibleMedia {
        track_kind: TrackKind,
        media_kind: MediaKind,
    },

    #[error("Unsupported project version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub type EditorResult<T> = Result<T, EditorError>;
