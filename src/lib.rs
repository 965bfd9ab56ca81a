//! Timeline editing engine for the cutio editor.
//!
//! The engine owns the clip/track data model and every structural edit made
//! to it. Decoding, playback, rendering and UI are collaborators that hand
//! ready-made clip specs in and read state back out.
//!
//! ```text
//! EditorSession
//! ├── timeline: Timeline          (tracks → clips)
//! ├── history: History            (undo/redo snapshots)
//! ├── selection: Selection        (weak (track, clip) refs)
//! └── config: EngineConfig        (thresholds and limits)
//! ```
//!
//! Interval algorithms (overlap, snap, gaps) and the clip arithmetic behind
//! split/duplicate/freeze live in [`ops`].

pub mod ops;
pub mod types;

pub use ops::clip_ops::SplitSuffix;
pub use types::clip::{Clip, ClipId, ClipSpec, MediaKind, Span};
pub use types::config::EngineConfig;
pub use types::error::{EditorError, EditorResult};
pub use types::history::{History, HistoryEntry, HistoryState};
pub use types::project::Project;
pub use types::selection::{ClipRef, Selection};
pub use types::session::EditorSession;
pub use types::timeline::{Gap, Timeline};
pub use types::track::{Track, TrackId, TrackKind};
