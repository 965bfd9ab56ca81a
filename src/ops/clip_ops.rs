use crate::types::clip::{Clip, MediaKind, clamp_trim};
use serde::{Deserialize, Serialize};

/// Name suffix given to the right-hand half of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitSuffix {
    #[default]
    Split,
    Cut,
}

impl SplitSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitSuffix::Split => " (split)",
            SplitSuffix::Cut => " (cut)",
        }
    }
}

/// Cuts a clip at the given playhead position, returning the shortened original
/// and the new right-hand clip. Returns None unless the playhead lies strictly
/// inside the clip's effective range.
///
/// The left part keeps the original id and ends exactly at the playhead; the
/// right part starts there, so the two cover the original interval without
/// overlap.
pub fn cut_clip_at(clip: &Clip, playhead: f64, suffix: SplitSuffix) -> Option<(Clip, Clip)> {
    let clip_start = clip.start_time;
    let clip_end = clip.effective_end();

    if !(playhead > clip_start && playhead < clip_end) {
        return None;
    }

    let mut left = clip.clone();
    left.trim_end = clip.trim_end + (clip_end - playhead);

    let mut right = clip.derive(format!("{}{}", clip.name, suffix.as_str()), playhead);
    right.trim_start = clip.trim_start + (playhead - clip_start);
    right.trim_end = clip.trim_end;

    Some((left, right))
}

/// Copy of `clip` placed `gap` seconds after its effective end.
pub fn duplicate_clip(clip: &Clip, gap: f64) -> Clip {
    clip.derive(
        format!("{} (copy)", clip.name),
        clip.effective_end() + gap.max(0.0),
    )
}

/// A held-frame clip over the same media, starting at `playhead` and lasting
/// `freeze_duration` (or the whole media if it is shorter).
///
/// Audio has no frame to hold, so audio media yields None.
pub fn freeze_frame_clip(
    source: &Clip,
    playhead: f64,
    freeze_duration: f64,
    min_visible: f64,
) -> Option<Clip> {
    if source.media_kind == MediaKind::Audio {
        return None;
    }
    let mut frozen = source.derive(format!("{} (freeze)", source.name), playhead);
    let (trim_start, trim_end) = clamp_trim(
        source.duration,
        0.0,
        source.duration - freeze_duration,
        min_visible,
    );
    frozen.trim_start = trim_start;
    frozen.trim_end = trim_end;
    Some(frozen)
}

/// Audio-only companion of a video clip: same media, same timing and trims.
pub fn separated_audio_clip(clip: &Clip) -> Option<Clip> {
    if clip.media_kind != MediaKind::Video {
        return None;
    }
    Some(clip.derive(format!("{} (audio)", clip.name), clip.start_time))
}
