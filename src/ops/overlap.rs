use crate::types::clip::{Clip, ClipId, Span};

/// Returns true if `[start, start + duration)` intersects any clip other than `exclude`.
///
/// Callers run this before committing an interactive placement or move; the
/// primitive add/move operations do not consult it themselves.
pub fn has_overlap(clips: &[Clip], start: f64, duration: f64, exclude: Option<ClipId>) -> bool {
    let end = start + duration.max(0.0);
    clips
        .iter()
        .filter(|c| Some(c.id) != exclude)
        .any(|c| c.overlaps(start, end))
}

/// Every pair of clips whose intervals intersect, ordered by start time.
/// An empty result means the track satisfies the no-overlap invariant.
pub fn overlapping_pairs(clips: &[Clip]) -> Vec<(ClipId, ClipId)> {
    let mut sorted: Vec<&Clip> = clips.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut pairs = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            // Sorted by start, so nothing further right can reach back into `a`.
            if b.start_time >= a.effective_end() {
                break;
            }
            if a.overlaps(b.start(), b.end()) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
