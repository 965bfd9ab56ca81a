use crate::types::clip::{Clip, ClipId};

/// Start and effective-end edges of every clip except `exclude`.
pub fn snap_points(clips: &[Clip], exclude: Option<ClipId>) -> Vec<f64> {
    clips
        .iter()
        .filter(|c| Some(c.id) != exclude)
        .flat_map(|c| [c.start_time, c.effective_end()])
        .collect()
}

/// Closest clip edge within `threshold` seconds of `time`, if any.
///
/// The threshold is an absolute time distance; converting a pixel radius at
/// the current zoom level into seconds is the caller's business.
pub fn snap_to_edge(
    clips: &[Clip],
    time: f64,
    exclude: Option<ClipId>,
    threshold: f64,
) -> Option<f64> {
    nearest_within(snap_points(clips, exclude), time, threshold)
}

pub(crate) fn nearest_within(
    points: impl IntoIterator<Item = f64>,
    time: f64,
    threshold: f64,
) -> Option<f64> {
    if threshold.is_nan() || threshold < 0.0 {
        return None;
    }
    let mut best: Option<(f64, f64)> = None;
    for edge in points {
        let dist = (time - edge).abs();
        if dist > threshold {
            continue;
        }
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((edge, dist)),
        }
    }
    best.map(|(edge, _)| edge)
}
