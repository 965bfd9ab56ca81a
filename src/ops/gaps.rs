use crate::types::clip::Clip;
use crate::types::timeline::Gap;

/// Uncovered intervals between consecutive clips (by start time) larger than `threshold`.
pub fn find_gaps(clips: &[Clip], threshold: f64) -> Vec<Gap> {
    let mut sorted: Vec<&Clip> = clips.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    sorted
        .windows(2)
        .filter_map(|pair| {
            let current_end = pair[0].effective_end();
            let next_start = pair[1].start_time;
            (next_start - current_end > threshold).then(|| Gap {
                start_time: current_end,
                end_time: next_start,
                duration: next_start - current_end,
            })
        })
        .collect()
}

/// Sort clips by start time and butt each one against its predecessor.
///
/// The first clip keeps its position; order and effective durations are preserved.
/// Returns true if any clip moved.
pub fn close_gaps(clips: &mut [Clip]) -> bool {
    clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut moved = false;
    for i in 1..clips.len() {
        let previous_end = clips[i - 1].effective_end();
        if clips[i].start_time != previous_end {
            clips[i].set_start_time(previous_end);
            moved = true;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::clip::{ClipSpec, MediaKind};

    fn clip(start: f64, duration: f64) -> Clip {
        Clip::new(ClipSpec::new("m", "c", MediaKind::Video, start, duration))
    }

    #[test]
    fn test_reports_gap_between_clips() {
        let clips = vec![clip(0.0, 10.0), clip(12.0, 5.0)];
        let gaps = find_gaps(&clips, 0.1);
        assert_eq!(
            gaps,
            vec![Gap {
                start_time: 10.0,
                end_time: 12.0,
                duration: 2.0
            }]
        );
    }

    #[test]
    fn test_ignores_gaps_at_or_below_threshold() {
        let clips = vec![clip(0.0, 10.0), clip(10.05, 5.0)];
        assert!(find_gaps(&clips, 0.1).is_empty());
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let clips = vec![clip(20.0, 1.0), clip(0.0, 5.0), clip(8.0, 2.0)];
        let gaps = find_gaps(&clips, 0.1);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].start_time, 5.0);
        assert_eq!(gaps[0].end_time, 8.0);
        assert_eq!(gaps[1].start_time, 10.0);
        assert_eq!(gaps[1].end_time, 20.0);
    }

    #[test]
    fn test_close_gaps_packs_clips() {
        let mut clips = vec![clip(30.0, 2.0), clip(4.0, 3.0), clip(12.0, 5.0)];
        let before: f64 = clips.iter().map(Clip::effective_duration).sum();

        assert!(close_gaps(&mut clips));
        let starts: Vec<f64> = clips.iter().map(|c| c.start_time).collect();
        assert_eq!(starts, vec![4.0, 7.0, 12.0]);
        assert!(find_gaps(&clips, 0.1).is_empty());

        let after: f64 = clips.iter().map(Clip::effective_duration).sum();
        assert_eq!(before, after);
        assert!(!close_gaps(&mut clips));
    }

    #[test]
    fn test_single_or_no_clip_has_no_gaps() {
        assert!(find_gaps(&[], 0.1).is_empty());
        assert!(find_gaps(&[clip(3.0, 1.0)], 0.1).is_empty());
    }
}
