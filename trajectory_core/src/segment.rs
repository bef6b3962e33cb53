//! Bounce detection and longest bounce-free segment selection.
//!
//! A reflection off the top or bottom wall breaks the single-parabola model,
//! so only a run of observations between two bounces can be fitted.
//!
//! # Algorithm
//! 1. Index `i` is a *bounce index* if `y_i < 2r` or `y_i > height − 2r`.
//! 2. Boundary set = `{0} ∪ bounces ∪ {N}` (ascending).
//! 3. The segment is the widest gap between consecutive boundaries; on ties
//!    the **first** (lowest-index) gap wins.

use crate::{
    error::{InterceptError, Result},
    types::{Observation, Segment},
};

/// Indices of observations close enough to a horizontal wall to count as a bounce.
pub fn bounce_indices(observations: &[Observation], radius: f64, height: f64) -> Vec<usize> {
    let margin = 2.0 * radius;
    observations
        .iter()
        .enumerate()
        .filter(|(_, o)| o.y < margin || o.y > height - margin)
        .map(|(i, _)| i)
        .collect()
}

/// Widest gap between consecutive entries of an ascending boundary list.
///
/// Ties resolve to the first gap. Returns `None` when no gap is positive.
pub fn widest_gap(boundaries: &[usize]) -> Option<Segment> {
    let mut best: Option<Segment> = None;
    for pair in boundaries.windows(2) {
        let gap = Segment::new(pair[0], pair[1]);
        if gap.is_empty() {
            continue;
        }
        // strict comparison keeps the earliest maximal gap
        if best.map_or(true, |b| gap.len() > b.len()) {
            best = Some(gap);
        }
    }
    best
}

/// Select the longest bounce-free run of `observations`.
pub fn select_segment(observations: &[Observation], radius: f64, height: f64) -> Result<Segment> {
    let n = observations.len();
    if n == 0 {
        return Err(InterceptError::InsufficientData);
    }

    let bounces = bounce_indices(observations, radius, height);
    let mut boundaries = Vec::with_capacity(bounces.len() + 2);
    boundaries.push(0);
    boundaries.extend_from_slice(&bounces);
    boundaries.push(n);

    // n > 0 guarantees at least one positive gap
    widest_gap(&boundaries).ok_or(InterceptError::InsufficientData)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at_heights(ys: &[f64]) -> Vec<Observation> {
        ys.iter()
            .enumerate()
            .map(|(i, &y)| Observation::new(i as f64, y, 10.0))
            .collect()
    }

    #[test]
    fn tie_break_prefers_first_gap() {
        assert_eq!(widest_gap(&[0, 5, 5, 10]), Some(Segment::new(0, 5)));
        assert_eq!(widest_gap(&[0, 5, 10]), Some(Segment::new(0, 5)));
    }

    #[test]
    fn no_bounce_selects_everything() {
        let obs = at_heights(&[100.0, 90.0, 82.0, 76.0]);
        assert!(bounce_indices(&obs, 10.0, 600.0).is_empty());
        assert_eq!(select_segment(&obs, 10.0, 600.0).unwrap(), Segment::new(0, 4));
    }

    #[test]
    fn bounce_thresholds_are_two_radii() {
        // 19 < 20 top bounce, 20 is not; 581 > 580 bottom bounce, 580 is not
        let obs = at_heights(&[19.0, 20.0, 300.0, 580.0, 581.0]);
        assert_eq!(bounce_indices(&obs, 10.0, 600.0), vec![0, 4]);
    }

    #[test]
    fn picks_longest_run_between_bounces() {
        // bounce at index 2 → boundaries {0, 2, 8} → [2, 8) wins
        let obs = at_heights(&[300.0, 200.0, 10.0, 100.0, 200.0, 300.0, 350.0, 400.0]);
        assert_eq!(select_segment(&obs, 10.0, 600.0).unwrap(), Segment::new(2, 8));
    }

    #[test]
    fn leading_bounce_produces_no_empty_segment() {
        let obs = at_heights(&[5.0, 100.0, 120.0]);
        assert_eq!(select_segment(&obs, 10.0, 600.0).unwrap(), Segment::new(0, 3));
    }

    #[test]
    fn all_bounces_still_yield_a_segment() {
        let obs = at_heights(&[5.0, 5.0, 5.0]);
        let seg = select_segment(&obs, 10.0, 600.0).unwrap();
        assert_eq!(seg.len(), 1);
        assert!(seg.start < seg.end && seg.end <= obs.len());
    }

    #[test]
    fn empty_sequence_is_insufficient() {
        assert_eq!(
            select_segment(&[], 10.0, 600.0),
            Err(InterceptError::InsufficientData)
        );
    }
}
