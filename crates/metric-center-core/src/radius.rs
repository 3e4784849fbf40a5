//! Enclosing-radius evaluation
//!
//! The O(n²) part of the search. Each evaluation visits the other `n - 1`
//! points exactly once and keeps the largest distance.

use crate::candidate::{better, CandidateResult};
use crate::point::{PointSet, PointSource};

/// Largest distance from point `index` to every other point of `points`
///
/// Returns 0 when `points` holds nothing but `index`.
pub fn enclosing_radius<S: PointSource + ?Sized>(index: usize, points: &S) -> f64 {
    let origin = points.point(index);
    let mut radius = 0.0f64;
    for other in (0..points.len()).filter(|&j| j != index) {
        let distance = origin.distance(points.point(other));
        if distance > radius {
            radius = distance;
        }
    }
    radius
}

/// Candidate for point `index`
pub fn evaluate<S: PointSource + ?Sized>(index: usize, points: &S) -> CandidateResult {
    CandidateResult::new(index, enclosing_radius(index, points))
}

/// Best candidate among `indices`, or `None` when there are none
pub fn best_of<S, I>(indices: I, points: &S) -> Option<CandidateResult>
where
    S: PointSource + ?Sized,
    I: IntoIterator<Item = usize>,
{
    indices
        .into_iter()
        .fold(None, |best, index| better(best, Some(evaluate(index, points))))
}

/// Sequential brute-force center: every point evaluated in index order
pub fn reference_center(points: &PointSet) -> CandidateResult {
    // A PointSet never holds fewer than two points.
    best_of(0..points.len(), points).unwrap_or(CandidateResult::new(0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn set(coords: &[(f64, f64)]) -> PointSet {
        PointSet::new(coords.iter().copied().map(Point::from).collect()).unwrap()
    }

    #[test]
    fn test_right_triangle() {
        let points = set(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(enclosing_radius(0, &points), 1.0);
        assert!((enclosing_radius(1, &points) - 2f64.sqrt()).abs() < 1e-15);
        assert_eq!(reference_center(&points), CandidateResult::new(0, 1.0));
    }

    #[test]
    fn test_pair_reports_index_zero() {
        let points = set(&[(1.0, 1.0), (4.0, 5.0)]);
        assert_eq!(evaluate(0, &points).radius, 5.0);
        assert_eq!(evaluate(1, &points).radius, 5.0);
        assert_eq!(reference_center(&points), CandidateResult::new(0, 5.0));
    }

    #[test]
    fn test_huge_coordinates() {
        let points = set(&[(0.0, 0.0), (1e200, 0.0), (2e200, 0.0)]);
        assert_eq!(enclosing_radius(0, &points), 2e200);
        assert_eq!(reference_center(&points), CandidateResult::new(1, 1e200));
    }

    #[test]
    fn test_self_distance_is_skipped() {
        let points = set(&[(2.0, 2.0), (2.0, 2.0)]);
        assert_eq!(enclosing_radius(1, &points), 0.0);
    }

    #[test]
    fn test_best_of_subset() {
        let points = set(&[(0.0, 0.0), (10.0, 0.0), (5.0, 0.0), (6.0, 0.0)]);
        let best = best_of([0, 1, 3], &points).unwrap();
        assert_eq!(best, CandidateResult::new(3, 6.0));
        assert_eq!(best_of(std::iter::empty(), &points), None);
    }

    #[test]
    fn test_slice_and_set_agree() {
        let points = set(&[(0.0, 0.0), (3.0, 4.0), (-1.0, 2.5)]);
        for i in 0..points.len() {
            assert_eq!(evaluate(i, &points), evaluate(i, points.as_slice()));
        }
    }
}
