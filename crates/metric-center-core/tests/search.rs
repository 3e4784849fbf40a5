//! End-to-end searches on the CPU backend
//!
//! The answer must match the sequential brute force for any unit and lane
//! count, and ties must resolve to the lowest index.

use metric_center_backends::CpuBackend;
use metric_center_core::{
    reference_center, solve, solve_report, CandidateResult, Error, ExecutionConfig, Point, PointSet,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_cloud(seed: u64, n: usize) -> PointSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let points = (0..n)
        .map(|_| Point::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0)))
        .collect();
    PointSet::new(points).unwrap()
}

fn solve_with(points: &PointSet, units: u32, lanes: u32) -> CandidateResult {
    let mut backend = CpuBackend::new();
    let config = ExecutionConfig::new(units, lanes).unwrap();
    let best = solve(&mut backend, points, &config).unwrap();
    assert_eq!(backend.live_buffers(), 0);
    best
}

#[test]
fn right_triangle_reports_the_corner() {
    let points = PointSet::parse("0 0\n1 0\n0 1\n").unwrap();
    let mut backend = CpuBackend::new();
    let config = ExecutionConfig::new(4, 1024).unwrap();

    let report = solve_report(&mut backend, &points, &config).unwrap();
    assert_eq!(report.to_string(), "0 (0.0000,0.0000)\n1.0000");
}

#[test]
fn two_points_report_index_zero() {
    let points = PointSet::parse("-1 -1 2 3").unwrap();
    for (units, lanes) in [(1, 1), (2, 1), (1, 2), (8, 64)] {
        assert_eq!(solve_with(&points, units, lanes), CandidateResult::new(0, 5.0));
    }
}

#[test]
fn symmetric_square_ties_resolve_to_lowest_index() {
    // Every corner of a square has the same radius.
    let points = PointSet::parse("1 1  -1 1  -1 -1  1 -1").unwrap();
    for (units, lanes) in [(1, 1), (4, 1), (3, 2), (2, 16)] {
        let best = solve_with(&points, units, lanes);
        assert_eq!(best.point_index, 0, "units={units} lanes={lanes}");
    }
}

#[test]
fn center_of_a_cross_wins_from_any_unit() {
    // The origin is last, so it lives in the final unit.
    let points = PointSet::parse("5 0  -5 0  0 5  0 -5  4 0  0 -4  0 0").unwrap();
    for units in 1..=7 {
        assert_eq!(solve_with(&points, units, 2), CandidateResult::new(6, 5.0));
    }
}

#[test]
fn random_clouds_match_reference() {
    for seed in 0..4 {
        let points = random_cloud(seed, 500);
        let expected = reference_center(&points);
        assert_eq!(solve_with(&points, 7, 32), expected, "seed {seed}");
        assert_eq!(solve_with(&points, 1, 1024), expected, "seed {seed}");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let points = random_cloud(42, 300);
    let first = solve_with(&points, 5, 64);
    for _ in 0..5 {
        assert_eq!(solve_with(&points, 5, 64), first);
    }
}

#[test]
fn malformed_input_never_reaches_the_backend() {
    assert!(matches!(PointSet::parse("0.0 1.0 2.0"), Err(Error::MalformedInput(_))));
    assert!(matches!(
        PointSet::parse("3 4"),
        Err(Error::InsufficientPoints { count: 1 })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_partition_invariance(
        coords in proptest::collection::vec((-50i32..50, -50i32..50), 2..80),
        units in 1u32..12,
        lanes in 1u32..40,
    ) {
        // Integer grid coordinates make exact radius ties common.
        let points = PointSet::new(
            coords.iter().map(|&(x, y)| Point::new(f64::from(x), f64::from(y))).collect()
        ).unwrap();

        let expected = reference_center(&points);
        prop_assert_eq!(solve_with(&points, units, lanes), expected);
    }
}
