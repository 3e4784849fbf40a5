//! Candidate results and their ordering

use serde::{Deserialize, Serialize};

/// A point index with its enclosing radius
///
/// The radius is the largest distance from the indexed point to any other
/// point of the set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub point_index: usize,
    pub radius: f64,
}

impl CandidateResult {
    /// Create a candidate
    pub const fn new(point_index: usize, radius: f64) -> Self {
        Self { point_index, radius }
    }

    /// Strictly smaller radius, or equal radius and lower index
    #[inline]
    pub fn beats(&self, other: &CandidateResult) -> bool {
        self.radius < other.radius || (self.radius == other.radius && self.point_index < other.point_index)
    }
}

/// The better of two optional candidates; unset never wins
#[inline]
pub fn better(current: Option<CandidateResult>, challenger: Option<CandidateResult>) -> Option<CandidateResult> {
    match (current, challenger) {
        (Some(held), Some(next)) if next.beats(&held) => Some(next),
        (Some(held), _) => Some(held),
        (None, next) => next,
    }
}
