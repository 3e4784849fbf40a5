//! Candidate reductions
//!
//! Two stages turn per-lane candidates into the answer:
//!
//! ```text
//! lanes ──reduce_unit──► one candidate per unit ──reduce_global──► answer
//!          (tournament)                            (host scan)
//! ```
//!
//! Both keep the candidate with the strictly smaller radius and break equal
//! radii towards the lower point index, so the answer does not depend on the
//! unit or lane count.

use crate::candidate::{better, CandidateResult};
use crate::error::{Error, Result};
use rayon::prelude::*;

/// Rounds pairing at least this many slots run on the rayon pool
pub const PARALLEL_ROUND_THRESHOLD: usize = 256;

/// Tournament reduction of one unit's lane slots
///
/// Each round pairs slot `i` with slot `i + half` and keeps the better one in
/// slot `i`, halving the active range until one slot remains. A round only
/// starts after the previous one finished. `slots` is used as scratch space.
pub fn reduce_unit(slots: &mut [Option<CandidateResult>]) -> Option<CandidateResult> {
    let mut active = slots.len();

    while active > 1 {
        let half = active.div_ceil(2);
        let (front, back) = slots[..active].split_at_mut(half);

        if back.len() >= PARALLEL_ROUND_THRESHOLD {
            front
                .par_iter_mut()
                .zip(back.par_iter())
                .for_each(|(kept, challenger)| *kept = better(*kept, *challenger));
        } else {
            for (kept, challenger) in front.iter_mut().zip(back.iter()) {
                *kept = better(*kept, *challenger);
            }
        }

        active = half;
    }

    slots.first().copied().flatten()
}

/// Host-side scan of the per-unit results
///
/// # Errors
///
/// - [`Error::Configuration`] when `results` is empty
/// - [`Error::NoCandidate`] when every unit result is unset
pub fn reduce_global(results: &[Option<CandidateResult>]) -> Result<CandidateResult> {
    if results.is_empty() {
        return Err(Error::configuration("no unit results to reduce"));
    }

    results
        .iter()
        .copied()
        .fold(None, better)
        .ok_or(Error::NoCandidate)
}
