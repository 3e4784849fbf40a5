//! Assignment of point indices to units and lanes
//!
//! Units own contiguous chunks of the index space and lanes stride through
//! their unit's chunk:
//!
//! ```text
//! n = 10, units = 3, lanes = 2        chunk = ceil(10 / 3) = 4
//!
//!   unit 0: [0, 4)   lane 0 → 0, 2    lane 1 → 1, 3
//!   unit 1: [4, 8)   lane 0 → 4, 6    lane 1 → 5, 7
//!   unit 2: [8, 10)  lane 0 → 8       lane 1 → 9
//! ```
//!
//! Every unit's indices precede the next unit's, so scanning unit results in
//! order visits candidates in index order.

use crate::error::{Error, Result};
use std::iter::StepBy;
use std::ops::Range;

/// One (unit, lane, point) triple of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub unit: usize,
    pub lane: usize,
    pub point_index: usize,
}

/// Deterministic partition of `[0, point_count)` over `units × lanes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    point_count: usize,
    units: usize,
    lanes_per_unit: usize,
    chunk: usize,
}

impl PartitionPlan {
    /// Plan `point_count` points over `units` units of `lanes_per_unit` lanes
    pub fn new(point_count: usize, units: u32, lanes_per_unit: u32) -> Result<Self> {
        if units == 0 {
            return Err(Error::configuration("unit count must be at least 1"));
        }
        if lanes_per_unit == 0 {
            return Err(Error::configuration("lanes per unit must be at least 1"));
        }

        let units = units as usize;
        Ok(Self {
            point_count,
            units,
            lanes_per_unit: lanes_per_unit as usize,
            chunk: point_count.div_ceil(units),
        })
    }

    /// Number of points covered
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of units
    pub fn units(&self) -> usize {
        self.units
    }

    /// Lanes in every unit
    pub fn lanes_per_unit(&self) -> usize {
        self.lanes_per_unit
    }

    /// Largest number of indices any unit owns
    pub fn chunk_len(&self) -> usize {
        self.chunk
    }

    /// Index range owned by `unit`; empty for idle or out-of-range units
    pub fn unit_range(&self, unit: usize) -> Range<usize> {
        if unit >= self.units {
            return self.point_count..self.point_count;
        }
        let start = unit.saturating_mul(self.chunk).min(self.point_count);
        let end = start.saturating_add(self.chunk).min(self.point_count);
        start..end
    }

    /// Indices evaluated by `lane` of `unit`, in increasing order
    pub fn lane_indices(&self, unit: usize, lane: usize) -> StepBy<Range<usize>> {
        let range = self.unit_range(unit);
        let start = if lane < self.lanes_per_unit {
            range.start.saturating_add(lane).min(range.end)
        } else {
            range.end
        };
        (start..range.end).step_by(self.lanes_per_unit)
    }

    /// Number of units that own at least one index
    pub fn active_units(&self) -> usize {
        if self.chunk == 0 {
            0
        } else {
            self.point_count.div_ceil(self.chunk)
        }
    }

    /// Every assignment of the plan, unit by unit and lane by lane
    pub fn assignments(&self) -> impl Iterator<Item = Assignment> + '_ {
        (0..self.units).flat_map(move |unit| {
            (0..self.lanes_per_unit).flat_map(move |lane| {
                self.lane_indices(unit, lane).map(move |point_index| Assignment {
                    unit,
                    lane,
                    point_index,
                })
            })
        })
    }
}
