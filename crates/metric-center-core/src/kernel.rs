//! The enclosing-radius block kernel
//!
//! Lane `t` of unit `u` evaluates the indices [`PartitionPlan::lane_indices`]
//! gives it and deposits its best candidate (or nothing) in shared memory.
//! After the barrier the unit runs the tournament over its lanes and writes
//! one [`CandidateRecord`] to the unit-result buffer.

use crate::candidate::CandidateResult;
use crate::partition::PartitionPlan;
use crate::radius::best_of;
use crate::record::{CandidateRecord, DevicePoints, PointRecord};
use crate::reduce::reduce_unit;
use metric_center_backends::{BlockKernel, BufferHandle, DeviceMemory, ExecutionContext, RecordView};
use metric_center_tracing::perf_event;

/// What a lane leaves in shared memory: its best candidate, if it had work
pub type LaneSlot = Option<CandidateResult>;

/// Kernel evaluating every point of a [`PartitionPlan`]
#[derive(Debug, Clone, Copy)]
pub struct RadiusKernel {
    plan: PartitionPlan,
    points: BufferHandle,
}

impl RadiusKernel {
    /// Kernel over the `PointRecord` buffer `points`
    pub fn new(plan: PartitionPlan, points: BufferHandle) -> Self {
        Self { plan, points }
    }

    /// The plan lanes follow
    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }
}

impl BlockKernel for RadiusKernel {
    type Lane = LaneSlot;
    type Output = CandidateRecord;

    fn name(&self) -> &str {
        "enclosing_radius"
    }

    fn run_lane(&self, ctx: &ExecutionContext, memory: &dyn DeviceMemory) -> metric_center_backends::Result<LaneSlot> {
        let unit = ctx.block_linear_index() as usize;
        let lane = ctx.lane_linear_index() as usize;

        let mut indices = self.plan.lane_indices(unit, lane).peekable();
        if indices.peek().is_none() {
            return Ok(None);
        }

        let view = RecordView::<PointRecord>::new(memory, self.points, self.plan.point_count())?;
        Ok(best_of(indices, &DevicePoints(view)))
    }

    fn reduce_block(&self, ctx: &ExecutionContext, shared: &mut [LaneSlot]) -> CandidateRecord {
        let best = reduce_unit(shared);
        perf_event!(
            "unit_reduced",
            unit = ctx.block_linear_index(),
            lanes = shared.len(),
            index = best.map(|c| c.point_index),
            radius = best.map(|c| c.radius)
        );
        CandidateRecord::from(best)
    }
}
