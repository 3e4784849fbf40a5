//! End-to-end search on a backend
//!
//! ```text
//! PointSet ──upload──► point buffer ─┐
//!                                    ├─► RadiusKernel (units × lanes) ─► unit results ──download──► reduce_global
//! unset records ──upload──► result buffer ─┘
//! ```
//!
//! Both buffers are released before the result is returned, whether the
//! launch succeeded or not.

use crate::candidate::CandidateResult;
use crate::config::ExecutionConfig;
use crate::error::{Error, Result};
use crate::kernel::RadiusKernel;
use crate::partition::PartitionPlan;
use crate::point::PointSet;
use crate::record::{CandidateRecord, PointRecord};
use crate::reduce::reduce_global;
use crate::report::Report;
use metric_center_backends::{Backend, BufferHandle, CpuBackend};
use metric_center_tracing::perf_span;
use metric_center_tracing::performance::{record_distance_evaluations, record_transfer};
use std::mem::size_of_val;
use std::time::Instant;

/// Find the metric center of `points` on `backend`
///
/// # Errors
///
/// - [`Error::Configuration`] if `config` does not fit the device or the
///   point count cannot be indexed by a unit record
/// - [`Error::Backend`] if a buffer operation or the launch fails
/// - [`Error::NoCandidate`] if no unit produced a result
pub fn solve<B: Backend>(backend: &mut B, points: &PointSet, config: &ExecutionConfig) -> Result<CandidateResult> {
    let _span = perf_span!(
        "metric_center_solve",
        points = points.len(),
        units = config.units,
        lanes = config.lanes_per_unit
    );

    config.validate_for(&backend.device_info())?;
    if i32::try_from(points.len()).is_err() {
        return Err(Error::configuration(format!(
            "{} points cannot be indexed by 32-bit unit records",
            points.len()
        )));
    }

    let plan = PartitionPlan::new(points.len(), config.units, config.lanes_per_unit)?;
    tracing::debug!(
        chunk = plan.chunk_len(),
        active_units = plan.active_units(),
        %config,
        "partition planned"
    );

    let records: Vec<PointRecord> = points.iter().map(PointRecord::from).collect();
    let start = Instant::now();
    let point_buffer = backend.upload_records(&records)?;
    record_transfer(size_of_val(records.as_slice()), "H2D", start.elapsed().as_micros() as u64);

    let result_buffer = match backend.upload_records(&vec![CandidateRecord::UNSET; plan.units()]) {
        Ok(handle) => handle,
        Err(err) => {
            let _ = release(backend, &[point_buffer]);
            return Err(err.into());
        }
    };

    let launched = launch_and_collect(backend, config, plan, point_buffer, result_buffer);
    let released = release(backend, &[point_buffer, result_buffer]);
    let unit_results = launched?;
    released?;

    let best = reduce_global(&unit_results)?;
    tracing::info!(index = best.point_index, radius = best.radius, "metric center found");
    Ok(best)
}

/// [`solve`], then look the winning point up for reporting
pub fn solve_report<B: Backend>(backend: &mut B, points: &PointSet, config: &ExecutionConfig) -> Result<Report> {
    let best = solve(backend, points, config)?;
    Report::new(&best, points)
}

/// [`solve`] on a fresh CPU backend with its default configuration
pub fn solve_on_cpu(points: &PointSet) -> Result<CandidateResult> {
    let mut backend = CpuBackend::new();
    let config = ExecutionConfig::for_device(&backend.device_info());
    solve(&mut backend, points, &config)
}

fn launch_and_collect<B: Backend>(
    backend: &mut B,
    config: &ExecutionConfig,
    plan: PartitionPlan,
    point_buffer: BufferHandle,
    result_buffer: BufferHandle,
) -> Result<Vec<Option<CandidateResult>>> {
    let kernel = RadiusKernel::new(plan, point_buffer);

    let start = Instant::now();
    backend.launch(&kernel, &config.launch_config(), result_buffer)?;
    record_distance_evaluations(plan.point_count(), start.elapsed().as_micros() as u64);

    let start = Instant::now();
    let records: Vec<CandidateRecord> = backend.download_records(result_buffer, plan.units())?;
    record_transfer(size_of_val(records.as_slice()), "D2H", start.elapsed().as_micros() as u64);

    Ok(records.iter().map(CandidateRecord::candidate).collect())
}

/// Free every buffer, returning the first failure
fn release<B: Backend>(backend: &mut B, buffers: &[BufferHandle]) -> Result<()> {
    let mut outcome = Ok(());
    for &buffer in buffers {
        if let Err(err) = backend.free_buffer(buffer) {
            tracing::warn!(%buffer, error = %err, "failed to free buffer");
            if outcome.is_ok() {
                outcome = Err(err.into());
            }
        }
    }
    outcome
}
