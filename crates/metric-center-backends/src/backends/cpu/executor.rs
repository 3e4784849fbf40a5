//! CPU launch executor
//!
//! Runs a [`BlockKernel`] with two levels of rayon parallelism: blocks are
//! independent tasks, and the lanes of each block are nested tasks whose
//! results are collected into the block's shared memory. The collect is the
//! block barrier; `reduce_block` only starts once every lane returned.

use crate::backend::{DeviceInfo, ExecutionContext, LaunchConfig};
use crate::backends::cpu::memory::MemoryManager;
use crate::error::{BackendError, Result};
use crate::kernel::BlockKernel;
use crate::BufferHandle;
use metric_center_tracing::perf_span;
use metric_center_tracing::performance::record_throughput;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::mem::size_of;
use std::sync::Arc;

/// CPU executor implementation
pub struct CpuExecutor {
    /// Shared memory manager
    memory: Arc<RwLock<MemoryManager>>,

    /// Limits launches are checked against
    device: DeviceInfo,
}

impl CpuExecutor {
    /// Create a new CPU executor
    pub fn new(memory: Arc<RwLock<MemoryManager>>, device: DeviceInfo) -> Self {
        Self { memory, device }
    }

    /// Check `config` against the device before any lane runs
    fn validate<K: BlockKernel>(&self, config: &LaunchConfig) -> Result<()> {
        let grid = config.grid;
        let block = config.block;

        if grid.is_degenerate() {
            return Err(BackendError::invalid_launch(format!("grid {grid} has a zero dimension")));
        }
        if grid.total_blocks() > u64::from(self.device.max_units) {
            return Err(BackendError::invalid_launch(format!(
                "grid of {} blocks exceeds the device limit of {}",
                grid.total_blocks(),
                self.device.max_units
            )));
        }
        if block.is_degenerate() {
            return Err(BackendError::invalid_launch(format!("block {block} has a zero dimension")));
        }
        if block.total_lanes() > u64::from(self.device.max_lanes_per_unit) {
            return Err(BackendError::invalid_launch(format!(
                "block of {} lanes exceeds the device limit of {}",
                block.total_lanes(),
                self.device.max_lanes_per_unit
            )));
        }

        let requested = block.total_lanes() as usize * size_of::<K::Lane>();
        let available = config.shared_memory.size_bytes.min(self.device.shared_memory_per_unit);
        if requested > available {
            return Err(BackendError::SharedMemoryAllocationFailed { requested, available });
        }

        Ok(())
    }

    /// Execute `kernel` over `config`, storing one output record per block
    pub fn execute<K: BlockKernel>(&self, kernel: &K, config: &LaunchConfig, output: BufferHandle) -> Result<()> {
        let total_blocks = config.total_blocks() as usize;
        let lanes_per_block = config.block.total_lanes() as usize;

        let _span = perf_span!(
            "cpu_launch",
            kernel = kernel.name(),
            grid_size = total_blocks,
            block_size = lanes_per_block
        );

        self.validate::<K>(config)?;

        let output_bytes = total_blocks * size_of::<K::Output>();
        {
            let memory = self.memory.read();
            let available = memory.buffer_size(output)?;
            if output_bytes > available {
                return Err(BackendError::BufferOutOfBounds {
                    offset: 0,
                    size: output_bytes,
                    buffer_size: available,
                });
            }
        }

        let start = std::time::Instant::now();

        // Compute phase: one read guard for the whole launch.
        let block_outputs: Vec<K::Output> = {
            let guard = self.memory.read();
            let memory: &MemoryManager = &guard;

            (0..total_blocks)
                .into_par_iter()
                .map(|block| -> Result<K::Output> {
                    let mut shared: Vec<K::Lane> = (0..lanes_per_block)
                        .into_par_iter()
                        .map(|lane| {
                            let ctx = ExecutionContext::from_linear(block as u64, lane as u64, config);
                            kernel.run_lane(&ctx, memory)
                        })
                        .collect::<Result<_>>()?;

                    let leader = ExecutionContext::from_linear(block as u64, 0, config);
                    Ok(kernel.reduce_block(&leader, &mut shared))
                })
                .collect::<Result<_>>()?
        };

        self.memory
            .write()
            .copy_to_buffer(output, bytemuck::cast_slice(&block_outputs))?;

        let duration_us = start.elapsed().as_micros() as u64;
        record_throughput(kernel.name(), config.total_lanes() as usize, duration_us);
        tracing::debug!(kernel = kernel.name(), %config, duration_us, "launch complete");

        Ok(())
    }
}
