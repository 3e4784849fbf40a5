//! CPU backend implementation
//!
//! Reference implementation of the Backend trait for CPU execution.
//!
//! # Architecture
//!
//! ```text
//! CpuBackend
//! ├── MemoryManager  - Heap buffers behind Arc<RwLock<_>>
//! └── CpuExecutor    - Rayon-based grid/block execution
//! ```
//!
//! # Usage
//!
//! ```rust
//! use metric_center_backends::{Backend, CpuBackend};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backend = CpuBackend::new();
//! println!("running on {}", backend.device_info());
//!
//! let buffer = backend.allocate_buffer(1024)?;
//! backend.free_buffer(buffer)?;
//! # Ok(())
//! # }
//! ```

mod executor;
pub(crate) mod memory;

use crate::backend::{Backend, BufferHandle, DeviceInfo, LaunchConfig};
use crate::error::Result;
use crate::kernel::BlockKernel;
use executor::CpuExecutor;
use memory::MemoryManager;
use parking_lot::RwLock;
use std::sync::Arc;

/// Largest block the CPU backend accepts, matching common GPU limits
pub const CPU_MAX_LANES_PER_UNIT: u32 = 1024;

/// Largest grid the CPU backend accepts
pub const CPU_MAX_UNITS: u32 = 65_535;

/// Shared memory the CPU backend grants each block (48 KiB)
pub const CPU_SHARED_MEMORY_PER_UNIT: usize = 48 * 1024;

/// CPU backend for executing block kernels
///
/// Blocks and lanes run as rayon tasks; the rayon thread count is reported
/// as the device's compute units.
#[derive(Clone)]
pub struct CpuBackend {
    /// Memory manager (buffers)
    memory: Arc<RwLock<MemoryManager>>,

    /// Reported topology and launch limits
    device: DeviceInfo,
}

impl CpuBackend {
    /// Create a new CPU backend sized to the current rayon pool
    pub fn new() -> Self {
        Self::with_device(DeviceInfo {
            name: "cpu (rayon)".to_string(),
            compute_units: rayon::current_num_threads().clamp(1, CPU_MAX_UNITS as usize) as u32,
            max_units: CPU_MAX_UNITS,
            max_lanes_per_unit: CPU_MAX_LANES_PER_UNIT,
            shared_memory_per_unit: CPU_SHARED_MEMORY_PER_UNIT,
        })
    }

    /// Create a CPU backend that reports and enforces the given topology
    pub fn with_device(device: DeviceInfo) -> Self {
        tracing::debug!(%device, "cpu backend created");
        Self {
            memory: Arc::new(RwLock::new(MemoryManager::new())),
            device,
        }
    }

    /// Number of buffers currently allocated
    pub fn live_buffers(&self) -> usize {
        self.memory.read().live_buffers()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        self.device.clone()
    }

    fn launch<K: BlockKernel>(&mut self, kernel: &K, config: &LaunchConfig, output: BufferHandle) -> Result<()> {
        let executor = CpuExecutor::new(Arc::clone(&self.memory), self.device.clone());
        executor.execute(kernel, config, output)
    }

    fn allocate_buffer(&mut self, size: usize) -> Result<BufferHandle> {
        self.memory.write().allocate_buffer(size)
    }

    fn free_buffer(&mut self, handle: BufferHandle) -> Result<()> {
        self.memory.write().free_buffer(handle)
    }

    fn copy_to_buffer(&mut self, handle: BufferHandle, data: &[u8]) -> Result<()> {
        self.memory.write().copy_to_buffer(handle, data)
    }

    fn copy_from_buffer(&mut self, handle: BufferHandle, data: &mut [u8]) -> Result<()> {
        self.memory.read().copy_from_buffer(handle, data)
    }

    fn buffer_size(&self, handle: BufferHandle) -> Result<usize> {
        self.memory.read().buffer_size(handle)
    }
}
