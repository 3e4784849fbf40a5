//! Backend trait for kernel execution
//!
//! This trait defines the interface that all backends must implement.

use super::types::{BufferHandle, DeviceInfo, LaunchConfig};
use crate::error::Result;
use crate::kernel::BlockKernel;
use bytemuck::Pod;

/// Backend trait for kernel execution
///
/// Backends run [`BlockKernel`]s over a grid of blocks (execution units),
/// each made of lanes, on some hardware target (thread pool, SIMD, GPU).
///
/// ```text
/// Grid (config.grid):            Block (config.block):
///   ┌─────┬─────┬─────┐            ┌────┬────┬────┐
///   │Block│Block│Block│            │Lane│Lane│Lane│  every lane runs run_lane()
///   └─────┴─────┴─────┘            └────┴────┴────┘  then reduce_block() once
/// ```
///
/// # Memory Model
///
/// Global memory is a set of byte buffers addressed by [`BufferHandle`].
/// The host fills them with `copy_to_buffer()`, kernels read them during a
/// launch, and each block writes exactly one output record to the launch's
/// output buffer at `block_linear_index * size_of::<Output>()`.
///
/// # Usage
///
/// ```rust
/// use metric_center_backends::{Backend, CpuBackend};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut backend = CpuBackend::new();
///
/// let buffer = backend.upload_records(&[1.0f64, 2.0, 3.0, 4.0])?;
/// assert_eq!(backend.buffer_size(buffer)?, 32);
///
/// let values: Vec<f64> = backend.download_records(buffer, 4)?;
/// assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
///
/// backend.free_buffer(buffer)?;
/// # Ok(())
/// # }
/// ```
pub trait Backend {
    // ============================================================================================
    // Device Topology
    // ============================================================================================

    /// Report the device's compute units and per-unit limits
    fn device_info(&self) -> DeviceInfo;

    // ============================================================================================
    // Kernel Execution
    // ============================================================================================

    /// Launch `kernel` over `config`, writing one record per block to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The grid or block has a zero dimension, or the block exceeds the device limit
    /// - The block's shared memory does not fit the configuration or the device
    /// - `output` is invalid or smaller than one record per block
    /// - Any lane fails
    fn launch<K: BlockKernel>(&mut self, kernel: &K, config: &LaunchConfig, output: BufferHandle) -> Result<()>;

    // ============================================================================================
    // Buffer Management
    // ============================================================================================

    /// Allocate a zero-filled buffer of the given size in bytes
    fn allocate_buffer(&mut self, size: usize) -> Result<BufferHandle>;

    /// Free a previously allocated buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer handle is invalid.
    fn free_buffer(&mut self, handle: BufferHandle) -> Result<()>;

    /// Copy data from host to the start of a buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the data does not fit.
    fn copy_to_buffer(&mut self, handle: BufferHandle, data: &[u8]) -> Result<()>;

    /// Copy the start of a buffer back to the host
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or `data` is larger than the buffer.
    fn copy_from_buffer(&mut self, handle: BufferHandle, data: &mut [u8]) -> Result<()>;

    /// Get buffer size in bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer handle is invalid.
    fn buffer_size(&self, handle: BufferHandle) -> Result<usize>;

    // ============================================================================================
    // Typed Helpers
    // ============================================================================================

    /// Allocate a buffer holding exactly `records` and upload them
    fn upload_records<T: Pod>(&mut self, records: &[T]) -> Result<BufferHandle> {
        let bytes: &[u8] = bytemuck::cast_slice(records);
        let handle = self.allocate_buffer(bytes.len())?;
        if let Err(err) = self.copy_to_buffer(handle, bytes) {
            let _ = self.free_buffer(handle);
            return Err(err);
        }
        Ok(handle)
    }

    /// Read the first `count` records of a buffer
    fn download_records<T: Pod>(&mut self, handle: BufferHandle, count: usize) -> Result<Vec<T>> {
        let mut records = vec![T::zeroed(); count];
        self.copy_from_buffer(handle, bytemuck::cast_slice_mut(&mut records))?;
        Ok(records)
    }
}
