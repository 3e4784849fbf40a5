//! Block kernel contract
//!
//! A [`BlockKernel`] follows the compute → barrier → reduce shape of a GPU
//! thread block:
//!
//! ```text
//! Block b:
//!   lane 0 ─┐
//!   lane 1 ─┼─ run_lane() ─► shared[lane]  (no lane reads another lane's slot)
//!   ...     │
//!   lane T ─┘
//!        ── barrier ──
//!   reduce_block(shared) ─► output[b]       (one record per block)
//! ```
//!
//! Lanes only see global memory through the read-only [`DeviceMemory`] view,
//! so any number of them may run concurrently.

use crate::backend::{BufferHandle, ExecutionContext};
use crate::error::{BackendError, Result};
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem::size_of;

/// Read-only view of backend global memory handed to running lanes
pub trait DeviceMemory: Sync {
    /// Raw bytes of a buffer
    fn buffer_bytes(&self, handle: BufferHandle) -> Result<&[u8]>;
}

/// Typed, bounds-checked view over a buffer of fixed-width records
///
/// Records are read with unaligned loads, so the backing storage needs no
/// particular alignment.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a, T> {
    bytes: &'a [u8],
    len: usize,
    _record: PhantomData<T>,
}

impl<'a, T: Pod> RecordView<'a, T> {
    /// View the first `len` records of `handle`
    pub fn new(memory: &'a dyn DeviceMemory, handle: BufferHandle, len: usize) -> Result<Self> {
        let bytes = memory.buffer_bytes(handle)?;
        let needed = len * size_of::<T>();
        if needed > bytes.len() {
            return Err(BackendError::BufferOutOfBounds {
                offset: 0,
                size: needed,
                buffer_size: bytes.len(),
            });
        }
        Ok(Self {
            bytes: &bytes[..needed],
            len,
            _record: PhantomData,
        })
    }

    /// Number of records in the view
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the view holds no records
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Load record `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> T {
        let width = size_of::<T>();
        let start = index * width;
        bytemuck::pod_read_unaligned(&self.bytes[start..start + width])
    }
}

/// A kernel executed over a grid of blocks
pub trait BlockKernel: Sync {
    /// Per-lane record deposited in block shared memory
    type Lane: Send;

    /// Per-block record written back to the launch's output buffer
    type Output: Pod + Send;

    /// Kernel name used in logs and errors
    fn name(&self) -> &str;

    /// Phase 1: the work of one lane
    fn run_lane(&self, ctx: &ExecutionContext, memory: &dyn DeviceMemory) -> Result<Self::Lane>;

    /// Phase 2: fold the block's shared memory after every lane finished
    ///
    /// `ctx` is the context of lane 0 of the block, `shared` holds one entry
    /// per lane in linear lane order.
    fn reduce_block(&self, ctx: &ExecutionContext, shared: &mut [Self::Lane]) -> Self::Output;
}
