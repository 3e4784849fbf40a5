//! Memory manager for the CPU backend
//!
//! Global memory is a map of heap buffers keyed by handle ID. Lanes read it
//! through the [`DeviceMemory`] view while the executor holds a read guard;
//! host copies take the write guard.

use crate::backend::BufferHandle;
use crate::error::{BackendError, Result};
use crate::kernel::DeviceMemory;
use std::collections::HashMap;

/// Heap-backed buffer storage
#[derive(Debug)]
pub struct MemoryManager {
    /// Buffers storage
    buffers: HashMap<u64, Vec<u8>>,

    /// Next buffer handle ID
    next_buffer_id: u64,
}

impl MemoryManager {
    /// Create an empty memory manager
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            next_buffer_id: 1,
        }
    }

    /// Allocate a zero-filled buffer
    pub fn allocate_buffer(&mut self, size: usize) -> Result<BufferHandle> {
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;

        self.buffers.insert(id, vec![0u8; size]);
        tracing::trace!(buffer = id, size, "allocated buffer");

        Ok(BufferHandle::new(id))
    }

    /// Free a buffer
    pub fn free_buffer(&mut self, handle: BufferHandle) -> Result<()> {
        if self.buffers.remove(&handle.id()).is_none() {
            return Err(BackendError::InvalidBufferHandle(handle.id()));
        }
        tracing::trace!(buffer = handle.id(), "freed buffer");
        Ok(())
    }

    /// Copy data to the start of a buffer
    pub fn copy_to_buffer(&mut self, handle: BufferHandle, data: &[u8]) -> Result<()> {
        let buffer = self
            .buffers
            .get_mut(&handle.id())
            .ok_or(BackendError::InvalidBufferHandle(handle.id()))?;

        if data.len() > buffer.len() {
            return Err(BackendError::BufferOutOfBounds {
                offset: 0,
                size: data.len(),
                buffer_size: buffer.len(),
            });
        }

        buffer[..data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copy the start of a buffer into `data`
    pub fn copy_from_buffer(&self, handle: BufferHandle, data: &mut [u8]) -> Result<()> {
        let buffer = self.bytes(handle)?;

        if data.len() > buffer.len() {
            return Err(BackendError::BufferOutOfBounds {
                offset: 0,
                size: data.len(),
                buffer_size: buffer.len(),
            });
        }

        data.copy_from_slice(&buffer[..data.len()]);
        Ok(())
    }

    /// Get buffer size
    pub fn buffer_size(&self, handle: BufferHandle) -> Result<usize> {
        self.bytes(handle).map(<[u8]>::len)
    }

    /// Number of live buffers
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn bytes(&self, handle: BufferHandle) -> Result<&[u8]> {
        self.buffers
            .get(&handle.id())
            .map(Vec::as_slice)
            .ok_or(BackendError::InvalidBufferHandle(handle.id()))
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceMemory for MemoryManager {
    fn buffer_bytes(&self, handle: BufferHandle) -> Result<&[u8]> {
        self.bytes(handle)
    }
}
