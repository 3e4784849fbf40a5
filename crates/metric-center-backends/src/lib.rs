//! Execution backends for metric-center kernels
//!
//! This crate provides:
//! - **Launch geometry**: grids of blocks (execution units) made of lanes
//! - **Block kernels**: the compute → barrier → reduce contract every kernel follows
//! - **Backend trait**: buffer management plus kernel launch, retargetable to any hardware
//! - **CPU backend**: rayon-based reference implementation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      BlockKernel                         │
//! │        run_lane() per lane, reduce_block() per block     │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Backend trait                         │
//! │      buffers (global memory) + launch(grid × block)      │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!                       ▼
//!                 ┌───────────┐
//!                 │    CPU    │
//!                 │  (rayon)  │
//!                 └───────────┘
//! ```

pub mod backend;
pub mod backends;
pub mod error;
pub mod kernel;

// Re-export public API
pub use backend::{
    Backend, BlockDim, BufferHandle, DeviceInfo, ExecutionContext, GridDim, LaunchConfig, SharedMemoryConfig,
};
pub use backends::CpuBackend;
pub use error::{BackendError, Result};
pub use kernel::{BlockKernel, DeviceMemory, RecordView};
