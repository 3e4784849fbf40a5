//! Backend implementations for different execution targets
//!
//! - `cpu` - rayon thread-pool backend (reference implementation)

pub mod cpu;

pub use cpu::CpuBackend;
