//! Launch geometry and handles
//!
//! A launch is a grid of blocks (execution units), each a block of lanes.
//! Both levels are 3-D shapes; kernels address them through the linear
//! indices [`ExecutionContext`] exposes.

use std::fmt;
use std::mem::size_of;

/// Opaque handle to a backend buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

impl BufferHandle {
    /// Wrap a raw buffer ID
    pub const fn new(id: u64) -> Self {
        BufferHandle(id)
    }

    /// Raw buffer ID
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buf{}", self.0)
    }
}

macro_rules! shape3 {
    ($(#[$doc:meta])* $name:ident, $count:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub x: u32,
            pub y: u32,
            pub z: u32,
        }

        impl $name {
            /// Shape with explicit extents
            pub const fn new(x: u32, y: u32, z: u32) -> Self {
                Self { x, y, z }
            }

            /// 1-D shape of `size`
            pub const fn linear(size: u32) -> Self {
                Self::new(size, 1, 1)
            }

            /// Number of cells in the shape
            pub const fn $count(&self) -> u64 {
                self.x as u64 * self.y as u64 * self.z as u64
            }

            /// True when any extent is zero
            pub const fn is_degenerate(&self) -> bool {
                self.x == 0 || self.y == 0 || self.z == 0
            }

        }

        impl Default for $name {
            fn default() -> Self {
                Self::linear(1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {}, {})", self.x, self.y, self.z)
            }
        }
    };
}

shape3!(
    /// Blocks of a launch; one block runs on one execution unit
    GridDim,
    total_blocks
);

shape3!(
    /// Lanes of one block
    BlockDim,
    total_lanes
);

/// Shared memory a block needs, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SharedMemoryConfig {
    pub size_bytes: usize,
}

impl SharedMemoryConfig {
    /// Exactly `size_bytes`
    pub const fn new(size_bytes: usize) -> Self {
        Self { size_bytes }
    }

    /// Room for one `T` per lane of `block`
    pub const fn per_lane<T>(block: BlockDim) -> Self {
        Self::new(block.total_lanes() as usize * size_of::<T>())
    }
}

/// Grid, block and shared memory of one launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    pub grid: GridDim,
    pub block: BlockDim,
    pub shared_memory: SharedMemoryConfig,
}

impl LaunchConfig {
    pub const fn new(grid: GridDim, block: BlockDim, shared_memory: SharedMemoryConfig) -> Self {
        Self {
            grid,
            block,
            shared_memory,
        }
    }

    /// Blocks in the grid
    pub const fn total_blocks(&self) -> u64 {
        self.grid.total_blocks()
    }

    /// Lanes across the whole grid
    pub const fn total_lanes(&self) -> u64 {
        self.grid.total_blocks() * self.block.total_lanes()
    }
}

impl fmt::Display for LaunchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grid={}, block={}, shared_mem={}B",
            self.grid, self.block, self.shared_memory.size_bytes
        )
    }
}

/// Topology and limits reported by a backend
///
/// `compute_units` plays the role of a GPU's multiprocessor count: the
/// natural number of blocks to launch so that every unit is busy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable device name
    pub name: String,

    /// Number of independent parallel engines
    pub compute_units: u32,

    /// Largest grid a launch may request
    pub max_units: u32,

    /// Largest block a launch may request
    pub max_lanes_per_unit: u32,

    /// Shared memory available to one block, in bytes
    pub shared_memory_per_unit: usize,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} units, at most {} per launch, {} lanes/unit, {}B shared/unit)",
            self.name, self.compute_units, self.max_units, self.max_lanes_per_unit, self.shared_memory_per_unit
        )
    }
}

/// Where a running lane sits in its launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    block: u64,
    lane: u64,
    block_dim: BlockDim,
}

impl ExecutionContext {
    /// Lane `lane` of block `block` under `config`, both linear
    pub const fn from_linear(block: u64, lane: u64, config: &LaunchConfig) -> Self {
        Self {
            block,
            lane,
            block_dim: config.block,
        }
    }

    /// Linear index of the block within the grid
    pub const fn block_linear_index(&self) -> u64 {
        self.block
    }

    /// Linear index of the lane within its block
    pub const fn lane_linear_index(&self) -> u64 {
        self.lane
    }

    /// Lanes in this lane's block
    pub const fn lanes_per_block(&self) -> u64 {
        self.block_dim.total_lanes()
    }
}
