//! Metric center search
//!
//! For a set of 2-D points, finds the point whose largest distance to every
//! other point is smallest, by evaluating all pairs on an execution backend.
//!
//! # Architecture
//!
//! ```text
//! PointSet ──► PartitionPlan ──► RadiusKernel ──► reduce_unit ──► reduce_global ──► Report
//!  (load)      (units × lanes)   (one lane per      (tournament      (host scan
//!                                  assigned point)   per unit)        over units)
//! ```
//!
//! The kernel runs on any [`metric_center_backends::Backend`]; the CPU
//! backend spreads units and lanes over the rayon pool.
//!
//! # Example
//!
//! ```rust
//! use metric_center_core::{pipeline, ExecutionConfig, PointSet};
//! use metric_center_backends::CpuBackend;
//!
//! # fn main() -> metric_center_core::Result<()> {
//! let points = PointSet::parse("0 0\n1 0\n0 1\n")?;
//! let mut backend = CpuBackend::new();
//! let config = ExecutionConfig::new(2, 64)?;
//!
//! let report = pipeline::solve_report(&mut backend, &points, &config)?;
//! assert_eq!(report.index, 0);
//! assert_eq!(report.to_string(), "0 (0.0000,0.0000)\n1.0000");
//! # Ok(())
//! # }
//! ```

pub mod candidate;
pub mod config;
pub mod error;
pub mod kernel;
pub mod partition;
pub mod pipeline;
pub mod point;
pub mod radius;
pub mod record;
pub mod reduce;
pub mod report;

pub use candidate::CandidateResult;
pub use config::{ExecutionConfig, DEFAULT_LANES_PER_UNIT};
pub use error::{Error, MalformedInput, Result};
pub use kernel::RadiusKernel;
pub use partition::{Assignment, PartitionPlan};
pub use pipeline::{solve, solve_on_cpu, solve_report};
pub use point::{Point, PointSet, PointSource};
pub use radius::{enclosing_radius, evaluate, reference_center};
pub use record::{CandidateRecord, PointRecord};
pub use reduce::{reduce_global, reduce_unit};
pub use report::{format_significant, report, OutputFormat, Report};
