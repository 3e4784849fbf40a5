//! Execution configuration
//!
//! The unit and lane counts of a search. They normally come from the
//! backend's topology query, optionally overridden from the environment or
//! the command line.
//!
//! # Environment Variables
//!
//! - `METRIC_CENTER_UNITS`: number of execution units
//! - `METRIC_CENTER_LANES`: lanes per unit

use crate::error::{Error, Result};
use crate::kernel::LaneSlot;
use metric_center_backends::{BlockDim, DeviceInfo, GridDim, LaunchConfig, SharedMemoryConfig};
use std::env::{self, VarError};
use std::fmt;

/// Lanes per unit unless configured otherwise
pub const DEFAULT_LANES_PER_UNIT: u32 = 1024;

/// Environment variable overriding the unit count
pub const ENV_UNITS: &str = "METRIC_CENTER_UNITS";

/// Environment variable overriding the lanes per unit
pub const ENV_LANES: &str = "METRIC_CENTER_LANES";

/// Unit and lane counts of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Execution units (grid size)
    pub units: u32,

    /// Lanes per unit (block size)
    pub lanes_per_unit: u32,
}

impl ExecutionConfig {
    /// Create a configuration, rejecting zero counts
    pub fn new(units: u32, lanes_per_unit: u32) -> Result<Self> {
        let config = Self { units, lanes_per_unit };
        config.validate()?;
        Ok(config)
    }

    /// One unit per compute unit of `device`, both counts clamped to its limits
    pub fn for_device(device: &DeviceInfo) -> Self {
        Self {
            units: device.compute_units.min(device.max_units).max(1),
            lanes_per_unit: DEFAULT_LANES_PER_UNIT.min(device.max_lanes_per_unit).max(1),
        }
    }

    /// [`Self::for_device`] with `METRIC_CENTER_UNITS` / `METRIC_CENTER_LANES` applied
    pub fn from_env(device: &DeviceInfo) -> Result<Self> {
        Self::for_device(device).with_overrides(read_env(ENV_UNITS)?, read_env(ENV_LANES)?)
    }

    /// Replace the counts that are `Some`
    pub fn with_overrides(self, units: Option<u32>, lanes_per_unit: Option<u32>) -> Result<Self> {
        Self::new(
            units.unwrap_or(self.units),
            lanes_per_unit.unwrap_or(self.lanes_per_unit),
        )
    }

    /// Check both counts are at least 1
    pub fn validate(&self) -> Result<()> {
        if self.units == 0 {
            return Err(Error::configuration("unit count must be at least 1"));
        }
        if self.lanes_per_unit == 0 {
            return Err(Error::configuration("lanes per unit must be at least 1"));
        }
        Ok(())
    }

    /// Check the configuration against `device` limits
    pub fn validate_for(&self, device: &DeviceInfo) -> Result<()> {
        self.validate()?;
        if self.units > device.max_units {
            return Err(Error::configuration(format!(
                "{} units exceeds the {} limit of {}",
                self.units, device.name, device.max_units
            )));
        }
        if self.lanes_per_unit > device.max_lanes_per_unit {
            return Err(Error::configuration(format!(
                "{} lanes per unit exceeds the {} limit of {}",
                self.lanes_per_unit, device.name, device.max_lanes_per_unit
            )));
        }
        Ok(())
    }

    /// Grid of `units` blocks of `lanes_per_unit` lanes, one lane slot of
    /// shared memory per lane
    pub fn launch_config(&self) -> LaunchConfig {
        let block = BlockDim::linear(self.lanes_per_unit);
        LaunchConfig::new(
            GridDim::linear(self.units),
            block,
            SharedMemoryConfig::per_lane::<LaneSlot>(block),
        )
    }
}

impl fmt::Display for ExecutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units × {} lanes", self.units, self.lanes_per_unit)
    }
}

fn read_env(name: &str) -> Result<Option<u32>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Error::configuration(format!("{name}={value:?} is not a positive integer"))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::configuration(format!("{name} is not valid unicode"))),
    }
}
