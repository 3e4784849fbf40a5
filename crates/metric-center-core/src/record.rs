//! Fixed-width records shared with the execution backend
//!
//! Both records are 16 bytes and plain old data so they can be copied to and
//! from backend buffers with `bytemuck`.

use crate::candidate::CandidateResult;
use crate::point::{Point, PointSource};
use bytemuck::{Pod, Zeroable};
use metric_center_backends::RecordView;

/// One input point in backend memory
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        Self { x: point.x, y: point.y }
    }
}

impl From<PointRecord> for Point {
    fn from(record: PointRecord) -> Self {
        Point::new(record.x, record.y)
    }
}

/// One unit result in backend memory
///
/// `occupied == 0` marks an unset slot; its index is then -1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CandidateRecord {
    pub radius: f64,
    pub index: i32,
    pub occupied: u32,
}

impl CandidateRecord {
    /// The unset slot
    pub const UNSET: Self = Self {
        radius: 0.0,
        index: -1,
        occupied: 0,
    };

    /// True when the slot holds a candidate
    pub fn is_set(&self) -> bool {
        self.occupied != 0 && self.index >= 0
    }

    /// Host view of the slot
    pub fn candidate(&self) -> Option<CandidateResult> {
        if !self.is_set() {
            return None;
        }
        usize::try_from(self.index)
            .ok()
            .map(|point_index| CandidateResult::new(point_index, self.radius))
    }
}

impl Default for CandidateRecord {
    fn default() -> Self {
        Self::UNSET
    }
}

impl From<Option<CandidateResult>> for CandidateRecord {
    /// Indices beyond `i32::MAX` cannot be represented and become unset;
    /// the pipeline rejects such inputs before launching.
    fn from(candidate: Option<CandidateResult>) -> Self {
        candidate
            .and_then(|c| {
                i32::try_from(c.point_index).ok().map(|index| Self {
                    radius: c.radius,
                    index,
                    occupied: 1,
                })
            })
            .unwrap_or(Self::UNSET)
    }
}

/// Points read straight out of a backend buffer
pub struct DevicePoints<'a>(pub RecordView<'a, PointRecord>);

impl PointSource for DevicePoints<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn point(&self, index: usize) -> Point {
        self.0.get(index).into()
    }
}
