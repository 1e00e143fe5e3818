//! Slab extents: thin slices of the scan volume along one axis

use serde::{Deserialize, Serialize};

use super::clip::clip_threat_range;
use super::volume::{Point3, Volume};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn get(self, p: &Point3) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }

    fn set(self, p: &mut Point3, value: f64) {
        match self {
            Axis::X => p.x = value,
            Axis::Y => p.y = value,
            Axis::Z => p.z = value,
        }
    }
}

/// A slice of `thickness` centred on `center` along `axis`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub axis: Axis,
    pub center: f64,
    pub thickness: f64,
}

impl Slab {
    pub fn new(axis: Axis, center: f64, thickness: f64) -> Self {
        Self {
            axis,
            center,
            thickness,
        }
    }

    /// The slab's box inside `bounds`.
    ///
    /// The two axes across the slab span the full bounds; the slab axis is
    /// clipped into the bounds the same way threat ranges are.
    pub fn extent(&self, bounds: &Volume) -> Volume {
        let n = bounds.normalized();
        let (mut p0, mut p1) = (n.p0(), n.p1());
        let half = self.thickness.abs() / 2.0;
        let mut lo = self.center - half;
        let mut hi = self.center + half;
        clip_threat_range(self.axis.get(&p0), self.axis.get(&p1), &mut lo, &mut hi);
        self.axis.set(&mut p0, lo);
        self.axis.set(&mut p1, hi);
        Volume::new(p0, p1)
    }

    /// Check if a threat box overlaps the slab's range on the slab axis
    pub fn intersects(&self, volume: &Volume) -> bool {
        let n = volume.normalized();
        let half = self.thickness.abs() / 2.0;
        self.axis.get(&n.p0()) <= self.center + half && self.axis.get(&n.p1()) >= self.center - half
    }
}
