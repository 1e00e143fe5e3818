//! Axis-aligned threat volumes defined by two corner points

use serde::{Deserialize, Serialize};

/// A point in scan space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Componentwise minimum
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Componentwise maximum
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Box spanned by two corners.
///
/// The corners are kept exactly as given: `p0` is not required to be the
/// componentwise minimum. [`Volume::size`] is therefore signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    p0: Point3,
    p1: Point3,
}

impl Volume {
    pub const fn new(p0: Point3, p1: Point3) -> Self {
        Self { p0, p1 }
    }

    pub fn p0(&self) -> Point3 {
        self.p0
    }

    pub fn p1(&self) -> Point3 {
        self.p1
    }

    pub fn set_p0(&mut self, x: f64, y: f64, z: f64) {
        self.p0 = Point3::new(x, y, z);
    }

    pub fn set_p1(&mut self, x: f64, y: f64, z: f64) {
        self.p1 = Point3::new(x, y, z);
    }

    /// Signed product of the corner differences, truncated toward zero.
    ///
    /// Negative when an odd number of axes are inverted.
    pub fn size(&self) -> i64 {
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        let dz = self.p1.z - self.p0.z;
        (dx * dy * dz) as i64
    }

    /// Same box with `p0` as the minimum corner and `p1` as the maximum
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            p0: self.p0.min(self.p1),
            p1: self.p0.max(self.p1),
        }
    }

    /// Smallest normalized box containing both volumes
    #[must_use]
    pub fn union(&self, other: &Volume) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self {
            p0: a.p0.min(b.p0),
            p1: a.p1.max(b.p1),
        }
    }

    /// Check if a point lies inside the box (bounds inclusive)
    pub fn contains(&self, p: Point3) -> bool {
        let n = self.normalized();
        p.x >= n.p0.x
            && p.x <= n.p1.x
            && p.y >= n.p0.y
            && p.y <= n.p1.y
            && p.z >= n.p0.z
            && p.z <= n.p1.z
    }
}
