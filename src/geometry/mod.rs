//! Geometry primitives for threat boxes and scan bounds

mod clip;
mod slab;
mod volume;

pub use clip::{clip_threat_range, clip_volume_range};
pub use slab::{Axis, Slab};
pub use volume::{Point3, Volume};
