//! Threat-box state model for a baggage-screening workstation.
//!
//! The crate tracks one bounding volume per detected threat, derives the
//! opacity a renderer should give that threat's box from the current view
//! mode, and clips threat boxes against the physical scan bounds.
//!
//! - [`geometry`]: points, volumes, range clipping and slab extents.
//! - [`classify`]: alarm categories, their names and colors, and inference
//!   from detection-report assessments.
//! - [`threat`]: the per-threat state machine and the per-bag collection.
//! - [`scenario`]: JSON screening scenarios that drive the model end to end.

pub mod classify;
pub mod geometry;
pub mod scenario;
pub mod threat;

pub use classify::{ThreatAlarmType, ThreatGenerationType};
pub use geometry::{Point3, Volume};
pub use threat::{ThreatObject, ThreatState, ThreatVolume, ViewFlags};
