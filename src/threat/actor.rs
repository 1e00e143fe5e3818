//! Non-owning handles to renderer-side resources of a threat.
//!
//! The renderer owns the box actor and the voxel mask of every threat. A
//! [`ThreatObject`](super::ThreatObject) only keeps weak references to them:
//! once the owner drops a resource, upgrading the reference fails and the
//! threat treats it as absent.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// The one operation the threat model needs from a rendered threat box
pub trait ThreatActor: Send + Sync {
    fn set_opacity(&mut self, opacity: f64);
}

/// An actor as owned by the renderer
pub type SharedActor = Arc<RwLock<dyn ThreatActor>>;

/// Weak reference to a renderer-owned actor
#[derive(Clone, Default)]
pub struct ActorRef(Option<Weak<RwLock<dyn ThreatActor>>>);

impl ActorRef {
    pub fn new(actor: &SharedActor) -> Self {
        Self(Some(Arc::downgrade(actor)))
    }

    /// A reference that never resolves
    pub fn null() -> Self {
        Self(None)
    }

    /// The actor, if its owner still holds it
    pub fn upgrade(&self) -> Option<SharedActor> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_present(&self) -> bool {
        self.0.as_ref().is_some_and(|w| w.strong_count() > 0)
    }
}

impl std::fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ActorRef").field(&self.is_present()).finish()
    }
}

/// Actor that remembers every opacity it was given
#[derive(Debug, Clone, Default)]
pub struct RecordingActor {
    pub history: Vec<f64>,
}

impl RecordingActor {
    pub fn shared() -> Arc<RwLock<RecordingActor>> {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Last opacity written, if any
    pub fn opacity(&self) -> Option<f64> {
        self.history.last().copied()
    }
}

impl ThreatActor for RecordingActor {
    fn set_opacity(&mut self, opacity: f64) {
        self.history.push(opacity);
    }
}

/// Voxel footprint of a threat, owned by whoever decoded the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatBitmap {
    dims: [usize; 3],
    bits: Vec<bool>,
}

impl ThreatBitmap {
    /// Build a mask from `bits` in x-fastest order.
    /// Returns `None` if the length does not match `dims`, or if `dims`
    /// describes more voxels than `usize` can count.
    pub fn new(dims: [usize; 3], bits: Vec<bool>) -> Option<Self> {
        let voxels = dims[0].checked_mul(dims[1])?.checked_mul(dims[2])?;
        (bits.len() == voxels).then_some(Self { dims, bits })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn is_set(&self, x: usize, y: usize, z: usize) -> bool {
        let [w, h, d] = self.dims;
        if x >= w || y >= h || z >= d {
            return false;
        }
        self.bits[(z * h + y) * w + x]
    }

    /// Number of voxels inside the threat
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}
