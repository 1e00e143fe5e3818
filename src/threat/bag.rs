//! Per-bag collection of threats, constrained to the scan bounds

use std::sync::Arc;

use super::actor::ThreatBitmap;
use super::object::ThreatObject;
use super::opacity::ViewFlags;
use super::state::ThreatState;
use crate::geometry::{Slab, Volume, clip_volume_range};

/// All threats of one bag scan
#[derive(Debug, Clone, Default)]
pub struct ThreatVolume {
    bounds: Volume,
    threats: Vec<ThreatObject>,
}

impl ThreatVolume {
    pub fn new(bounds: Volume) -> Self {
        Self {
            bounds: bounds.normalized(),
            threats: Vec::new(),
        }
    }

    /// Scan bounds, minimum corner first
    pub fn bounds(&self) -> &Volume {
        &self.bounds
    }

    /// Clip a box into the scan bounds
    pub fn clip(&self, volume: &Volume) -> Volume {
        let (mut p0, mut p1) = (volume.p0(), volume.p1());
        clip_volume_range(&self.bounds.p0(), &self.bounds.p1(), &mut p0, &mut p1);
        Volume::new(p0, p1)
    }

    /// Add a threat with its box clipped to the bounds and return its position.
    ///
    /// A threat equal to one already present is not added again; the
    /// existing position is returned instead.
    pub fn add_threat(
        &mut self,
        volume: &Volume,
        id: impl Into<String>,
        text: impl Into<String>,
        bitmap: Option<&Arc<ThreatBitmap>>,
    ) -> usize {
        let position = self.threats.len();
        let index = i32::try_from(position).unwrap_or(i32::MAX);
        let threat = ThreatObject::new(index, &self.clip(volume), id, text, bitmap);

        if let Some(existing) = self.threats.iter().position(|t| t.is_same_threat(&threat)) {
            tracing::warn!(threat = threat.id(), position = existing, "duplicate threat ignored");
            return existing;
        }

        tracing::debug!(threat = threat.id(), position, size = threat.volume_size(), "threat added");
        self.threats.push(threat);
        position
    }

    pub fn len(&self) -> usize {
        self.threats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threats.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ThreatObject> {
        self.threats.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut ThreatObject> {
        self.threats.get_mut(position)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.threats.iter().position(|t| t.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&ThreatObject> {
        self.threats.iter().find(|t| t.id() == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ThreatObject> {
        self.threats.iter_mut().find(|t| t.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThreatObject> {
        self.threats.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ThreatObject> {
        self.threats.iter_mut()
    }

    /// Re-apply every threat's current state under new view flags
    pub fn refresh(&mut self, flags: &ViewFlags) {
        for threat in &mut self.threats {
            let state = threat.state();
            threat.set_threat_state(state, flags);
        }
    }

    /// Make the threat at `position` the active one and every other threat
    /// inactive. Cleared threats stay cleared. Returns false if there is no
    /// such threat.
    pub fn activate(&mut self, position: usize, flags: &ViewFlags) -> bool {
        if position >= self.threats.len() {
            return false;
        }
        for (i, threat) in self.threats.iter_mut().enumerate() {
            let requested = if i == position {
                ThreatState::Active
            } else {
                ThreatState::Inactive
            };
            threat.set_threat_state(requested, flags);
        }
        true
    }

    /// Clear one threat. Returns false if there is no such threat.
    pub fn clear(&mut self, position: usize) -> bool {
        match self.threats.get_mut(position) {
            Some(threat) => {
                threat.clear_threat();
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.threats.iter_mut().for_each(ThreatObject::clear_threat);
    }

    /// Mark every threat that is still pending as suspected
    pub fn suspect_all(&mut self) {
        self.threats
            .iter_mut()
            .filter(|t| !t.state().is_cleared())
            .for_each(ThreatObject::suspect_threat);
    }

    /// Number of threats not yet cleared
    pub fn pending_count(&self) -> usize {
        self.threats.iter().filter(|t| !t.state().is_cleared()).count()
    }

    /// The slab's box within the scan bounds
    pub fn slab_extent(&self, slab: &Slab) -> Volume {
        slab.extent(&self.bounds)
    }

    /// Ids of pending threats that reach into the slab
    pub fn threats_in_slab(&self, slab: &Slab) -> Vec<&str> {
        self.threats
            .iter()
            .filter(|t| !t.state().is_cleared() && slab.intersects(t.volume()))
            .map(ThreatObject::id)
            .collect()
    }

    /// Box around every pending threat, clipped to the bounds
    pub fn merged_extent(&self) -> Option<Volume> {
        self.threats
            .iter()
            .filter(|t| !t.state().is_cleared())
            .map(|t| *t.volume())
            .reduce(|acc, v| acc.union(&v))
            .map(|v| self.clip(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, Point3};
    use crate::threat::actor::{RecordingActor, SharedActor};
    use crate::threat::opacity::{ACTIVE_OPACITY, INACTIVE_OPACITY};

    fn vol(p0: [f64; 3], p1: [f64; 3]) -> Volume {
        Volume::new(p0.into(), p1.into())
    }

    fn bag() -> ThreatVolume {
        ThreatVolume::new(vol([0.0, 0.0, 0.0], [100.0, 100.0, 100.0]))
    }

    fn flags() -> ViewFlags {
        ViewFlags {
            machine_threats_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_clips_to_bounds() {
        let mut bag = bag();
        let pos = bag.add_threat(&vol([-10.0, 50.0, 90.0], [20.0, 60.0, 130.0]), "T1", "", None);
        let t = bag.get(pos).unwrap();
        assert_eq!(t.volume().p0(), Point3::new(0.0, 50.0, 90.0));
        assert_eq!(t.volume().p1(), Point3::new(20.0, 60.0, 100.0));
        assert_eq!(t.index(), 0);
    }

    #[test]
    fn test_add_skips_duplicates() {
        let mut bag = bag();
        let v = vol([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert_eq!(bag.add_threat(&v, "T1", "a", None), 0);
        assert_eq!(bag.add_threat(&v, "T2", "b", None), 1);
        assert_eq!(bag.add_threat(&v, "T1", "other text", None), 0);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_activate_moves_focus() {
        let mut bag = bag();
        let owned: Vec<_> = (0..3).map(|_| RecordingActor::shared()).collect();
        for (i, actor) in owned.iter().enumerate() {
            let v = vol([i as f64, 0.0, 0.0], [i as f64 + 1.0, 1.0, 1.0]);
            let pos = bag.add_threat(&v, format!("T{i}"), "", None);
            let shared: SharedActor = actor.clone();
            bag.get_mut(pos).unwrap().set_actor(&shared);
        }

        assert!(bag.activate(0, &flags()));
        assert!(bag.activate(2, &flags()));
        assert!(!bag.activate(3, &flags()));

        assert_eq!(bag.get(0).unwrap().state(), ThreatState::Inactive);
        assert_eq!(bag.get(2).unwrap().state(), ThreatState::Active);
        assert_eq!(owned[0].read().opacity(), Some(INACTIVE_OPACITY));
        assert_eq!(owned[1].read().opacity(), Some(INACTIVE_OPACITY));
        assert_eq!(owned[2].read().opacity(), Some(ACTIVE_OPACITY));
    }

    #[test]
    fn test_activate_drops_suspected_to_inactive() {
        let mut bag = bag();
        let owned: Vec<_> = (0..3).map(|_| RecordingActor::shared()).collect();
        for (i, actor) in owned.iter().enumerate() {
            let v = vol([0.0, i as f64, 0.0], [1.0, i as f64 + 1.0, 1.0]);
            let pos = bag.add_threat(&v, format!("T{i}"), "", None);
            let shared: SharedActor = actor.clone();
            bag.get_mut(pos).unwrap().set_actor(&shared);
        }
        bag.get_mut(0).unwrap().suspect_threat();
        bag.clear(2);

        assert!(bag.activate(1, &flags()));

        assert_eq!(bag.get(0).unwrap().state(), ThreatState::Inactive);
        assert_eq!(owned[0].read().opacity(), Some(INACTIVE_OPACITY));
        assert_eq!(bag.get(1).unwrap().state(), ThreatState::Active);
        assert_eq!(bag.get(2).unwrap().state(), ThreatState::Cleared);
        assert_eq!(owned[2].read().opacity(), Some(0.0));
    }

    #[test]
    fn test_threats_without_actor_clear_on_refresh() {
        let mut bag = bag();
        bag.add_threat(&vol([0.0; 3], [1.0; 3]), "T1", "", None);
        assert_eq!(bag.pending_count(), 1);
        bag.refresh(&flags());
        assert_eq!(bag.pending_count(), 0);
        assert_eq!(bag.merged_extent(), None);
    }

    #[test]
    fn test_merged_extent_skips_cleared() {
        let mut bag = bag();
        bag.add_threat(&vol([10.0, 10.0, 10.0], [20.0, 20.0, 20.0]), "A", "", None);
        bag.add_threat(&vol([50.0, 5.0, 30.0], [40.0, 15.0, 120.0]), "B", "", None);
        bag.add_threat(&vol([90.0, 90.0, 90.0], [95.0, 95.0, 95.0]), "C", "", None);
        assert!(bag.clear(2));
        assert!(!bag.clear(7));

        let extent = bag.merged_extent().unwrap();
        assert_eq!(extent.p0(), Point3::new(10.0, 5.0, 10.0));
        assert_eq!(extent.p1(), Point3::new(50.0, 20.0, 100.0));
        assert_eq!(bag.get(2).unwrap().index(), -1);
    }

    #[test]
    fn test_threats_in_slab() {
        let mut bag = bag();
        bag.add_threat(&vol([0.0, 0.0, 10.0], [5.0, 5.0, 20.0]), "A", "", None);
        bag.add_threat(&vol([0.0, 0.0, 40.0], [5.0, 5.0, 60.0]), "B", "", None);
        bag.add_threat(&vol([0.0, 0.0, 15.0], [5.0, 5.0, 45.0]), "C", "", None);
        let slab = Slab::new(Axis::Z, 50.0, 10.0);
        assert_eq!(bag.threats_in_slab(&slab), vec!["B", "C"]);
        bag.clear(2);
        assert_eq!(bag.threats_in_slab(&slab), vec!["B"]);

        let extent = bag.slab_extent(&Slab::new(Axis::Z, 98.0, 10.0));
        assert_eq!(extent.p0(), Point3::new(0.0, 0.0, 93.0));
        assert_eq!(extent.p1(), Point3::new(100.0, 100.0, 100.0));
    }

    #[test]
    fn test_suspect_all_skips_cleared() {
        let mut bag = bag();
        bag.add_threat(&vol([0.0; 3], [1.0; 3]), "A", "", None);
        bag.add_threat(&vol([0.0; 3], [2.0; 3]), "B", "", None);
        bag.clear(0);
        bag.suspect_all();
        assert_eq!(bag.find("A").unwrap().state(), ThreatState::Cleared);
        assert_eq!(bag.find("B").unwrap().state(), ThreatState::Suspected);
        bag.clear_all();
        assert_eq!(bag.pending_count(), 0);
    }
}
