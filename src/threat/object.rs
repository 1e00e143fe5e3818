//! A single threat box and its visibility state machine

use std::sync::{Arc, Weak};

use super::actor::{ActorRef, SharedActor, ThreatBitmap};
use super::opacity::{CLEAR_OPACITY, ViewFlags, decide_opacity};
use super::state::ThreatState;
use crate::classify::{ThreatAlarmType, ThreatGenerationType};
use crate::geometry::Volume;

pub const DEFAULT_OFFSET: u16 = 5000;

/// Index given to a threat once it has been cleared
pub const CLEARED_INDEX: i32 = -1;

/// One detected or operator-marked threat region in a bag scan.
///
/// The threat does not render anything. It holds weak references to the
/// renderer's actor and voxel mask and writes opacity through the actor.
#[derive(Debug, Clone)]
pub struct ThreatObject {
    index: i32,
    id: String,
    text: String,
    volume: Volume,
    alarm_type: ThreatAlarmType,
    generation: ThreatGenerationType,
    state: ThreatState,
    mass: f64,
    offset: u16,
    is_laptop: bool,
    actor: ActorRef,
    bitmap: Option<Weak<ThreatBitmap>>,
}

impl ThreatObject {
    pub fn new(
        index: i32,
        volume: &Volume,
        id: impl Into<String>,
        text: impl Into<String>,
        bitmap: Option<&Arc<ThreatBitmap>>,
    ) -> Self {
        Self {
            index,
            id: id.into(),
            text: text.into(),
            volume: *volume,
            alarm_type: ThreatAlarmType::Undefined,
            generation: ThreatGenerationType::Unknown,
            state: ThreatState::Inactive,
            mass: 0.0,
            offset: DEFAULT_OFFSET,
            is_laptop: false,
            actor: ActorRef::null(),
            bitmap: bitmap.map(Arc::downgrade),
        }
    }

    /// Move to `requested` and write the matching opacity to the actor.
    ///
    /// Without a live actor the threat collapses to cleared. A cleared threat
    /// ignores every request. Returns the opacity written, if any.
    pub fn set_threat_state(&mut self, requested: ThreatState, flags: &ViewFlags) -> Option<f64> {
        let Some(actor) = self.actor.upgrade() else {
            if !self.state.is_cleared() {
                tracing::warn!(threat = %self.id, "actor gone, threat cleared");
            }
            self.state = ThreatState::Cleared;
            return None;
        };

        if self.state.is_cleared() {
            return None;
        }

        self.state = requested;

        let decision = decide_opacity(self.state, self.is_laptop, self.generation, flags);
        tracing::trace!(threat = %self.id, rule = ?decision.rule, "opacity rule");

        if let Some(opacity) = decision.opacity {
            actor.write().set_opacity(opacity);
        }
        tracing::debug!(
            threat = %self.id,
            state = %self.state,
            opacity = ?decision.opacity,
            "threat state set"
        );
        decision.opacity
    }

    /// Clear the threat for good: zero opacity and drop the index
    pub fn clear_threat(&mut self) {
        self.state = ThreatState::Cleared;
        if let Some(actor) = self.actor.upgrade() {
            actor.write().set_opacity(CLEAR_OPACITY);
        }
        self.index = CLEARED_INDEX;
        tracing::debug!(threat = %self.id, "threat cleared");
    }

    /// Mark as suspected without touching the actor.
    /// Call [`Self::set_threat_state`] afterwards for a visual update.
    pub fn suspect_threat(&mut self) {
        self.state = ThreatState::Suspected;
    }

    /// Forget the actor; the state is kept until the next state request
    pub fn null_actor(&mut self) {
        self.actor = ActorRef::null();
    }

    pub fn set_actor(&mut self, actor: &SharedActor) {
        self.actor = ActorRef::new(actor);
    }

    pub fn actor(&self) -> Option<SharedActor> {
        self.actor.upgrade()
    }

    pub fn is_actor_null(&self) -> bool {
        !self.actor.is_present()
    }

    pub fn bitmap(&self) -> Option<Arc<ThreatBitmap>> {
        self.bitmap.as_ref().and_then(Weak::upgrade)
    }

    pub fn state(&self) -> ThreatState {
        self.state
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn volume_size(&self) -> i64 {
        self.volume.size()
    }

    pub fn alarm_type(&self) -> ThreatAlarmType {
        self.alarm_type
    }

    pub fn set_alarm_type(&mut self, alarm_type: ThreatAlarmType) {
        self.alarm_type = alarm_type;
    }

    pub fn gen_type(&self) -> ThreatGenerationType {
        self.generation
    }

    pub fn set_gen_type(&mut self, generation: ThreatGenerationType) {
        self.generation = generation;
    }

    /// Mass in grams
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u16) {
        self.offset = offset;
    }

    pub fn is_laptop(&self) -> bool {
        self.is_laptop
    }

    pub fn set_laptop(&mut self, is_laptop: bool) {
        self.is_laptop = is_laptop;
    }

    /// Same box corners and same id; every other field is ignored
    pub fn is_same_threat(&self, other: &ThreatObject) -> bool {
        self.volume.p0() == other.volume.p0()
            && self.volume.p1() == other.volume.p1()
            && self.id == other.id
    }
}
