//! Threat boxes: visibility state machine, opacity rules and per-bag collection

mod actor;
mod bag;
mod object;
mod opacity;
mod state;

pub use actor::{ActorRef, RecordingActor, SharedActor, ThreatActor, ThreatBitmap};
pub use bag::ThreatVolume;
pub use object::{CLEARED_INDEX, DEFAULT_OFFSET, ThreatObject};
pub use opacity::{
    ACTIVE_OPACITY, CLEAR_OPACITY, HIDE_OPACITY, INACTIVE_OPACITY, OpacityDecision, OpacityRule,
    ViewFlags, decide_opacity,
};
pub use state::ThreatState;
