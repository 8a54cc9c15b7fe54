//! Screen-zone hand classification.
//!
//! The tracking service reports no handedness, so the roles "rotation hand"
//! and "zoom hand" are assigned by screen half: wrist left of the split is
//! the left zone, otherwise the right zone. With a mirrored camera this
//! matches what users expect; a single hand crossing the midline simply
//! changes role. When two hands land in the same zone the later one in
//! iteration order wins — a known simplification kept on purpose, since the
//! tracker offers nothing stable to break the tie with.

use hand_frame::{FrameObservation, Hand};

use crate::config::ControlConfig;

/// At most one hand per screen zone for this frame.
#[derive(Clone, Debug, Default)]
pub struct ZonedHands {
    pub left: Option<Hand>,
    pub right: Option<Hand>,
}

impl ZonedHands {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn both_present(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Partition this frame's hands into zones by wrist x-coordinate.
pub fn split_zones(obs: &FrameObservation, cfg: &ControlConfig) -> ZonedHands {
    let mut zones = ZonedHands::default();
    for hand in &obs.hands {
        if hand.wrist().x < cfg.zone_split_x {
            zones.left = Some(hand.clone());
        } else {
            zones.right = Some(hand.clone());
        }
    }
    zones
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
