//! Pinch-grab hysteresis machine.
//!
//! Raw pinch distance jitters frame to frame, so a single threshold would
//! flicker between states. Entry and exit use an asymmetric band: close
//! below `grab_enter` to grab, open past `grab_exit` to release, and no
//! change anywhere inside the band.

use crate::config::ControlConfig;

/// Whether the right-zone hand currently holds the object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrabState {
    #[default]
    Released,
    Grabbed,
}

impl GrabState {
    /// Advance one frame. `pinch` is the right-zone pinch distance, `None`
    /// when that hand is absent — absence forces a release so the object is
    /// never left stuck in a grab nobody is making.
    #[must_use]
    pub fn step(self, pinch: Option<f32>, cfg: &ControlConfig) -> GrabState {
        let Some(pinch) = pinch else {
            return GrabState::Released;
        };

        match self {
            GrabState::Released if pinch < cfg.grab_enter => GrabState::Grabbed,
            GrabState::Grabbed if pinch > cfg.grab_exit => GrabState::Released,
            state => state,
        }
    }

    pub fn is_grabbed(self) -> bool {
        self == GrabState::Grabbed
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
