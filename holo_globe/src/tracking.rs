//! Hand tracking sources — simulation and LeapMotion hardware.
//!
//! The frame scheduler only sees the [`TrackingSource`] trait: initialize
//! once, then one synchronous `detect` per tick returning that frame's
//! landmarks (or nothing). The default build ships [`SimTrackingSource`],
//! which synthesizes full 21-point hands from mouse/keyboard state sent
//! over a channel by the visualizer window, so the entire gesture pipeline
//! runs unmodified without a camera. The `leap` feature swaps in real
//! hardware.

use std::sync::mpsc::Receiver;

use hand_frame::landmark::*;
use hand_frame::{FrameObservation, Hand, Point2D, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// TrackingSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce per-frame hand observations.
pub trait TrackingSource {
    /// One-time startup. Failure here is fatal to the session and must be
    /// surfaced to the caller, never swallowed.
    fn initialize(&mut self) -> Result<(), String>;

    /// Landmarks for the current frame. `None` means the service had
    /// nothing this tick; the caller treats it like an empty frame.
    fn detect(&mut self) -> Option<FrameObservation>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimControls — per-frame input state from the window
// ════════════════════════════════════════════════════════════════════════════

/// Pose the simulated hand is holding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimPose {
    #[default]
    Relaxed,
    Insult,
    Spread,
}

/// Snapshot of the simulation inputs, sent by the visualizer every frame.
#[derive(Clone, Copy, Debug)]
pub struct SimControls {
    /// Primary hand wrist in normalized window coordinates.
    pub cursor: (f32, f32),
    /// Primary hand present at all (cursor inside the window).
    pub hand_present: bool,
    /// Left mouse button held: pinch closed.
    pub pinch_closed: bool,
    /// Apparent hand size (wrist ↔ middle knuckle).
    pub hand_span: f32,
    /// Mirrored second hand held active.
    pub second_hand: bool,
    /// Wrist y of the mirrored hand.
    pub second_hand_y: f32,
    pub pose: SimPose,
}

impl Default for SimControls {
    fn default() -> Self {
        SimControls {
            cursor: (0.25, 0.5),
            hand_present: false,
            pinch_closed: false,
            hand_span: 0.15,
            second_hand: false,
            second_hand_y: 0.5,
            pose: SimPose::Relaxed,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic hand builder
// ════════════════════════════════════════════════════════════════════════════

/// Concrete finger layout for one synthesized hand.
#[derive(Clone, Copy, Debug, PartialEq)]
enum HandShape {
    /// Fingers extended, thumb–index gap wide open.
    Open,
    /// Hand closed into a pinch: thumb meets index, other fingers curled.
    Pinched,
    /// Middle finger alone extended on an upright hand.
    Insult,
    /// Thumb–index pinched with middle/ring/pinky extended.
    Spread,
}

impl HandShape {
    fn resolve(pose: SimPose, pinch_closed: bool) -> Self {
        match pose {
            SimPose::Insult => HandShape::Insult,
            SimPose::Spread => HandShape::Spread,
            SimPose::Relaxed if pinch_closed => HandShape::Pinched,
            SimPose::Relaxed => HandShape::Open,
        }
    }
}

fn pt(x: f32, y: f32) -> Point2D {
    Point2D::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

/// Place a four-joint finger column above its knuckle. `reach` is the tip's
/// height above the knuckle in units of the hand span.
fn lay_finger(pts: &mut [Point2D; LANDMARK_COUNT], mcp: usize, span: f32, reach: f32) {
    let base = pts[mcp];
    pts[mcp + 1] = pt(base.x, base.y - span * reach * 0.45);
    pts[mcp + 2] = pt(base.x, base.y - span * reach * 0.75);
    pts[mcp + 3] = pt(base.x, base.y - span * reach);
}

/// Build a full 21-landmark hand at `wrist` with the given apparent size
/// and shape. Fingers point up (decreasing y), matching a hand raised to a
/// camera.
pub fn synth_hand(wrist: Point2D, span: f32, pose: SimPose, pinch_closed: bool) -> Hand {
    let shape = HandShape::resolve(pose, pinch_closed);
    let (wx, wy) = (wrist.x, wrist.y);
    let mut pts = [wrist; LANDMARK_COUNT];

    // Knuckle row: middle MCP sits exactly one span above the wrist so the
    // apparent-size measurement reproduces `span`.
    pts[INDEX_MCP] = pt(wx - 0.25 * span, wy - 0.95 * span);
    pts[MIDDLE_MCP] = pt(wx, wy - span);
    pts[RING_MCP] = pt(wx + 0.25 * span, wy - 0.95 * span);
    pts[PINKY_MCP] = pt(wx + 0.5 * span, wy - 0.8 * span);

    // Thumb column off the index side.
    pts[THUMB_CMC] = pt(wx - 0.4 * span, wy - 0.2 * span);
    pts[THUMB_MCP] = pt(wx - 0.55 * span, wy - 0.5 * span);
    pts[THUMB_IP] = pt(wx - 0.6 * span, wy - 0.75 * span);

    let (index_reach, middle_reach, ring_reach, pinky_reach) = match shape {
        HandShape::Open => (0.8, 0.8, 0.8, 0.7),
        HandShape::Pinched => (0.35, 0.15, 0.15, 0.15),
        HandShape::Insult => (0.1, 0.9, 0.1, 0.1),
        HandShape::Spread => (0.35, 0.85, 0.85, 0.75),
    };
    lay_finger(&mut pts, INDEX_MCP, span, index_reach);
    lay_finger(&mut pts, MIDDLE_MCP, span, middle_reach);
    lay_finger(&mut pts, RING_MCP, span, ring_reach);
    lay_finger(&mut pts, PINKY_MCP, span, pinky_reach);

    // The thumb tip lands relative to the index tip so the pinch distance
    // is a direct function of the shape.
    let index_tip = pts[INDEX_TIP];
    pts[THUMB_TIP] = match shape {
        HandShape::Pinched | HandShape::Spread => pt(index_tip.x - 0.02, index_tip.y),
        HandShape::Open => pt(index_tip.x - 0.8 * span, index_tip.y + 0.3 * span),
        HandShape::Insult => pt(wx - 0.5 * span, wy - 0.4 * span),
    };

    Hand::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackingSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source fed by [`SimControls`] snapshots from the visualizer
/// window. The latest snapshot wins; detection itself never blocks.
pub struct SimTrackingSource {
    rx: Receiver<SimControls>,
    latest: SimControls,
}

impl SimTrackingSource {
    pub fn new(rx: Receiver<SimControls>) -> Self {
        SimTrackingSource {
            rx,
            latest: SimControls::default(),
        }
    }
}

impl TrackingSource for SimTrackingSource {
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn detect(&mut self) -> Option<FrameObservation> {
        while let Ok(controls) = self.rx.try_recv() {
            self.latest = controls;
        }
        let c = self.latest;

        let mut obs = FrameObservation::empty();
        if c.hand_present {
            let wrist = Point2D::new(c.cursor.0, c.cursor.1);
            obs.hands
                .push(synth_hand(wrist, c.hand_span, c.pose, c.pinch_closed));

            if c.second_hand {
                // Mirror across the vertical midline at its own height; the
                // zone classifier sorts out which is which.
                let mirrored = Point2D::new(1.0 - c.cursor.0, c.second_hand_y);
                obs.hands
                    .push(synth_hand(mirrored, c.hand_span, SimPose::Relaxed, false));
            }
        }
        Some(obs)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapTrackingSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source backed by a LeapMotion controller.
///
/// Palm and digit joints are read in millimeters and squashed into the
/// normalized image-space box the rest of the pipeline expects, with y
/// flipped (Leap y grows upward, image y grows downward).
#[cfg(feature = "leap")]
pub struct LeapTrackingSource {
    connection: Option<leaprs::Connection>,
}

#[cfg(feature = "leap")]
impl LeapTrackingSource {
    // Interaction volume mapped onto [0,1]².
    const X_MIN_MM: f32 = -250.0;
    const X_MAX_MM: f32 = 250.0;
    const Y_MIN_MM: f32 = 100.0;
    const Y_MAX_MM: f32 = 400.0;

    pub fn new() -> Self {
        LeapTrackingSource { connection: None }
    }

    fn normalize(x_mm: f32, y_mm: f32) -> Point2D {
        let x = (x_mm - Self::X_MIN_MM) / (Self::X_MAX_MM - Self::X_MIN_MM);
        let y = (y_mm - Self::Y_MIN_MM) / (Self::Y_MAX_MM - Self::Y_MIN_MM);
        Point2D::new(x.clamp(0.0, 1.0), (1.0 - y).clamp(0.0, 1.0))
    }

    fn hand_landmarks(hand: &leaprs::Hand) -> Option<Hand> {
        let mut pts = [Point2D::default(); LANDMARK_COUNT];
        let palm = hand.palm().position();
        pts[WRIST] = Self::normalize(palm.x, palm.y);

        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 {
            return None;
        }
        for (d, digit) in digits.iter().enumerate() {
            let base = 1 + d * 4;
            let joints = [
                digit.proximal().prev_joint(),
                digit.proximal().next_joint(),
                digit.distal().prev_joint(),
                digit.distal().next_joint(),
            ];
            for (j, joint) in joints.iter().enumerate() {
                pts[base + j] = Self::normalize(joint.x, joint.y);
            }
        }
        Some(Hand::new(pts))
    }
}

#[cfg(feature = "leap")]
impl TrackingSource for LeapTrackingSource {
    fn initialize(&mut self) -> Result<(), String> {
        use leaprs::*;
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| format!("LeapC connection failed: {e:?}"))?;
        connection
            .open()
            .map_err(|e| format!("LeapMotion device open failed: {e:?}"))?;
        self.connection = Some(connection);
        Ok(())
    }

    fn detect(&mut self) -> Option<FrameObservation> {
        use leaprs::*;
        let connection = self.connection.as_mut()?;
        let msg = connection.poll(10).ok()?;
        if let Event::Tracking(frame) = msg.event() {
            let hands = frame
                .hands()
                .filter_map(|h| Self::hand_landmarks(&h))
                .collect();
            Some(FrameObservation { hands })
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
