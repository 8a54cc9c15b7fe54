//! Static pose classifiers.
//!
//! Pure boolean tests over a single hand's 21 landmarks, re-evaluated every
//! frame with no state. Remember that image-space y increases downward, so
//! "above" means a smaller y.

use hand_frame::landmark::{
    INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP, RING_TIP, WRIST,
};
use hand_frame::{distance, Hand};

use crate::config::ControlConfig;

/// The insult pose: hand upright with the middle finger alone extended.
///
/// Upright means the middle tip sits well above the wrist; alone means the
/// middle tip clears the index, ring and pinky tips by a margin each.
pub fn is_insult_pose(hand: &Hand, cfg: &ControlConfig) -> bool {
    let wrist_y = hand.point(WRIST).y;
    let middle_y = hand.point(MIDDLE_TIP).y;

    let upright = wrist_y - middle_y > cfg.upright_margin;
    if !upright {
        return false;
    }

    [INDEX_TIP, RING_TIP, PINKY_TIP]
        .iter()
        .all(|&tip| hand.point(tip).y - middle_y > cfg.finger_margin)
}

/// A finger counts as extended when its wrist→tip reach exceeds the
/// wrist→MCP distance scaled by the calibrated factor.
fn finger_extended(hand: &Hand, mcp: usize, tip: usize, cfg: &ControlConfig) -> bool {
    let wrist = hand.point(WRIST);
    let to_tip = distance(wrist, hand.point(tip));
    let to_mcp = distance(wrist, hand.point(mcp));
    to_tip > to_mcp * cfg.extended_factor
}

/// The spread-fingers modifier pose: thumb–index pinched closed while at
/// least two of middle/ring/pinky are extended. While grabbed, this selects
/// spin-and-shrink instead of translation.
pub fn is_spread_pinch(hand: &Hand, cfg: &ControlConfig) -> bool {
    if hand.pinch_distance() >= cfg.grab_enter {
        return false;
    }

    let extended = [
        (MIDDLE_MCP, MIDDLE_TIP),
        (RING_MCP, RING_TIP),
        (PINKY_MCP, PINKY_TIP),
    ]
    .iter()
    .filter(|&&(mcp, tip)| finger_extended(hand, mcp, tip, cfg))
    .count();

    extended >= 2
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
