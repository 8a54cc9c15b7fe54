//! Continuous control mapping: landmark geometry → smoothed transform.
//!
//! The mapper owns the session's [`SmoothedTransform`] and advances it once
//! per frame. Raw geometry produces a per-field [`ControlTarget`] (absent
//! fields mean "no relevant hand this frame"); every present field is then
//! approached by exponential smoothing at its own rate, so the rendered
//! state never jumps.
//!
//! Field sources:
//!
//! * yaw — left wrist x, linear over the calibrated domain
//! * pitch — wrist-y difference when both zones are present (dual-hand tilt)
//! * depth — left-hand apparent size, inverted map (big hand pushes away)
//! * planar x/y — right thumb tip unprojected to the object's depth plane,
//!   grabbed only; otherwise the position homes toward the anchor
//! * scale — right pinch distance, released only
//!
//! With the spread-fingers modifier held while grabbed, the right hand is
//! repurposed again: yaw spins at a fixed rate and scale shrinks toward its
//! minimum. With no hands at all the object free-spins and decays home.

use hand_frame::{lerp, map_range, Point2D};

use crate::config::ControlConfig;
use crate::grab::GrabState;
use crate::pose::is_spread_pinch;
use crate::zones::ZonedHands;

/// Instantaneous per-frame targets computed from raw geometry. A `None`
/// field simply skips that update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlTarget {
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub depth: Option<f32>,
    pub scale: Option<f32>,
    pub planar: Option<(f32, f32)>,
    /// Spin-and-shrink modifier active this frame.
    pub spin: bool,
}

/// The actual rendered transform, advanced by smoothing every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedTransform {
    pub pitch: f32,
    pub yaw: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub scale: f32,
}

/// Owns the smoothed state and the calibration it is driven by.
pub struct ControlMapper {
    cfg: ControlConfig,
    state: SmoothedTransform,
}

impl ControlMapper {
    pub fn new(cfg: ControlConfig) -> Self {
        let state = SmoothedTransform {
            pitch: 0.0,
            yaw: 0.0,
            x: cfg.anchor.0,
            y: cfg.anchor.1,
            z: cfg.anchor.2,
            scale: cfg.neutral_scale,
        };
        ControlMapper { cfg, state }
    }

    pub fn transform(&self) -> SmoothedTransform {
        self.state
    }

    /// Advance one frame from this frame's zoned hands and resolved grab
    /// state. Returns the target that was applied (handy for inspection).
    pub fn step(&mut self, zones: &ZonedHands, grab: GrabState) -> ControlTarget {
        if zones.is_empty() {
            self.ambient_step();
            return ControlTarget::default();
        }
        let target = self.compute_target(zones, grab);
        self.apply(&target);
        target
    }

    /// Ambient motion for frames with no hand input (idle, or while the
    /// action sequence suppresses normal mapping): slow free spin plus
    /// decay of position, depth and scale toward the resting pose.
    pub fn ambient_step(&mut self) {
        let cfg = &self.cfg;
        self.state.yaw += cfg.idle_spin;
        self.state.pitch = lerp(self.state.pitch, 0.0, cfg.home_rate);
        self.state.x = lerp(self.state.x, cfg.anchor.0, cfg.home_rate);
        self.state.y = lerp(self.state.y, cfg.anchor.1, cfg.home_rate);
        self.state.z = lerp(self.state.z, cfg.anchor.2, cfg.home_rate);
        self.state.scale = lerp(self.state.scale, cfg.neutral_scale, cfg.home_rate);
    }

    /// Raw geometry → per-field targets. Pure with respect to the smoothed
    /// state except for the unprojection, which reads the current depth.
    pub fn compute_target(&self, zones: &ZonedHands, grab: GrabState) -> ControlTarget {
        let cfg = &self.cfg;
        let mut target = ControlTarget::default();

        if let Some(left) = &zones.left {
            let (d0, d1, r0, r1) = cfg.yaw_map;
            target.yaw = Some(map_range(left.wrist().x, d0, d1, r0, r1));

            let (d0, d1, r0, r1) = cfg.depth_map;
            target.depth = Some(map_range(left.apparent_size(), d0, d1, r0, r1));
        }

        if let (Some(left), Some(right)) = (&zones.left, &zones.right) {
            // Dual-hand tilt: relative wrist height drives pitch.
            let diff_y = left.wrist().y - right.wrist().y;
            let (d0, d1, r0, r1) = cfg.tilt_map;
            target.pitch = Some(map_range(diff_y, d0, d1, r0, r1));
        }

        if let Some(right) = &zones.right {
            if grab.is_grabbed() {
                if is_spread_pinch(right, cfg) {
                    target.spin = true;
                } else {
                    target.planar = Some(self.unproject(right.thumb_tip()));
                }
            } else {
                let (d0, d1, r0, r1) = cfg.scale_map;
                target.scale = Some(map_range(right.pinch_distance(), d0, d1, r0, r1));
            }
        }

        target
    }

    /// One smoothing step toward `target`. Absent fields leave their state
    /// untouched except planar position, which homes to the anchor whenever
    /// nothing is steering it.
    fn apply(&mut self, target: &ControlTarget) {
        let cfg = &self.cfg;

        if let Some(yaw) = target.yaw {
            self.state.yaw = lerp(self.state.yaw, yaw, cfg.rotation_rate);
        }
        if let Some(pitch) = target.pitch {
            self.state.pitch = lerp(self.state.pitch, pitch, cfg.rotation_rate);
        }
        if let Some(depth) = target.depth {
            self.state.z = lerp(self.state.z, depth, cfg.depth_rate);
        }

        match target.planar {
            Some((px, py)) => {
                self.state.x = lerp(self.state.x, px, cfg.grab_pos_rate);
                self.state.y = lerp(self.state.y, py, cfg.grab_pos_rate);
            }
            None => {
                self.state.x = lerp(self.state.x, cfg.anchor.0, cfg.home_rate);
                self.state.y = lerp(self.state.y, cfg.anchor.1, cfg.home_rate);
            }
        }

        if let Some(scale) = target.scale {
            self.state.scale = lerp(self.state.scale, scale, cfg.scale_rate);
        }

        if target.spin {
            self.state.yaw += cfg.spin_rate;
            let scale_min = cfg.scale_map.2;
            self.state.scale = lerp(self.state.scale, scale_min, cfg.shrink_rate);
        }
    }

    /// Standard perspective unprojection of a normalized image point into
    /// the world plane at the object's current depth. Image y grows
    /// downward, world y grows upward, hence the sign flip.
    fn unproject(&self, p: Point2D) -> (f32, f32) {
        let cfg = &self.cfg;
        let dist = cfg.camera_z - self.state.z;
        let half_fov = cfg.fov_y_deg.to_radians() * 0.5;
        let visible_h = 2.0 * half_fov.tan() * dist;
        let visible_w = visible_h * cfg.aspect;
        ((p.x - 0.5) * visible_w, -(p.y - 0.5) * visible_h)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_frame::landmark::*;
    use hand_frame::{Hand, LANDMARK_COUNT};

    // ── synthetic hands ──────────────────────────────────────────────────

    /// Left-zone hand: wrist at (x, y) with the given apparent size.
    fn left_hand(x: f32, y: f32, size: f32) -> Hand {
        let mut pts = [Point2D::new(x, y); LANDMARK_COUNT];
        pts[MIDDLE_MCP] = Point2D::new(x, y - size);
        // Tips away from the thumb so no pose fires by accident.
        pts[THUMB_TIP] = Point2D::new(x - 0.05, y);
        pts[INDEX_TIP] = Point2D::new(x + 0.05, y - size);
        Hand::new(pts)
    }

    /// Right-zone hand: wrist at (x, y) with the given pinch distance.
    fn right_hand(x: f32, y: f32, pinch: f32) -> Hand {
        let mut pts = [Point2D::new(x, y); LANDMARK_COUNT];
        pts[MIDDLE_MCP] = Point2D::new(x, y - 0.15);
        pts[THUMB_TIP] = Point2D::new(x, y - 0.1);
        pts[INDEX_TIP] = Point2D::new(x + pinch, y - 0.1);
        Hand::new(pts)
    }

    /// Right-zone hand holding the spread-fingers modifier: pinch closed,
    /// middle/ring/pinky reaching well past their knuckles.
    fn spread_hand(x: f32, y: f32) -> Hand {
        let mut pts = [Point2D::new(x, y); LANDMARK_COUNT];
        pts[THUMB_TIP] = Point2D::new(x, y - 0.1);
        pts[INDEX_TIP] = Point2D::new(x + 0.01, y - 0.1);
        for mcp in [MIDDLE_MCP, RING_MCP, PINKY_MCP] {
            pts[mcp] = Point2D::new(x, y - 0.1);
            pts[mcp + 3] = Point2D::new(x, y - 0.25);
        }
        Hand::new(pts)
    }

    fn zones(left: Option<Hand>, right: Option<Hand>) -> ZonedHands {
        ZonedHands { left, right }
    }

    fn mapper() -> ControlMapper {
        ControlMapper::new(ControlConfig::default())
    }

    // ── targets ──────────────────────────────────────────────────────────

    #[test]
    fn yaw_target_mid_domain_is_zero() {
        let m = mapper();
        let z = zones(Some(left_hand(0.25, 0.5, 0.15)), None);
        let t = m.compute_target(&z, GrabState::Released);
        assert!((t.yaw.unwrap()).abs() < 1e-6);
    }

    #[test]
    fn yaw_target_left_of_mid_is_negative() {
        let m = mapper();
        let z = zones(Some(left_hand(0.1, 0.5, 0.15)), None);
        assert!(m.compute_target(&z, GrabState::Released).yaw.unwrap() < 0.0);
    }

    #[test]
    fn depth_target_inverse_and_clamped() {
        let m = mapper();
        let near = m
            .compute_target(&zones(Some(left_hand(0.2, 0.5, 0.1)), None), GrabState::Released)
            .depth
            .unwrap();
        let far = m
            .compute_target(&zones(Some(left_hand(0.2, 0.5, 0.25)), None), GrabState::Released)
            .depth
            .unwrap();
        // Bigger hand → smaller z (pushed away).
        assert!(far < near);

        // Oversized input clamps at the range boundary, never beyond.
        let clamped = m
            .compute_target(&zones(Some(left_hand(0.2, 0.5, 0.9)), None), GrabState::Released)
            .depth
            .unwrap();
        assert_eq!(clamped, -6.0);
    }

    #[test]
    fn pitch_only_with_both_zones() {
        let m = mapper();
        let one = zones(Some(left_hand(0.2, 0.5, 0.15)), None);
        assert!(m.compute_target(&one, GrabState::Released).pitch.is_none());

        let both = zones(
            Some(left_hand(0.2, 0.7, 0.15)),
            Some(right_hand(0.8, 0.4, 0.2)),
        );
        // Left below right → positive diff → tilt toward positive pitch.
        let pitch = m.compute_target(&both, GrabState::Released).pitch.unwrap();
        assert!(pitch > 0.0);
    }

    #[test]
    fn released_right_hand_targets_scale_not_position() {
        let m = mapper();
        let z = zones(None, Some(right_hand(0.8, 0.5, 0.2)));
        let t = m.compute_target(&z, GrabState::Released);
        assert!(t.scale.is_some());
        assert!(t.planar.is_none());
    }

    #[test]
    fn grab_scenario_switches_to_unprojected_position() {
        // Left wrist mid-domain, right pinch well inside the grab threshold.
        let m = mapper();
        let z = zones(
            Some(left_hand(0.25, 0.5, 0.15)),
            Some(right_hand(0.8, 0.5, 0.03)),
        );

        let grab = GrabState::Released.step(Some(0.03), &ControlConfig::default());
        assert!(grab.is_grabbed());

        let t = m.compute_target(&z, grab);
        assert!(t.planar.is_some());
        assert!(t.scale.is_none());
        assert!((t.yaw.unwrap()).abs() < 1e-6);
    }

    #[test]
    fn unprojection_center_is_origin_and_y_flips() {
        let mut m = mapper();
        // Thumb tip dead-center maps to the world origin of the plane.
        let center = m.unproject(Point2D::new(0.5, 0.5));
        assert!(center.0.abs() < 1e-6 && center.1.abs() < 1e-6);

        // Above center in image space (smaller y) is +y in world space.
        let above = m.unproject(Point2D::new(0.5, 0.25));
        assert!(above.1 > 0.0);

        // Nearer object → smaller visible extent → smaller world offset.
        let far_offset = m.unproject(Point2D::new(0.8, 0.5)).0;
        m.state.z = 2.0;
        let near_offset = m.unproject(Point2D::new(0.8, 0.5)).0;
        assert!(near_offset < far_offset);
    }

    #[test]
    fn spin_modifier_spins_and_shrinks() {
        let mut m = mapper();
        let z = zones(None, Some(spread_hand(0.8, 0.5)));

        let t = m.compute_target(&z, GrabState::Grabbed);
        assert!(t.spin);
        assert!(t.planar.is_none());

        let yaw0 = m.transform().yaw;
        let scale0 = m.transform().scale;
        for _ in 0..30 {
            m.step(&z, GrabState::Grabbed);
        }
        assert!(m.transform().yaw > yaw0);
        assert!(m.transform().scale < scale0);
    }

    // ── smoothing ────────────────────────────────────────────────────────

    #[test]
    fn smoothing_converges_without_overshoot() {
        let mut m = mapper();
        let z = zones(Some(left_hand(0.45, 0.5, 0.15)), None);
        let target_yaw = m.compute_target(&z, GrabState::Released).yaw.unwrap();

        let mut prev = m.transform().yaw;
        for _ in 0..200 {
            m.step(&z, GrabState::Released);
            let yaw = m.transform().yaw;
            assert!(yaw >= prev && yaw <= target_yaw + 1e-6);
            prev = yaw;
        }
        assert!((m.transform().yaw - target_yaw).abs() < 1e-2);
    }

    #[test]
    fn state_never_jumps_to_target() {
        let mut m = mapper();
        let z = zones(Some(left_hand(0.45, 0.5, 0.15)), None);
        let target_yaw = m.compute_target(&z, GrabState::Released).yaw.unwrap();
        m.step(&z, GrabState::Released);
        assert!((m.transform().yaw - target_yaw).abs() > 0.1);
    }

    // ── idle ─────────────────────────────────────────────────────────────

    #[test]
    fn idle_spins_and_decays_home() {
        let mut m = mapper();
        // Push state away from rest first.
        let z = zones(
            Some(left_hand(0.4, 0.5, 0.28)),
            Some(right_hand(0.8, 0.5, 0.2)),
        );
        for _ in 0..40 {
            m.step(&z, GrabState::Released);
        }

        let empty = ZonedHands::default();
        let cfg = ControlConfig::default();
        let mut yaw = m.transform().yaw;
        let mut z_dist = (m.transform().z - cfg.anchor.2).abs();
        for _ in 0..10 {
            m.step(&empty, GrabState::Released);
            let t = m.transform();
            // Yaw advances by exactly the idle increment each tick.
            assert!((t.yaw - (yaw + cfg.idle_spin)).abs() < 1e-6);
            yaw = t.yaw;
            // Depth decays strictly toward the anchor.
            let d = (t.z - cfg.anchor.2).abs();
            assert!(d < z_dist);
            z_dist = d;
        }
    }

    #[test]
    fn idle_scale_returns_to_neutral() {
        let mut m = mapper();
        let z = zones(None, Some(right_hand(0.8, 0.5, 0.25)));
        for _ in 0..60 {
            m.step(&z, GrabState::Released);
        }
        assert!(m.transform().scale > 2.0);

        let empty = ZonedHands::default();
        for _ in 0..400 {
            m.step(&empty, GrabState::Released);
        }
        let cfg = ControlConfig::default();
        assert!((m.transform().scale - cfg.neutral_scale).abs() < 1e-2);
    }
}
