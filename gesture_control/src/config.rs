//! The single calibration table for the whole gesture core.
//!
//! All values are in normalized image units, radians, world units, or
//! seconds. Mapping domains must be ascending; ranges may be inverted to
//! express a decreasing map.

/// Every tunable constant of the gesture-interpretation core.
#[derive(Clone, Debug)]
pub struct ControlConfig {
    // ── zone split ───────────────────────────────────────────────────────
    /// Wrist x below this is the left zone, otherwise the right zone.
    pub zone_split_x: f32,

    // ── grab hysteresis ──────────────────────────────────────────────────
    /// Pinch distance below this enters `Grabbed`.
    pub grab_enter: f32,
    /// Pinch distance above this leaves `Grabbed`. Must exceed `grab_enter`;
    /// the gap is the hysteresis band that stops flicker.
    pub grab_exit: f32,

    // ── continuous mappings: (domain lo, domain hi, range lo, range hi) ──
    /// Left wrist x → yaw (radians).
    pub yaw_map: (f32, f32, f32, f32),
    /// Wrist-y difference (left − right) → pitch (radians), dual-hand mode.
    pub tilt_map: (f32, f32, f32, f32),
    /// Apparent hand size → depth z. Inverted range: big hand pushes away.
    pub depth_map: (f32, f32, f32, f32),
    /// Pinch distance → scale.
    pub scale_map: (f32, f32, f32, f32),

    // ── smoothing rates (fraction of remaining distance per frame) ───────
    pub rotation_rate: f32,
    pub depth_rate: f32,
    pub scale_rate: f32,
    /// Grabbed-position tracking; tighter than the others for responsiveness.
    pub grab_pos_rate: f32,
    /// Return-to-anchor / idle decay rate.
    pub home_rate: f32,

    // ── idle & modifier motion ───────────────────────────────────────────
    /// Ambient yaw advance per frame while no hands are present.
    pub idle_spin: f32,
    /// Yaw advance per frame in spin mode (spread-fingers while grabbed).
    pub spin_rate: f32,
    /// Scale decay rate toward minimum in spin mode.
    pub shrink_rate: f32,

    // ── camera model (for planar unprojection) ───────────────────────────
    pub camera_z: f32,
    pub fov_y_deg: f32,
    pub aspect: f32,

    // ── anchor / neutral pose ────────────────────────────────────────────
    /// Resting world position the object returns to when not grabbed.
    pub anchor: (f32, f32, f32),
    pub neutral_scale: f32,

    // ── static pose thresholds ───────────────────────────────────────────
    /// Wrist must sit this far below the middle tip for an upright hand.
    pub upright_margin: f32,
    /// Middle tip must clear each other fingertip by this much.
    pub finger_margin: f32,
    /// Tip distance must exceed MCP distance × this for an extended finger.
    pub extended_factor: f32,

    // ── action sequence stage durations (seconds) ────────────────────────
    pub locking_secs: f32,
    pub exploding_secs: f32,
    pub destroyed_secs: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            zone_split_x: 0.5,

            grab_enter: 0.05,
            grab_exit: 0.08,

            yaw_map:   (0.0, 0.5, -1.5, 1.5),
            tilt_map:  (-0.3, 0.3, -1.0, 1.0),
            depth_map: (0.08, 0.3, 2.0, -6.0),
            scale_map: (0.02, 0.25, 0.8, 2.5),

            rotation_rate: 0.1,
            depth_rate:    0.05,
            scale_rate:    0.1,
            grab_pos_rate: 0.25,
            home_rate:     0.02,

            idle_spin:   0.002,
            spin_rate:   0.03,
            shrink_rate: 0.05,

            camera_z:  5.0,
            fov_y_deg: 45.0,
            aspect:    16.0 / 9.0,

            anchor:        (-2.0, 0.0, 0.0),
            neutral_scale: 1.5,

            upright_margin:  0.15,
            finger_margin:   0.03,
            extended_factor: 1.45,

            locking_secs:   3.0,
            exploding_secs: 2.0,
            destroyed_secs: 8.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
