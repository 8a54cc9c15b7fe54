//! Session state and the per-frame scheduler.
//!
//! `AppState` owns every piece of process-lifetime state — the smoothed
//! transform (inside the mapper), the grab flag, the sequence controller,
//! the derived status — and `frame()` advances all of it from one tracking
//! observation. `run()` is the cooperative loop: poll window input, detect,
//! step the frame, measure throughput, render, repeat until the window
//! closes.

use std::sync::mpsc;
use std::time::Instant;

use hand_frame::FrameObservation;

use gesture_control::pose::is_insult_pose;
use gesture_control::{
    split_zones, ControlConfig, ControlMapper, GrabState, SequenceController, SequenceEffect,
    SequenceState, SmoothedTransform, ZonedHands,
};

use crate::audio::{AudioPlayer, SoundCue};
use crate::tracking::TrackingSource;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig / AppError
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    pub control: ControlConfig,
    /// False routes all cues to the silent output.
    pub audio: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            control: ControlConfig::default(),
            audio: true,
        }
    }
}

/// Terminal failures. The gesture core itself cannot fail; these all come
/// from collaborators during startup and end the session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("vision system initialization failed: {0}")]
    TrackingInit(String),
    #[error("window creation failed: {0}")]
    Window(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    cfg: ControlConfig,

    // ── process-lifetime control state ───────────────────────────────────
    mapper: ControlMapper,
    grab: GrabState,
    sequence: SequenceController,

    // ── collaborators ────────────────────────────────────────────────────
    audio: AudioPlayer,

    // ── published to the HUD ─────────────────────────────────────────────
    pub status: String,
    pub detected: bool,
    /// Right-zone wrist in normalized window coordinates.
    pub reticle: Option<(f32, f32)>,
    pub fps: f32,
}

impl AppState {
    pub fn new(cfg: ControlConfig, audio: AudioPlayer) -> Self {
        let mapper = ControlMapper::new(cfg.clone());
        let sequence = SequenceController::new(&cfg);
        AppState {
            cfg,
            mapper,
            grab: GrabState::Released,
            sequence,
            audio,
            status: "STANDBY".to_string(),
            detected: false,
            reticle: None,
            fps: 0.0,
        }
    }

    pub fn transform(&self) -> SmoothedTransform {
        self.mapper.transform()
    }

    pub fn sequence_state(&self) -> SequenceState {
        self.sequence.state()
    }

    pub fn grab_state(&self) -> GrabState {
        self.grab
    }

    pub fn config(&self) -> &ControlConfig {
        &self.cfg
    }

    /// Advance one frame from the current tracking observation. `None`
    /// from the tracker is treated as an empty frame.
    pub fn frame(&mut self, obs: Option<FrameObservation>, now: Instant) {
        let obs = obs.unwrap_or_default();
        let zones = split_zones(&obs, &self.cfg);

        self.detected = !obs.is_empty();
        self.reticle = zones.right.as_ref().map(|h| {
            let w = h.wrist();
            (w.x, w.y)
        });

        // Stage deadlines run on the wall clock, so re-read them before
        // anything else this frame.
        if let Some(effect) = self.sequence.tick(now) {
            self.run_effect(effect);
        }

        // One-shot trigger: the insult pose on either zone's hand.
        let insult = zones
            .left
            .iter()
            .chain(zones.right.iter())
            .any(|h| is_insult_pose(h, &self.cfg));
        if insult && self.sequence.is_idle() {
            if let Some(effect) = self.sequence.trigger(now) {
                self.run_effect(effect);
            }
            // Short-circuit: no grab resolution or control mapping on the
            // trigger frame.
            self.mapper.ambient_step();
            self.status = sequence_label(self.sequence.state()).to_string();
            return;
        }

        if self.sequence.is_idle() {
            // Grab must be resolved before the mapper decides move-vs-scale.
            let pinch = zones.right.as_ref().map(|h| h.pinch_distance());
            let previous = self.grab;
            self.grab = self.grab.step(pinch, &self.cfg);
            if self.grab.is_grabbed() && !previous.is_grabbed() {
                self.audio.cue(SoundCue::Blip);
            }

            let target = self.mapper.step(&zones, self.grab);
            self.status = self.control_status(&zones, target.spin).to_string();
        } else {
            // Sequence active: normal mapping is suspended, ambient motion
            // continues, and the sequence owns the status line.
            self.mapper.ambient_step();
            self.status = sequence_label(self.sequence.state()).to_string();
        }
    }

    fn control_status(&self, zones: &ZonedHands, spin: bool) -> &'static str {
        if zones.is_empty() {
            "SCANNING..."
        } else if self.grab.is_grabbed() && spin {
            "SPIN MODE"
        } else if self.grab.is_grabbed() {
            "GRAB: TRANSLATE"
        } else if zones.both_present() {
            "DUAL LINK MODE"
        } else if zones.left.is_some() {
            "ATTITUDE CONTROL (PUSH/PULL)"
        } else {
            "PRECISION ZOOM (PINCH)"
        }
    }

    fn run_effect(&mut self, effect: SequenceEffect) {
        match effect {
            SequenceEffect::LockEngaged => {
                self.audio.cue(SoundCue::Lock);
                self.audio
                    .speak("Threat gesture confirmed. Destruction sequence engaged.");
            }
            SequenceEffect::Detonated => self.audio.cue(SoundCue::Explosion),
            SequenceEffect::TargetDestroyed => self.audio.speak("Target eliminated."),
            SequenceEffect::Rearmed => self.audio.speak("Hologram restored. Systems nominal."),
        }
    }
}

fn sequence_label(state: SequenceState) -> &'static str {
    match state {
        SequenceState::Idle => "STANDBY",
        SequenceState::Locking => "TARGET LOCKED",
        SequenceState::Exploding => "DETONATION",
        SequenceState::Destroyed => "TARGET DESTROYED",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tracker selection (sim by default, hardware with --features leap)
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn make_tracker(sim_rx: mpsc::Receiver<crate::tracking::SimControls>) -> impl TrackingSource {
    crate::tracking::SimTrackingSource::new(sim_rx)
}

#[cfg(feature = "leap")]
fn make_tracker(sim_rx: mpsc::Receiver<crate::tracking::SimControls>) -> impl TrackingSource {
    // Hardware mode ignores the window's simulated input.
    drop(sim_rx);
    crate::tracking::LeapTrackingSource::new()
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application. Entry point called from `main.rs`.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Sim input channel (window → tracking source) ─────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx).map_err(AppError::Window)?;

    // ── Tracking source ──────────────────────────────────────────────────
    let mut tracker = make_tracker(sim_rx);
    tracker.initialize().map_err(AppError::TrackingInit)?;

    // ── Audio collaborator + startup sequence ────────────────────────────
    let audio = if cfg.audio {
        AudioPlayer::spawn()
    } else {
        AudioPlayer::muted()
    };
    audio.cue(SoundCue::Boot);
    audio.speak("Holographic interface online. Projection ready.");

    // ── App state ────────────────────────────────────────────────────────
    let mut app = AppState::new(cfg.control, audio);

    // ── Main loop ────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        let start = Instant::now();
        let obs = tracker.detect();
        app.frame(obs, start);

        // Instantaneous rate estimate for the HUD.
        let elapsed_ms = start.elapsed().as_secs_f32() * 1000.0;
        app.fps = 1000.0 / elapsed_ms.max(0.01);

        vis.render(
            &app.transform(),
            app.config(),
            app.sequence_state(),
            &app.status,
            app.detected,
            app.reticle,
            app.fps,
        );
    }

    // Teardown: stop the cue thread; the sequence's deadlines need no
    // cancellation since nothing fires without a tick.
    app.audio.quit();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{synth_hand, SimPose};
    use hand_frame::Point2D;
    use std::time::Duration;

    fn make_app() -> AppState {
        AppState::new(ControlConfig::default(), AudioPlayer::muted())
    }

    fn obs_of(hands: Vec<hand_frame::Hand>) -> Option<FrameObservation> {
        Some(FrameObservation { hands })
    }

    fn left_open() -> hand_frame::Hand {
        synth_hand(Point2D::new(0.25, 0.6), 0.15, SimPose::Relaxed, false)
    }

    fn right_pinched() -> hand_frame::Hand {
        synth_hand(Point2D::new(0.8, 0.5), 0.15, SimPose::Relaxed, true)
    }

    fn right_insult() -> hand_frame::Hand {
        synth_hand(Point2D::new(0.8, 0.7), 0.18, SimPose::Insult, false)
    }

    #[test]
    fn empty_frames_scan_and_spin() {
        let mut app = make_app();
        let now = Instant::now();
        let idle_spin = app.config().idle_spin;

        let mut yaw = app.transform().yaw;
        for i in 0..10 {
            app.frame(None, now + Duration::from_millis(i * 16));
            let t = app.transform();
            assert!((t.yaw - (yaw + idle_spin)).abs() < 1e-6);
            yaw = t.yaw;
        }
        assert_eq!(app.status, "SCANNING...");
        assert!(!app.detected);
        assert!(app.reticle.is_none());
    }

    #[test]
    fn left_hand_reports_attitude_control() {
        let mut app = make_app();
        app.frame(obs_of(vec![left_open()]), Instant::now());
        assert_eq!(app.status, "ATTITUDE CONTROL (PUSH/PULL)");
        assert!(app.detected);
    }

    #[test]
    fn pinched_right_hand_grabs_and_publishes_reticle() {
        let mut app = make_app();
        let now = Instant::now();
        app.frame(obs_of(vec![right_pinched()]), now);
        assert!(app.grab_state().is_grabbed());
        assert_eq!(app.status, "GRAB: TRANSLATE");
        let (rx, _) = app.reticle.unwrap();
        assert!((rx - 0.8).abs() < 1e-6);
    }

    #[test]
    fn insult_pose_starts_sequence_and_suppresses_mapping() {
        let mut app = make_app();
        let now = Instant::now();
        app.frame(obs_of(vec![right_insult()]), now);
        assert_eq!(app.sequence_state(), SequenceState::Locking);
        assert_eq!(app.status, "TARGET LOCKED");

        // While locked, a steering hand only gets ambient motion: yaw moves
        // by exactly the idle increment, not toward the hand's target.
        let idle_spin = app.config().idle_spin;
        let yaw = app.transform().yaw;
        app.frame(
            obs_of(vec![left_open()]),
            now + Duration::from_millis(16),
        );
        assert!((app.transform().yaw - (yaw + idle_spin)).abs() < 1e-6);
        assert_eq!(app.status, "TARGET LOCKED");
    }

    #[test]
    fn retrigger_during_sequence_changes_nothing() {
        let mut app = make_app();
        let now = Instant::now();
        app.frame(obs_of(vec![right_insult()]), now);
        let state = app.sequence_state();
        app.frame(
            obs_of(vec![right_insult()]),
            now + Duration::from_millis(500),
        );
        assert_eq!(app.sequence_state(), state);
    }

    #[test]
    fn sequence_walks_to_completion_on_the_clock() {
        let mut app = make_app();
        let now = Instant::now();
        app.frame(obs_of(vec![right_insult()]), now);
        assert_eq!(app.sequence_state(), SequenceState::Locking);

        app.frame(None, now + Duration::from_secs_f32(3.1));
        assert_eq!(app.sequence_state(), SequenceState::Exploding);
        assert_eq!(app.status, "DETONATION");

        app.frame(None, now + Duration::from_secs_f32(5.1));
        assert_eq!(app.sequence_state(), SequenceState::Destroyed);

        app.frame(None, now + Duration::from_secs_f32(13.2));
        assert_eq!(app.sequence_state(), SequenceState::Idle);
        assert_eq!(app.status, "SCANNING...");
    }

    #[test]
    fn grab_releases_when_hand_disappears() {
        let mut app = make_app();
        let now = Instant::now();
        app.frame(obs_of(vec![right_pinched()]), now);
        assert!(app.grab_state().is_grabbed());
        app.frame(None, now + Duration::from_millis(16));
        assert!(!app.grab_state().is_grabbed());
    }

    #[test]
    fn dual_hands_report_dual_link() {
        let mut app = make_app();
        let right = synth_hand(Point2D::new(0.8, 0.4), 0.15, SimPose::Relaxed, false);
        app.frame(obs_of(vec![left_open(), right]), Instant::now());
        assert_eq!(app.status, "DUAL LINK MODE");
    }
}
