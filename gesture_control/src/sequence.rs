//! The timed destruction sequence.
//!
//! A four-stage cyclic machine driven by wall-clock deadlines rather than
//! scheduled callbacks: every tick re-reads the clock and compares it to
//! the current stage's deadline. That keeps the machine trivially
//! cancellable (drop it) and lets tests drive time explicitly.
//!
//! Side effects are not performed here. Transitions return a
//! [`SequenceEffect`] describing what the caller should do (fire a cue,
//! speak a line); the controller itself only owns the stage and deadline.

use std::time::{Duration, Instant};

use crate::config::ControlConfig;

/// Stage of the destruction sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceState {
    #[default]
    Idle,
    Locking,
    Exploding,
    Destroyed,
}

/// Side effect requested by a transition, to be handed to the audio/speech
/// collaborator by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceEffect {
    /// Entered `Locking`: lock-on cue plus the spoken warning.
    LockEngaged,
    /// Entered `Exploding`: detonation cue.
    Detonated,
    /// Entered `Destroyed`: completion line.
    TargetDestroyed,
    /// Returned to `Idle`: the trigger is armed again.
    Rearmed,
}

pub struct SequenceController {
    state: SequenceState,
    /// Deadline of the current stage; `None` while idle.
    deadline: Option<Instant>,
    locking: Duration,
    exploding: Duration,
    destroyed: Duration,
}

impl SequenceController {
    pub fn new(cfg: &ControlConfig) -> Self {
        SequenceController {
            state: SequenceState::Idle,
            deadline: None,
            locking: Duration::from_secs_f32(cfg.locking_secs),
            exploding: Duration::from_secs_f32(cfg.exploding_secs),
            destroyed: Duration::from_secs_f32(cfg.destroyed_secs),
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SequenceState::Idle
    }

    /// Attempt to start the sequence. Only `Idle` accepts the trigger;
    /// anywhere else the request is an idempotent no-op.
    pub fn trigger(&mut self, now: Instant) -> Option<SequenceEffect> {
        if self.state != SequenceState::Idle {
            return None;
        }
        log::info!("sequence armed: locking on");
        self.state = SequenceState::Locking;
        self.deadline = Some(now + self.locking);
        Some(SequenceEffect::LockEngaged)
    }

    /// Advance the stage clock. At most one transition fires per call;
    /// ticks before the deadline (or while idle) do nothing.
    pub fn tick(&mut self, now: Instant) -> Option<SequenceEffect> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        let (next, duration, effect) = match self.state {
            SequenceState::Idle => return None,
            SequenceState::Locking => (
                SequenceState::Exploding,
                Some(self.exploding),
                SequenceEffect::Detonated,
            ),
            SequenceState::Exploding => (
                SequenceState::Destroyed,
                Some(self.destroyed),
                SequenceEffect::TargetDestroyed,
            ),
            SequenceState::Destroyed => (SequenceState::Idle, None, SequenceEffect::Rearmed),
        };

        log::info!("sequence stage: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.deadline = duration.map(|d| deadline + d);
        Some(effect)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SequenceController {
        SequenceController::new(&ControlConfig::default())
    }

    #[test]
    fn trigger_from_idle_locks() {
        let mut seq = controller();
        let now = Instant::now();
        assert_eq!(seq.trigger(now), Some(SequenceEffect::LockEngaged));
        assert_eq!(seq.state(), SequenceState::Locking);
    }

    #[test]
    fn retrigger_is_a_noop() {
        let mut seq = controller();
        let now = Instant::now();
        seq.trigger(now);

        // Re-entry attempts from every non-idle stage change nothing.
        for dt in [0.0f32, 3.5, 5.5] {
            let t = now + Duration::from_secs_f32(dt);
            seq.tick(t);
            let state = seq.state();
            let deadline = seq.deadline;
            assert_eq!(seq.trigger(t), None);
            assert_eq!(seq.state(), state);
            assert_eq!(seq.deadline, deadline);
        }
    }

    #[test]
    fn full_cycle_walks_every_stage() {
        let mut seq = controller();
        let now = Instant::now();
        seq.trigger(now);

        // Before the locking deadline: nothing.
        assert_eq!(seq.tick(now + Duration::from_secs_f32(2.9)), None);
        assert_eq!(seq.state(), SequenceState::Locking);

        assert_eq!(
            seq.tick(now + Duration::from_secs_f32(3.0)),
            Some(SequenceEffect::Detonated)
        );
        assert_eq!(seq.state(), SequenceState::Exploding);

        assert_eq!(
            seq.tick(now + Duration::from_secs_f32(5.0)),
            Some(SequenceEffect::TargetDestroyed)
        );
        assert_eq!(seq.state(), SequenceState::Destroyed);

        assert_eq!(
            seq.tick(now + Duration::from_secs_f32(13.0)),
            Some(SequenceEffect::Rearmed)
        );
        assert!(seq.is_idle());
    }

    #[test]
    fn one_transition_per_tick_even_when_late() {
        // A very late tick still walks stages one at a time, never skipping.
        let mut seq = controller();
        let now = Instant::now();
        seq.trigger(now);

        let late = now + Duration::from_secs(60);
        assert_eq!(seq.tick(late), Some(SequenceEffect::Detonated));
        assert_eq!(seq.state(), SequenceState::Exploding);
        assert_eq!(seq.tick(late), Some(SequenceEffect::TargetDestroyed));
        assert_eq!(seq.tick(late), Some(SequenceEffect::Rearmed));
        assert!(seq.is_idle());
    }

    #[test]
    fn idle_tick_is_inert() {
        let mut seq = controller();
        assert_eq!(seq.tick(Instant::now()), None);
        assert!(seq.is_idle());
    }

    #[test]
    fn rearmed_sequence_can_trigger_again() {
        let mut seq = controller();
        let now = Instant::now();
        seq.trigger(now);
        let late = now + Duration::from_secs(60);
        while seq.tick(late).is_some() {}
        assert!(seq.is_idle());
        assert_eq!(seq.trigger(late), Some(SequenceEffect::LockEngaged));
    }
}
