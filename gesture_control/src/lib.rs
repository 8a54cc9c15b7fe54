//! # gesture_control
//!
//! The gesture-interpretation core: turns raw, noisy hand-landmark frames
//! into smoothed continuous transform state, debounced discrete mode
//! transitions, one-shot pose detections, and a timed scripted sequence.
//!
//! ## Per-frame pipeline
//!
//! | Stage | Module | Output |
//! |---|---|---|
//! | Zone split | [`zones`] | at most one left-zone and one right-zone hand |
//! | Pose tests | [`pose`] | insult pose, spread-fingers modifier |
//! | Grab machine | [`grab`] | `Released` / `Grabbed` with hysteresis |
//! | Control mapping | [`mapper`] | smoothed pitch/yaw/x/y/z/scale |
//! | Action sequence | [`sequence`] | `Idle → Locking → Exploding → Destroyed` |
//!
//! Every tunable — thresholds, mapping domains, smoothing rates, stage
//! durations, camera constants — lives in one [`config::ControlConfig`]
//! table so behavior can be recalibrated in a single place.
//!
//! All stages are total over possibly-absent input: a missing hand skips
//! the corresponding update, range maps clamp before dividing, and nothing
//! in this crate returns an error or performs I/O.

pub mod config;
pub mod grab;
pub mod mapper;
pub mod pose;
pub mod sequence;
pub mod zones;

pub use config::ControlConfig;
pub use grab::GrabState;
pub use mapper::{ControlMapper, ControlTarget, SmoothedTransform};
pub use sequence::{SequenceController, SequenceEffect, SequenceState};
pub use zones::{split_zones, ZonedHands};
