//! # hand_frame
//!
//! Normalized hand-landmark frames as delivered by a tracking service, plus
//! the small numeric toolkit the gesture layer is built on.
//!
//! A tracking frame carries zero or more [`Hand`]s; each hand is exactly 21
//! [`Point2D`] landmarks in normalized image space (`[0,1]²`, origin
//! top-left, y increasing downward). Landmarks follow the fixed anatomical
//! index convention — see the constants in [`landmark`].
//!
//! Nothing here carries identity across frames: every frame's hands are
//! independent observations, re-interpreted from scratch by the layers
//! above.

pub mod geometry;
pub mod landmark;

pub use geometry::{distance, lerp, map_range};
pub use landmark::{FrameObservation, Hand, Point2D, LANDMARK_COUNT};
