//! # holo_globe
//!
//! Hand-gesture controller for a holographic globe: per-frame hand
//! landmarks drive rotation, push/pull depth, grab-translation and
//! pinch-zoom of a software-rendered globe, with a timed destruction
//! sequence as the scripted finale.
//!
//! ## Gesture → Action mapping
//!
//! | Input | Zone | Action |
//! |---|---|---|
//! | Wrist x position | Left | Yaw over the calibrated domain |
//! | Apparent hand size | Left | Push/pull depth (big hand pushes away) |
//! | Both wrists' height difference | Both | Pitch (dual-hand tilt) |
//! | Pinch distance | Right | Zoom while released |
//! | Pinch closed (hysteresis) | Right | Grab: thumb translates the globe |
//! | Spread fingers while grabbed | Right | Spin + shrink modifier |
//! | Middle finger alone, hand upright | Either | Destruction sequence |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: mouse + keyboard synthesize hand
//!   landmarks that flow through the identical pipeline.
//! * `leap` — **Hardware mode**: polls a LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse | Moves the hand; its screen half decides the zone |
//! | Left button (hold) | Closes the pinch |
//! | `H` (hold) | Mirrored second hand for dual-hand tilt |
//! | `E` / `D` | Raise / lower the mirrored hand |
//! | `W` / `S` | Grow / shrink the hand (push / pull) |
//! | `F` | Insult pose — triggers the destruction sequence |
//! | `O` | Spread-fingers modifier pose |
//! | `Q` | Quit |

pub mod app;
pub mod audio;
pub mod scene;
pub mod tracking;
pub mod visualizer;
