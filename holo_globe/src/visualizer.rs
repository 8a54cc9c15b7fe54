//! Software-rendered hologram view using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HOLO GLOBE            REGION: ASIA / OCEANIA        FPS: 58  │
//! │                                                              │
//! │                     ·· point-sphere globe ··                 │
//! │                  (reticle follows the right hand)            │
//! │                                                              │
//! │ status bar                                                   │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the simulation input device: every poll the mouse
//! and held keys are folded into a [`SimControls`] snapshot and sent to the
//! tracking source.

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use gesture_control::{SequenceState, SmoothedTransform};

use crate::scene::{region_for_yaw, Globe};
use crate::tracking::{SimControls, SimPose};

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;
const STATUS_Y: usize = WIN_H - 40;
const BG_COLOR: u32 = 0xFF060B14;
const PANEL_BG: u32 = 0xFF0B1A30;
const HUD_TEXT: u32 = 0xFF9FE8FF;
const DIM_TEXT: u32 = 0xFF4A7A94;
const RETICLE_COLOR: u32 = 0xFF00FFFF;
const LOCK_COLOR: u32 = 0xFFFF4455;

/// How often (in frames) the region label is re-derived from yaw.
const REGION_REFRESH_FRAMES: usize = 30;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    globe: Globe,
    sim_tx: Sender<SimControls>,

    // Persistent simulation inputs adjusted by held keys.
    hand_span: f32,
    second_hand_y: f32,

    // HUD state.
    frame: usize,
    region: &'static str,
    last_sequence: SequenceState,
    sequence_frames: usize,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimControls>) -> Result<Self, String> {
        let mut window = Window::new(
            "Holo Globe — Gesture Hologram Interface",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            globe: Globe::new(),
            sim_tx,
            hand_span: 0.15,
            second_hand_y: 0.5,
            frame: 0,
            region: "CALIBRATING",
            last_sequence: SequenceState::Idle,
            sequence_frames: 0,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Fold mouse + keyboard into a [`SimControls`] snapshot and send it.
    /// Returns false when the user quits.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_down(Key::Q) {
            return false;
        }

        let held = |k: Key| self.window.is_key_down(k);

        // Hand size: W grows (hand toward camera), S shrinks.
        if held(Key::W) {
            self.hand_span = (self.hand_span + 0.003).min(0.38);
        }
        if held(Key::S) {
            self.hand_span = (self.hand_span - 0.003).max(0.06);
        }
        // Mirrored-hand height for dual-hand tilt.
        if held(Key::E) {
            self.second_hand_y = (self.second_hand_y - 0.01).max(0.05);
        }
        if held(Key::D) {
            self.second_hand_y = (self.second_hand_y + 0.01).min(0.95);
        }

        let pose = if held(Key::F) {
            SimPose::Insult
        } else if held(Key::O) {
            SimPose::Spread
        } else {
            SimPose::Relaxed
        };

        let mouse = self.window.get_mouse_pos(MouseMode::Discard);
        let controls = SimControls {
            cursor: mouse
                .map(|(mx, my)| (mx / WIN_W as f32, my / WIN_H as f32))
                .unwrap_or((0.5, 0.5)),
            hand_present: mouse.is_some(),
            pinch_closed: self.window.get_mouse_down(MouseButton::Left),
            hand_span: self.hand_span,
            second_hand: held(Key::H),
            second_hand_y: self.second_hand_y,
            pose,
        };
        let _ = self.sim_tx.send(controls);

        true
    }

    /// Render one frame from the published state.
    pub fn render(
        &mut self,
        transform: &SmoothedTransform,
        cfg: &gesture_control::ControlConfig,
        sequence: SequenceState,
        status: &str,
        detected: bool,
        reticle: Option<(f32, f32)>,
        fps: f32,
    ) {
        self.frame += 1;
        if sequence != self.last_sequence {
            self.last_sequence = sequence;
            self.sequence_frames = 0;
        } else {
            self.sequence_frames += 1;
        }

        self.buf.fill(BG_COLOR);

        match sequence {
            SequenceState::Exploding => self.draw_burst(transform, cfg),
            SequenceState::Destroyed => self.draw_debris(),
            _ => self.draw_globe(transform, cfg, sequence == SequenceState::Locking),
        }

        // ── Reticle on the right-zone hand ────────────────────────────────
        if let Some((rx, ry)) = reticle {
            let cx = (rx * WIN_W as f32) as i32;
            let cy = (ry * WIN_H as f32) as i32;
            self.draw_circle(cx, cy, 14, RETICLE_COLOR);
            self.draw_circle(cx, cy, 2, RETICLE_COLOR);
        }

        // ── Header ────────────────────────────────────────────────────────
        self.draw_label("HOLO GLOBE", 12, 10, HUD_TEXT);
        if self.frame % REGION_REFRESH_FRAMES == 0 {
            self.region = region_for_yaw(transform.yaw);
        }
        let region_line = format!("REGION: {}", self.region);
        self.draw_label(&region_line, WIN_W / 2 - region_line.len() * 2, 10, HUD_TEXT);
        self.draw_label(&format!("FPS: {:.0}", fps), WIN_W - 70, 10, DIM_TEXT);

        let signal = if detected { "TRACKING" } else { "NO SIGNAL" };
        let signal_color = if detected { HUD_TEXT } else { DIM_TEXT };
        self.draw_label(signal, 12, 24, signal_color);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, 22, PANEL_BG);
        self.draw_label(status, 10, STATUS_Y + 8, HUD_TEXT);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "MOUSE=HAND  LMB=PINCH  H=2ND HAND  E/D=TILT  W/S=PUSH/PULL  F=INSULT  O=SPREAD  Q=QUIT",
            10,
            WIN_H - 14,
            DIM_TEXT,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Globe ─────────────────────────────────────────────────────────────

    fn draw_globe(
        &mut self,
        transform: &SmoothedTransform,
        cfg: &gesture_control::ControlConfig,
        locked: bool,
    ) {
        let points = self.globe.project(transform, cfg, WIN_W, WIN_H);
        for p in points {
            let color = if locked {
                shade_color(p.shade, 0xFF, 0x33, 0x44)
            } else {
                shade_color(p.shade, 0x00, 0xE0, 0xFF)
            };
            self.plot(p.x, p.y, color);
            self.plot(p.x + 1, p.y, color);
        }

        if locked {
            // Pulsing lock brackets around the screen center.
            if (self.sequence_frames / 8) % 2 == 0 {
                self.draw_brackets(WIN_W as i32 / 2, WIN_H as i32 / 2, 140, LOCK_COLOR);
            }
            self.draw_label("LOCK", WIN_W / 2 - 8, 40, LOCK_COLOR);
        }
    }

    fn draw_burst(&mut self, transform: &SmoothedTransform, cfg: &gesture_control::ControlConfig) {
        // Expanding radial shards from the object's projected center.
        let center = crate::scene::project_point([0.0, 0.0, 0.0], transform, cfg, WIN_W, WIN_H)
            .map(|p| (p.x, p.y))
            .unwrap_or((WIN_W as i32 / 2, WIN_H as i32 / 2));

        let radius = 8 + self.sequence_frames as i32 * 3;
        for i in 0..48 {
            let a = i as f32 / 48.0 * std::f32::consts::TAU;
            // Stagger shard lengths so the burst looks ragged.
            let r = radius + ((i * 7) % 13) as i32 * 4;
            let x = center.0 + (a.cos() * r as f32) as i32;
            let y = center.1 + (a.sin() * r as f32) as i32;
            let shade = (1.0 - self.sequence_frames as f32 / 140.0).clamp(0.1, 1.0);
            self.plot(x, y, shade_color(shade, 0xFF, 0xA0, 0x30));
        }
    }

    fn draw_debris(&mut self) {
        // Sparse drifting embers while the target is gone.
        for i in 0..60usize {
            let x = ((i * 97 + self.frame * 2) % WIN_W) as i32;
            let y = ((i * 211 + i * i) % (STATUS_Y - 60) + 50) as i32;
            self.plot(x, y, shade_color(0.3, 0xFF, 0x70, 0x30));
        }
        self.draw_label("TARGET DESTROYED", WIN_W / 2 - 34, WIN_H / 2, LOCK_COLOR);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn plot(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && (x as usize) < WIN_W && y >= 0 && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        let steps = (r * 8).max(16);
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            let x = cx + (a.cos() * r as f32) as i32;
            let y = cy + (a.sin() * r as f32) as i32;
            self.plot(x, y, color);
        }
    }

    fn draw_brackets(&mut self, cx: i32, cy: i32, half: i32, color: u32) {
        let arm = half / 4;
        for d in 0..arm {
            for &(sx, sy) in &[(-1, -1), (1, -1), (-1, 1), (1, 1)] {
                let corner_x = cx + sx * half;
                let corner_y = cy + sy * half;
                self.plot(corner_x - sx * d, corner_y, color);
                self.plot(corner_x, corner_y - sy * d, color);
            }
        }
    }

    /// Minimal 3×5 bitmap font used for all HUD text.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.plot((cx + col) as i32, (y + row) as i32, color);
                    }
                }
            }
            cx += 4;
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font — each character is 5 rows of 3 bits
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b110, 0b010, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b110],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'R' => [0b110, 0b101, 0b110, 0b110, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b010, 0b010, 0b010, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
