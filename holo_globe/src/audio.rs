//! Synthesized audio cues and speech lines on their own thread.
//!
//! The core fires commands and never looks back: cues are short MIDI note
//! phrases sent to the first available output port, speech lines are logged
//! and voiced as a soft motif (real text-to-speech is presentation, outside
//! this crate's remit). With no MIDI port present everything degrades to a
//! silent null output and the rest of the app is unaffected.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// SoundCue / AudioCommand
// ════════════════════════════════════════════════════════════════════════════

/// The fixed set of sound effects the core can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    /// Startup power-up sweep.
    Boot,
    /// Short UI blip (grab engaged).
    Blip,
    /// Lock-on alarm pulse.
    Lock,
    /// Detonation.
    Explosion,
    /// Low ramp for fatal errors.
    Error,
}

/// Sent to the audio thread; fire-and-forget.
pub enum AudioCommand {
    Cue(SoundCue),
    Speak(String),
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// ToneOut — abstraction over midir / null (for testing and no-port hosts)
// ════════════════════════════════════════════════════════════════════════════

trait ToneOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl ToneOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

// ── null backend ──────────────────────────────────────────────────────────

struct NullOut;
impl ToneOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8) {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8) {}
    fn note_off(&mut self, _ch: u8, _n: u8) {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick first available
// ════════════════════════════════════════════════════════════════════════════

/// Try to open the first available MIDI output port, preferring a visible
/// softsynth. Falls back to the silent null output.
fn open_midi_output() -> Box<dyn ToneOut> {
    let midi_out = match midir::MidiOutput::new("holo_globe_audio") {
        Ok(m) => m,
        Err(e) => {
            log::warn!("MIDI init error: {e} — audio muted");
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("no MIDI output ports found — audio muted");
        return Box::new(NullOut);
    }

    let port_idx = ports
        .iter()
        .enumerate()
        .find(|(_, p)| {
            midi_out
                .port_name(p)
                .map(|n| {
                    let n = n.to_lowercase();
                    n.contains("fluid")
                        || n.contains("timidity")
                        || n.contains("microsoft")
                        || n.contains("synth")
                })
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    log::info!("opening MIDI port: {name}");

    match midi_out.connect(port, "holo-globe-cues") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            log::warn!("failed to connect: {e} — audio muted");
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AudioPlayer — handle to the cue thread
// ════════════════════════════════════════════════════════════════════════════

pub struct AudioPlayer {
    cmd_tx: Sender<AudioCommand>,
}

impl AudioPlayer {
    /// Spawn the cue thread on the first available MIDI port.
    pub fn spawn() -> Self {
        Self::spawn_with(open_midi_output)
    }

    /// Spawn the cue thread with audio muted. Used by tests and `--no-audio`.
    pub fn muted() -> Self {
        Self::spawn_with(|| Box::new(NullOut) as Box<dyn ToneOut>)
    }

    fn spawn_with(make_out: impl FnOnce() -> Box<dyn ToneOut> + Send + 'static) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        thread::spawn(move || audio_thread(make_out(), cmd_rx));
        AudioPlayer { cmd_tx }
    }

    pub fn cue(&self, cue: SoundCue) {
        let _ = self.cmd_tx.send(AudioCommand::Cue(cue));
    }

    pub fn speak(&self, line: &str) {
        let _ = self.cmd_tx.send(AudioCommand::Speak(line.to_string()));
    }

    pub fn quit(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// audio_thread — the playback loop
// ════════════════════════════════════════════════════════════════════════════

/// A phrase step: note, velocity, hold in milliseconds.
type Step = (u8, u8, u64);

fn cue_phrase(cue: SoundCue) -> (&'static [Step], u8) {
    // (steps, GM program)
    match cue {
        // Rising power-up sweep, square lead.
        SoundCue::Boot => (&[(45, 70, 90), (52, 80, 90), (57, 90, 90), (64, 100, 240)], 80),
        // Single high tick.
        SoundCue::Blip => (&[(96, 90, 45)], 80),
        // Two-tone alarm, repeated by the caller-visible phrase itself.
        SoundCue::Lock => (&[(76, 100, 120), (70, 100, 120), (76, 100, 120), (70, 100, 120)], 81),
        // Low cluster, long decay.
        SoundCue::Explosion => (&[(29, 127, 60), (24, 127, 700)], 38),
        // Falling ramp.
        SoundCue::Error => (&[(45, 110, 150), (41, 110, 150), (36, 110, 300)], 81),
    }
}

fn play_phrase(out: &mut dyn ToneOut, steps: &[Step], program: u8) {
    const CHANNEL: u8 = 0;
    out.program_change(CHANNEL, program);
    for &(note, velocity, hold_ms) in steps {
        out.note_on(CHANNEL, note, velocity);
        thread::sleep(Duration::from_millis(hold_ms));
        out.note_off(CHANNEL, note);
    }
}

fn audio_thread(mut out: Box<dyn ToneOut>, cmd_rx: Receiver<AudioCommand>) {
    for cmd in cmd_rx {
        match cmd {
            AudioCommand::Cue(cue) => {
                let (steps, program) = cue_phrase(cue);
                play_phrase(out.as_mut(), steps, program);
            }
            AudioCommand::Speak(line) => {
                log::info!("voice: {line}");
                // Soft two-note motif standing in for the voice line.
                play_phrase(out.as_mut(), &[(64, 50, 70), (67, 50, 110)], 89);
            }
            AudioCommand::Quit => return,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records note_on events for inspection.
    struct RecordingOut {
        notes: Arc<Mutex<Vec<u8>>>,
    }

    impl ToneOut for RecordingOut {
        fn program_change(&mut self, _ch: u8, _p: u8) {}
        fn note_on(&mut self, _ch: u8, note: u8, _v: u8) {
            self.notes.lock().unwrap().push(note);
        }
        fn note_off(&mut self, _ch: u8, _n: u8) {}
    }

    #[test]
    fn every_cue_has_a_phrase() {
        for cue in [
            SoundCue::Boot,
            SoundCue::Blip,
            SoundCue::Lock,
            SoundCue::Explosion,
            SoundCue::Error,
        ] {
            let (steps, _) = cue_phrase(cue);
            assert!(!steps.is_empty());
        }
    }

    #[test]
    fn phrase_plays_every_step() {
        let notes = Arc::new(Mutex::new(Vec::new()));
        let mut out = RecordingOut { notes: notes.clone() };
        let (steps, program) = cue_phrase(SoundCue::Blip);
        play_phrase(&mut out, steps, program);
        assert_eq!(notes.lock().unwrap().len(), steps.len());
    }

    #[test]
    fn muted_player_accepts_commands() {
        let player = AudioPlayer::muted();
        player.cue(SoundCue::Blip);
        player.speak("systems online");
        player.quit();
    }
}
