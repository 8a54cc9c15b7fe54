//! holo_globe — interactive entry point.

use holo_globe::app::{run, AppConfig};

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║      Holo Globe — Hand-Gesture Hologram Interface            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hand tracking");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse/keyboard simulation  (use --features leap for hardware)");
    println!();

    let mut cfg = AppConfig::default();
    if std::env::args().any(|a| a == "--no-audio") {
        cfg.audio = false;
        println!("  Audio: muted");
    }

    println!("  Opening hologram window…");
    println!();

    if let Err(e) = run(cfg) {
        log::error!("fatal: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
