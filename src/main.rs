//! Palm Fireworks native entry point
//!
//! Runs the simulation headless in real time with a scripted hand-tracking
//! producer on its own thread, logging cues and score changes.
//!
//! Usage: `palm-fireworks [tuning.json] [settings.json]`

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use palm_fireworks::audio::LogBackend;
use palm_fireworks::sim::{GamePhase, Gesture, HandSnapshot};
use palm_fireworks::{FrameDriver, Settings, SnapshotSlot, Tuning};

/// Scripted hand poses: (gesture, speed, seconds held)
const SCRIPT: &[(Gesture, f32, f32)] = &[
    (Gesture::None, 0.0, 1.0),
    (Gesture::Victory, 0.0, 1.0),
    (Gesture::ClosedFist, 4.0, 2.0),
    (Gesture::OpenPalm, 0.5, 1.0),
    (Gesture::ClosedFist, 1.0, 1.5),
    (Gesture::OpenPalm, 0.5, 1.0),
    (Gesture::Victory, 0.0, 1.0),
    (Gesture::OpenPalm, 0.0, 1.0),
];

/// Hand tracker cadence
const TRACKER_PERIOD: Duration = Duration::from_millis(33);

fn spawn_scripted_tracker(slot: SnapshotSlot, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut step = 0usize;
        while running.load(Ordering::Relaxed) {
            let (gesture, speed, seconds) = SCRIPT[step % SCRIPT.len()];
            let until = Instant::now() + Duration::from_secs_f32(seconds);
            while Instant::now() < until && running.load(Ordering::Relaxed) {
                let snapshot = match gesture {
                    Gesture::None => None,
                    _ => Some(HandSnapshot::new(gesture, speed, Vec3::ZERO)),
                };
                slot.publish(snapshot);
                thread::sleep(TRACKER_PERIOD);
            }
            step += 1;
        }
    })
}

fn main() {
    env_logger::init();
    log::info!("Palm Fireworks (native) starting...");

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        // Short demo round unless a tuning file says otherwise
        None => Tuning {
            round_seconds: 10,
            ..Tuning::default()
        },
    };
    let settings = args.next().map(|p| Settings::load(&p)).unwrap_or_default();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut driver = FrameDriver::new(tuning, &settings, LogBackend, seed);

    let running = Arc::new(AtomicBool::new(true));
    let tracker = spawn_scripted_tracker(driver.snapshot_slot(), running.clone());

    let mut last = Instant::now();
    let mut rounds_finished = 0;
    while rounds_finished < 1 {
        thread::sleep(Duration::from_millis(16));
        let now = Instant::now();
        let report = driver.frame((now - last).as_secs_f32());
        last = now;

        if let Some(stats) = report.stats {
            log::info!(
                "exploded {} consumed {} coins {} (charges {})",
                stats.exploded,
                stats.consumed,
                stats.coins,
                driver.state().charges()
            );
        }
        for phase in report.phases {
            log::info!("phase -> {phase:?}");
            if phase == GamePhase::Result {
                rounds_finished += 1;
            }
        }
    }

    running.store(false, Ordering::Relaxed);
    if tracker.join().is_err() {
        log::warn!("hand tracker thread panicked");
    }

    let stats = driver.state().stats();
    println!(
        "Round over after {} ticks: {} exploded, {} coins, {} particles live",
        driver.state().time_ticks,
        stats.exploded,
        stats.coins,
        driver.view().particles.active_count()
    );
}
