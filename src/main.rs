use glowstrips::audio::AudioAnalyzer;
use glowstrips::config::Config;
use glowstrips::detector::{DetectorOutput, FrequencyDetector};
use glowstrips::gui;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting up...");

    // === Shared State ===
    let config = Arc::new(Mutex::new(Config::default()));
    let detector_output = Arc::new(Mutex::new(DetectorOutput::default()));
    let shutdown = Arc::new(AtomicBool::new(false));

    // === Analyzer Setup ===
    let analyzer = {
        let audio_config = config.lock().unwrap().audio.clone();
        Arc::new(Mutex::new(AudioAnalyzer::new(&audio_config)))
    };

    // === Frequency Detector Thread ===
    debug!("Spawning detector thread...");
    let detector_thread = {
        let detector = FrequencyDetector::new();
        let analyzer = analyzer.clone();
        let output = detector_output.clone();
        let config = config.clone();
        let shutdown = shutdown.clone();

        thread::spawn(move || {
            debug!("Detector thread started");
            let mut previous = DetectorOutput::default();
            while !shutdown.load(Ordering::Relaxed) {
                let interval = config.lock().unwrap().audio.detector_interval_ms;
                thread::sleep(Duration::from_millis(interval));

                if !shutdown.load(Ordering::Relaxed) {
                    let frame = analyzer.lock().unwrap().analyze();
                    let new_output = detector.process(&frame);
                    if new_output.band != previous.band {
                        debug!("Dominant band: {:?}", new_output.band);
                    }
                    previous = new_output;
                    *output.lock().unwrap() = new_output;
                }
            }
            debug!("Detector thread shutting down");
        })
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 760.0])
            .with_title("Glowstrips Controller"),
        ..Default::default()
    };

    debug!("Launching GUI...");
    let result = eframe::run_native(
        "Glowstrips audio visualizer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(gui::AppState::new(
                config,
                analyzer,
                detector_output,
            )))
        }),
    );

    debug!("Signaling threads to shut down...");
    shutdown.store(true, Ordering::Relaxed);

    debug!("Waiting for detector thread to finish...");
    if detector_thread.join().is_err() {
        error!("Detector thread panicked");
    } else {
        debug!("Detector thread joined");
    }

    info!("Clean shutdown complete");

    result
}
