use glowstrips::audio::{AudioAnalyzer, EnergyReading, SpectrumFrame};
use glowstrips::config::{AudioConfig, VisualConfig};
use glowstrips::detector::{FrequencyBand, FrequencyDetector};
use glowstrips::visual::StripScene;
use glowstrips::visual::canvas::CanvasSize;
use glowstrips::visual::strip::center_influence;
use std::f32::consts::PI;

fn wide_scene(seed: u64) -> StripScene {
    StripScene::with_seed(VisualConfig::default(), CanvasSize::new(1024.0, 768.0), seed)
}

// ── Strip scene ─────────────────────────────────────────────────────────────

#[test]
fn silence_settles_every_strip_at_base_speed() {
    let mut scene = wide_scene(11);
    let base = scene.config().base_speed;
    assert_eq!(scene.strips().len(), 11);

    for _ in 0..100 {
        scene.advance(&EnergyReading::default());
    }

    for strip in scene.strips() {
        assert!((strip.speed - base).abs() < 1e-6);
        assert!((strip.offset - 100.0 * f64::from(base)).abs() < 1e-3, "offset {}", strip.offset);
    }
}

#[test]
fn loud_input_drives_center_strip_hardest() {
    let mut scene = wide_scene(12);
    let loud = EnergyReading {
        low: 1.0,
        mid: 1.0,
        high: 1.0,
        amplitude: 1.0,
    };
    scene.advance(&loud);

    let strips = scene.strips();
    let center = &strips[5];
    assert_eq!(center.center_influence, 1.0);
    assert!((center.speed - 16.08).abs() < 1e-4);

    // Edge strips carry no center influence and stay at base speed.
    assert!((strips[0].speed - 0.1).abs() < 1e-6);
    assert!((strips[10].speed - 0.1).abs() < 1e-6);
}

#[test]
fn moderate_input_arcs_across_the_strips() {
    let mut scene = wide_scene(18);
    let moderate = EnergyReading {
        low: 1.0,
        mid: 1.0,
        high: 1.0,
        amplitude: 0.05,
    };
    for _ in 0..30 {
        scene.advance(&moderate);
    }

    let speeds: Vec<f32> = scene.strips().iter().map(|s| s.speed).collect();
    for i in 0..5 {
        assert!(speeds[i] < speeds[i + 1], "left side at {i}");
        assert!(speeds[10 - i] < speeds[9 - i], "right side at {i}");
    }
}

#[test]
fn speed_is_bounded_under_any_input() {
    let mut scene = wide_scene(13);
    let config = scene.config().clone();
    let mut rng = fastrand::Rng::with_seed(99);

    for _ in 0..300 {
        let reading = EnergyReading {
            low: rng.f32(),
            mid: rng.f32(),
            high: rng.f32(),
            amplitude: rng.f32() * 50.0,
        };
        let before: Vec<f64> = scene.strips().iter().map(|s| s.offset).collect();
        scene.advance(&reading);

        for (strip, previous) in scene.strips().iter().zip(before) {
            assert!(strip.speed >= config.base_speed && strip.speed <= config.max_speed);
            assert!(strip.offset > previous);
        }
    }
}

#[test]
fn center_influence_is_fixed_per_strip() {
    let mut scene = wide_scene(14);
    let initial: Vec<f32> = scene.strips().iter().map(|s| s.center_influence).collect();
    for _ in 0..10 {
        scene.advance(&EnergyReading {
            amplitude: 0.5,
            low: 0.5,
            ..EnergyReading::default()
        });
    }

    for (i, strip) in scene.strips().iter().enumerate() {
        assert_eq!(strip.center_influence, initial[i]);
        assert_eq!(strip.center_influence, center_influence(i, 11));
    }
}

#[test]
fn shrinking_the_canvas_replaces_everything() {
    let mut scene = wide_scene(15);
    for _ in 0..20 {
        scene.advance(&EnergyReading::default());
    }
    assert_eq!(scene.strips().len(), 11);

    scene.rebuild(CanvasSize::new(500.0, 768.0));

    let strips = scene.strips();
    assert_eq!(strips.len(), 7);
    assert!(strips.iter().all(|s| s.total == 7 && s.offset == 0.0));
    assert!(strips.iter().all(|s| (s.width - 500.0 / 7.0).abs() < 1e-4));
    assert!(strips.last().is_some_and(|s| s.x + s.width <= 500.0 + 1e-3));
    assert_eq!(scene.glow().width(), 500);
    assert!(scene.glow().columns().iter().all(|&a| a == 0.0));
    assert_eq!(scene.pattern().height(), 768);
    assert_eq!(scene.generation(), 1);
}

#[test]
fn taller_canvas_regenerates_the_pattern() {
    let mut scene = wide_scene(16);
    let before = scene.pattern().clone();
    scene.rebuild(CanvasSize::new(1024.0, 900.0));
    assert_eq!(scene.pattern().height(), 900);
    assert_ne!(*scene.pattern(), before);
}

#[test]
fn fixed_canvas_runs_eleven_strips() {
    let config = VisualConfig::fixed_canvas();
    let glowstrips::config::CanvasMode::Fixed { width, height } = config.canvas_mode else {
        panic!("expected a fixed canvas");
    };
    let scene = StripScene::with_seed(config, CanvasSize::new(width, height), 17);
    assert_eq!(scene.strips().len(), 11);
    assert_eq!(scene.canvas().cycle_height(), 500.0);
}

// ── Frequency detector ──────────────────────────────────────────────────────

#[test]
fn detector_reports_dominant_bin_frequency() {
    let detector = FrequencyDetector::new();
    for k in [3usize, 12, 40, 127] {
        let mut bins = vec![0u8; 128];
        bins[k] = 180;
        let output = detector.process(&SpectrumFrame {
            bins,
            sample_rate: 44100.0,
            fft_size: 256,
        });

        let hz = k as f32 * 44100.0 / 256.0;
        assert_eq!(output.frequency_hz, Some(hz.round() as u32));
        assert_eq!(output.band, Some(FrequencyBand::classify(hz)));
    }
}

#[test]
fn detector_follows_a_live_tone() {
    let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
    analyzer.set_sample_rate(44100.0);

    // Bin 12 of a 256-point FFT at 44.1 kHz, quiet enough not to saturate
    // the neighbouring bins.
    let freq = 12.0 * 44100.0 / 256.0;
    let tone: Vec<f32> = (0..2048)
        .map(|i| 0.05 * (2.0 * PI * freq * i as f32 / 44100.0).sin())
        .collect();

    let detector = FrequencyDetector::new();
    let mut output = detector.process(&analyzer.analyze());
    assert_eq!(output.frequency_hz, None);

    // The detector spectrum is heavily smoothed; feed it a few frames.
    for chunk in tone.chunks(256) {
        analyzer.add_samples(chunk);
        output = detector.process(&analyzer.analyze());
    }

    assert_eq!(output.frequency_hz, Some(freq.round() as u32));
    assert_eq!(output.band, Some(FrequencyBand::Midrange));
}
