use crate::audio::EnergyReading;
use crate::config::VisualConfig;
use crate::visual::canvas::CanvasSize;
use crate::visual::glow::GlowBuffer;
use crate::visual::gradient::GradientPattern;
use crate::visual::strip::Strip;
use log::debug;

/// Everything the visualizer draws, independent of any rendering surface:
/// the strips, the shared gradient pattern and the glow buffer.
pub struct StripScene {
    config: VisualConfig,
    canvas: CanvasSize,
    strips: Vec<Strip>,
    pattern: GradientPattern,
    glow: GlowBuffer,
    frame: u64,
    generation: u64,
    rng: fastrand::Rng,
}

impl StripScene {
    pub fn new(config: VisualConfig, canvas: CanvasSize) -> Self {
        Self::with_rng(config, canvas, fastrand::Rng::new())
    }

    /// Deterministic strip phases, for tests and reproducible captures.
    pub fn with_seed(config: VisualConfig, canvas: CanvasSize, seed: u64) -> Self {
        Self::with_rng(config, canvas, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(config: VisualConfig, canvas: CanvasSize, mut rng: fastrand::Rng) -> Self {
        let strips = Strip::layout(
            canvas.width,
            config.strip_count(canvas.width),
            config.base_speed,
            &mut rng,
        );
        let pattern = GradientPattern::generate(canvas.height, config.gradient_steps);
        let glow = GlowBuffer::new(canvas.width, canvas.height, config.blur_radius);

        Self {
            config,
            canvas,
            strips,
            pattern,
            glow,
            frame: 0,
            generation: 0,
            rng,
        }
    }

    /// Replaces the strips, the pattern and the glow buffer for a new canvas size.
    pub fn rebuild(&mut self, canvas: CanvasSize) {
        let count = self.config.strip_count(canvas.width);
        debug!(
            "Rebuilding scene: {}x{} -> {}x{}, {} strips",
            self.canvas.width, self.canvas.height, canvas.width, canvas.height, count
        );

        self.canvas = canvas;
        self.strips = Strip::layout(canvas.width, count, self.config.base_speed, &mut self.rng);
        self.pattern = GradientPattern::generate(canvas.height, self.config.gradient_steps);
        self.glow = GlowBuffer::new(canvas.width, canvas.height, self.config.blur_radius);
        self.generation += 1;
    }

    /// Applies new settings. Anything derived from them is rebuilt.
    pub fn reconfigure(&mut self, config: VisualConfig) {
        if config == self.config {
            return;
        }
        self.config = config;
        self.rebuild(self.canvas);
    }

    /// Runs one frame: clears the glow buffer, updates every strip and
    /// accumulates each strip's glow band.
    pub fn advance(&mut self, reading: &EnergyReading) {
        self.glow.clear();
        self.frame += 1;

        for strip in &mut self.strips {
            strip.update(reading, self.frame, &self.config);
            if let Some(alpha) = strip.glow_alpha(&self.config) {
                self.glow.fill_band(strip.x, strip.x + strip.width, alpha);
            }
        }
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    pub fn pattern(&self) -> &GradientPattern {
        &self.pattern
    }

    pub fn glow(&self) -> &GlowBuffer {
        &self.glow
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Bumped on every rebuild; the pattern may have changed when it moves.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_matches_canvas() {
        let scene = StripScene::with_seed(
            VisualConfig::default(),
            CanvasSize::new(1024.0, 768.0),
            1,
        );
        assert_eq!(scene.strips().len(), 11);
        assert_eq!(scene.pattern().height(), 768);
        assert_eq!(scene.glow().width(), 1024);
        assert_eq!(scene.glow().height(), 768);
    }

    #[test]
    fn advance_fills_glow_for_every_strip() {
        let mut scene = StripScene::with_seed(
            VisualConfig::default(),
            CanvasSize::new(700.0, 400.0),
            2,
        );
        scene.advance(&EnergyReading::default());

        assert_eq!(scene.frame(), 1);
        let glow = scene.glow().columns();
        for strip in scene.strips() {
            let middle = (strip.x + strip.width / 2.0) as usize;
            assert!(glow[middle] > 0.0, "strip {} has no glow", strip.index);
        }
    }

    #[test]
    fn glow_is_cleared_between_frames() {
        let config = VisualConfig {
            glow_smoothing: 1.0,
            ..VisualConfig::default()
        };
        let mut scene = StripScene::with_seed(config, CanvasSize::new(100.0, 100.0), 3);
        scene.advance(&EnergyReading::default());
        let first: Vec<f32> = scene.glow().columns().to_vec();
        scene.advance(&EnergyReading::default());

        // Accumulating instead of clearing would push every column towards 1.
        let strip = &scene.strips()[0];
        let expected = scene.config().glow_opacity * strip.glow_intensity / 255.0;
        let column = scene.glow().columns()[1];
        assert!((column - expected.min(1.0)).abs() < 1e-5);
        assert_eq!(first.len(), scene.glow().columns().len());
    }

    #[test]
    fn reconfigure_rebuilds_only_on_change() {
        let mut scene = StripScene::with_seed(
            VisualConfig::default(),
            CanvasSize::new(1024.0, 768.0),
            4,
        );
        scene.reconfigure(VisualConfig::default());
        assert_eq!(scene.generation(), 0);

        scene.reconfigure(VisualConfig {
            default_strips: 15,
            ..VisualConfig::default()
        });
        assert_eq!(scene.generation(), 1);
        assert_eq!(scene.strips().len(), 15);
    }
}
