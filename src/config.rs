pub const APP_VERSION: &str = "v0.1.0";

#[derive(Clone, PartialEq, Debug)]
pub struct AudioConfig {
    /// Samples per FFT frame for the strip energies. Must be a power of 2.
    /// 1024 samples gives 512 usable bins.
    pub energy_fft_size: usize,

    /// Temporal smoothing of the energy spectrum (0 = none, close to 1 = sluggish).
    pub energy_smoothing: f32,

    /// Samples per FFT frame for the frequency detector. Must be a power of 2.
    pub detector_fft_size: usize,

    /// Temporal smoothing of the detector spectrum.
    pub detector_smoothing: f32,

    /// Magnitudes at or below this level map to byte 0.
    pub min_decibels: f32,

    /// Magnitudes at or above this level map to byte 255.
    pub max_decibels: f32,

    /// Number of most recent samples used for the amplitude (RMS) reading.
    pub level_window: usize,

    /// "bass" band in Hz.
    pub bass_range: (f32, f32),

    /// "mid" band in Hz.
    pub mid_range: (f32, f32),

    /// "treble" band in Hz.
    pub treble_range: (f32, f32),

    /// How often the detector thread analyzes, in milliseconds.
    pub detector_interval_ms: u64,

    /// Used until a stream reports its own rate.
    pub fallback_sample_rate: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            energy_fft_size: 1024,
            energy_smoothing: 0.1,
            detector_fft_size: 256,
            detector_smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            level_window: 1024,
            bass_range: (20.0, 140.0),
            mid_range: (400.0, 2600.0),
            treble_range: (5200.0, 14000.0),
            detector_interval_ms: 16,
            fallback_sample_rate: 44100.0,
        }
    }
}

impl AudioConfig {
    /// Largest number of samples any analysis step looks back over.
    pub fn history_len(&self) -> usize {
        self.energy_fft_size
            .max(self.detector_fft_size)
            .max(self.level_window)
    }
}

/// Where the visualizer gets its canvas size from.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CanvasMode {
    /// Follows the visualizer viewport.
    Responsive,
    /// Always draws a canvas of this size, anchored at the top-left.
    Fixed { width: f32, height: f32 },
}

/// Canvases narrower than `below_width` use `strips` strips.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Breakpoint {
    pub below_width: f32,
    pub strips: usize,
}

#[derive(Clone, PartialEq, Debug)]
pub struct VisualConfig {
    /// Idle scroll speed in pixels per frame. Must stay above zero.
    pub base_speed: f32,

    /// Ceiling for the smoothed scroll speed.
    pub max_speed: f32,

    /// Fraction of the gap to the target speed closed every frame.
    pub speed_smoothing: f32,

    /// Amplitude below which audio has no effect on the strips.
    pub sound_threshold: f32,

    /// Glow alpha per unit of glow intensity, on a 0-255 scale.
    pub glow_opacity: f32,

    /// Overall audio reactivity.
    pub audio_multiplier: f32,

    /// Fraction of the gap to the target glow closed every frame.
    pub glow_smoothing: f32,

    /// Ambient glow oscillation advance per frame, in radians.
    pub glow_time_step: f32,

    /// Number of colour steps in one ramp of the gradient pattern.
    pub gradient_steps: usize,

    /// Gaussian standard deviation of the glow blur, in pixels.
    pub blur_radius: f32,

    pub canvas_mode: CanvasMode,

    /// Checked in order; the first matching entry wins.
    pub breakpoints: Vec<Breakpoint>,

    /// Strip count when no breakpoint matches.
    pub default_strips: usize,

    /// Quiet period after the last size change before the scene is rebuilt.
    pub resize_debounce_ms: u64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.1,
            max_speed: 80.0,
            speed_smoothing: 0.2,
            sound_threshold: 0.01,
            glow_opacity: 100.0,
            audio_multiplier: 4.0,
            glow_smoothing: 0.1,
            glow_time_step: 0.02,
            gradient_steps: 200,
            blur_radius: 10.0,
            canvas_mode: CanvasMode::Responsive,
            breakpoints: vec![Breakpoint {
                below_width: 768.0,
                strips: 7,
            }],
            default_strips: 11,
            resize_debounce_ms: 250,
        }
    }
}

impl VisualConfig {
    /// The fixed 800x1000 canvas with 11 strips.
    pub fn fixed_canvas() -> Self {
        Self {
            canvas_mode: CanvasMode::Fixed {
                width: 800.0,
                height: 1000.0,
            },
            ..Self::default()
        }
    }

    pub fn strip_count(&self, canvas_width: f32) -> usize {
        self.breakpoints
            .iter()
            .find(|bp| canvas_width < bp.below_width)
            .map(|bp| bp.strips)
            .unwrap_or(self.default_strips)
            .max(1)
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Config {
    pub audio: AudioConfig,
    pub visual: VisualConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_count_follows_breakpoints() {
        let config = VisualConfig::default();
        assert_eq!(config.strip_count(500.0), 7);
        assert_eq!(config.strip_count(767.9), 7);
        assert_eq!(config.strip_count(768.0), 11);
        assert_eq!(config.strip_count(1024.0), 11);
    }

    #[test]
    fn strip_count_never_zero() {
        let config = VisualConfig {
            breakpoints: vec![],
            default_strips: 0,
            ..VisualConfig::default()
        };
        assert_eq!(config.strip_count(100.0), 1);
    }

    #[test]
    fn fixed_canvas_uses_eleven_strips() {
        let config = VisualConfig::fixed_canvas();
        let CanvasMode::Fixed { width, .. } = config.canvas_mode else {
            panic!("expected a fixed canvas");
        };
        assert_eq!(config.strip_count(width), 11);
    }

    #[test]
    fn history_covers_every_window() {
        let config = AudioConfig {
            level_window: 4096,
            ..AudioConfig::default()
        };
        assert_eq!(config.history_len(), 4096);
        assert_eq!(AudioConfig::default().history_len(), 1024);
    }
}
