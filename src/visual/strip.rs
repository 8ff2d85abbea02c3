use crate::audio::EnergyReading;
use crate::config::VisualConfig;
use std::f32::consts::TAU;

/// Reactivity weight of strip `index` out of `total`: 1 at the centre strip,
/// falling off quadratically towards both edges.
pub fn center_influence(index: usize, total: usize) -> f32 {
    if total <= 1 {
        return 1.0;
    }
    let center = (total - 1) as f32 / 2.0;
    let distance = (index as f32 - center) / center;
    1.0 - distance * distance
}

/// Amplitude above the sound threshold, scaled. Zero for quiet input.
pub fn audio_influence(amplitude: f32, config: &VisualConfig) -> f32 {
    (amplitude - config.sound_threshold).max(0.0) * 2.0 * config.audio_multiplier
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// One vertical column of the visualization.
#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    pub x: f32,
    pub width: f32,
    pub index: usize,
    pub total: usize,
    /// Fixed offset of the ambient glow oscillation, in `[0, 2π)`.
    pub phase: f32,
    pub center_influence: f32,
    /// Total distance scrolled. Only ever grows; wrapped when drawn. Kept in
    /// f64 so small speeds still register after hours of scrolling.
    pub offset: f64,
    pub speed: f32,
    pub glow_intensity: f32,
}

impl Strip {
    pub fn new(x: f32, width: f32, index: usize, total: usize, phase: f32, base_speed: f32) -> Self {
        Self {
            x,
            width,
            index,
            total,
            phase,
            center_influence: center_influence(index, total),
            offset: 0.0,
            speed: base_speed,
            glow_intensity: 0.0,
        }
    }

    /// `total` strips of equal width side by side across `canvas_width`, each
    /// with a random phase.
    pub fn layout(
        canvas_width: f32,
        total: usize,
        base_speed: f32,
        rng: &mut fastrand::Rng,
    ) -> Vec<Strip> {
        let total = total.max(1);
        let width = canvas_width / total as f32;
        (0..total)
            .map(|i| Strip::new(i as f32 * width, width, i, total, rng.f32() * TAU, base_speed))
            .collect()
    }

    /// Speed the strip heads towards for this reading, before clamping.
    pub fn target_speed(&self, reading: &EnergyReading, config: &VisualConfig) -> f32 {
        let weighted = reading.low * 20.0 + reading.mid * 10.0 + reading.high * 5.0;
        config.base_speed
            + weighted * self.center_influence * audio_influence(reading.amplitude, config)
    }

    /// Advances one frame. `frame` counts rendered frames from 1.
    pub fn update(&mut self, reading: &EnergyReading, frame: u64, config: &VisualConfig) {
        let influence = audio_influence(reading.amplitude, config);

        let target = self
            .target_speed(reading, config)
            .clamp(config.base_speed, config.max_speed.max(config.base_speed));
        self.speed = lerp(self.speed, target, config.speed_smoothing);
        self.offset += f64::from(self.speed);

        let time = frame as f64 * f64::from(config.glow_time_step);
        let base_glow = ((time + f64::from(self.phase)).sin() * 0.3 + 0.7) as f32;
        let audio_glow = influence * self.center_influence;
        self.glow_intensity = lerp(
            self.glow_intensity,
            base_glow + audio_glow,
            config.glow_smoothing,
        );
    }

    /// Top edges of the pattern tiles, each `cycle_height` tall, covering
    /// `0..canvas_height`.
    pub fn tile_positions(&self, cycle_height: f32, canvas_height: f32) -> Vec<f32> {
        if cycle_height <= 0.0 {
            return Vec::new();
        }

        let mut y = (self.offset.rem_euclid(f64::from(cycle_height)) as f32) - cycle_height;
        let mut tiles = Vec::new();
        while y < canvas_height {
            tiles.push(y);
            y += cycle_height;
        }
        tiles
    }

    /// Glow alpha in `[0, 1]`, or `None` when the strip has no glow.
    pub fn glow_alpha(&self, config: &VisualConfig) -> Option<f32> {
        if self.glow_intensity <= 0.0 {
            return None;
        }
        Some((self.glow_intensity * config.glow_opacity).clamp(0.0, 255.0) / 255.0)
    }
}
