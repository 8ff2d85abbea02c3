use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Windowed FFT producing a smoothed magnitude spectrum scaled to bytes,
/// 0 at `min_decibels` and 255 at `max_decibels`.
pub struct SpectrumAnalyser {
    fft_size: usize,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    frame: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize, smoothing: f32, min_decibels: f32, max_decibels: f32) -> Self {
        let fft_size = fft_size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft_size,
            smoothing: smoothing.clamp(0.0, 1.0),
            min_decibels,
            max_decibels,
            window: blackman_window(fft_size),
            fft,
            frame: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            bytes: vec![0; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Analyzes the most recent `fft_size` samples of `samples`. Shorter input
    /// is treated as preceded by silence.
    pub fn process(&mut self, samples: &[f32]) -> &[u8] {
        let n = self.fft_size;
        let tail = &samples[samples.len().saturating_sub(n)..];
        let pad = n - tail.len();

        for (i, slot) in self.frame.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { tail[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.frame);

        let range = (self.max_decibels - self.min_decibels).max(f32::EPSILON);
        let tau = self.smoothing;
        for k in 0..self.bin_count() {
            let magnitude = self.frame[k].norm() / n as f32;
            let s = tau * self.smoothed[k] + (1.0 - tau) * magnitude;
            self.smoothed[k] = s;

            self.bytes[k] = if s > 0.0 {
                let db = 20.0 * s.log10();
                (255.0 * (db - self.min_decibels) / range).clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }

        &self.bytes
    }

    /// Last computed spectrum.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
        self.bytes.fill(0);
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
        })
        .collect()
}

/// Mean byte value over the bins covering `low_hz..=high_hz`.
pub fn band_energy(bins: &[u8], sample_rate: f32, low_hz: f32, high_hz: f32) -> f32 {
    if bins.is_empty() || sample_rate <= 0.0 {
        return 0.0;
    }

    let nyquist = sample_rate / 2.0;
    let last = bins.len() - 1;
    let to_index = |hz: f32| ((hz / nyquist * bins.len() as f32).round().max(0.0) as usize).min(last);

    let (lo, hi) = (to_index(low_hz), to_index(high_hz));
    let (lo, hi) = (lo.min(hi), lo.max(hi));

    let total: u32 = bins[lo..=hi].iter().map(|&b| b as u32).sum();
    total as f32 / (hi - lo + 1) as f32
}

/// Index of the first bin holding the largest value.
pub fn dominant_bin(bins: &[u8]) -> Option<usize> {
    let max = *bins.iter().max()?;
    bins.iter().position(|&b| b == max)
}
