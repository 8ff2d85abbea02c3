use crate::audio::spectrum::{SpectrumAnalyser, band_energy};
use crate::config::AudioConfig;
use log::debug;

/// Band energies and signal level for one frame.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct EnergyReading {
    /// Bass energy, 0-1.
    pub low: f32,
    /// Mid energy, 0-1.
    pub mid: f32,
    /// Treble energy, 0-1.
    pub high: f32,
    /// RMS of the latest samples. Unnormalized.
    pub amplitude: f32,
}

/// One detector spectrum together with what is needed to map bins to Hz.
#[derive(Clone, Debug, Default)]
pub struct SpectrumFrame {
    pub bins: Vec<u8>,
    pub sample_rate: f32,
    pub fft_size: usize,
}

pub struct AudioAnalyzer {
    config: AudioConfig,
    buffer: Vec<f32>,
    sample_rate: f32,
    energy: SpectrumAnalyser,
    detector: SpectrumAnalyser,
}

impl AudioAnalyzer {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            config: config.clone(),
            buffer: Vec::with_capacity(config.history_len()),
            sample_rate: config.fallback_sample_rate,
            energy: energy_analyser(config),
            detector: detector_analyser(config),
        }
    }

    /// Replaces the analysis settings. Spectrum history is discarded, buffered
    /// samples are kept.
    pub fn reconfigure(&mut self, config: &AudioConfig) {
        if *config == self.config {
            return;
        }
        debug!("Reconfiguring analyzer: {config:?}");

        self.energy = energy_analyser(config);
        self.detector = detector_analyser(config);
        self.config = config.clone();
        self.trim();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn add_samples(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);
        self.trim();
    }

    /// Drops buffered audio and spectrum history, e.g. when the input device changes.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.energy.reset();
        self.detector.reset();
    }

    #[cfg(test)]
    fn history(&self) -> &[f32] {
        &self.buffer
    }

    fn trim(&mut self) {
        let keep = self.config.history_len();
        if self.buffer.len() > keep {
            self.buffer.drain(0..self.buffer.len() - keep);
        }
    }

    /// RMS over the level window.
    pub fn calculate_amplitude(&self) -> f32 {
        let window = &self.buffer[self.buffer.len().saturating_sub(self.config.level_window)..];
        if window.is_empty() {
            return 0.0;
        }

        let sum_squares: f32 = window.iter().map(|&x| x * x).sum();
        (sum_squares / window.len() as f32).sqrt()
    }

    /// Refreshes the energy spectrum and reads the three bands plus the signal level.
    pub fn sample_energy(&mut self) -> EnergyReading {
        let bins = self.energy.process(&self.buffer);
        let band = |(lo, hi): (f32, f32)| band_energy(bins, self.sample_rate, lo, hi) / 255.0;

        let low = band(self.config.bass_range);
        let mid = band(self.config.mid_range);
        let high = band(self.config.treble_range);

        EnergyReading {
            low,
            mid,
            high,
            amplitude: self.calculate_amplitude(),
        }
    }

    /// Refreshes the detector spectrum.
    pub fn analyze(&mut self) -> SpectrumFrame {
        let bins = self.detector.process(&self.buffer).to_vec();
        SpectrumFrame {
            bins,
            sample_rate: self.sample_rate,
            fft_size: self.detector.fft_size(),
        }
    }

    /// Last energy spectrum, for display.
    pub fn energy_spectrum(&self) -> Vec<u8> {
        self.energy.bytes().to_vec()
    }
}

fn energy_analyser(config: &AudioConfig) -> SpectrumAnalyser {
    SpectrumAnalyser::new(
        config.energy_fft_size,
        config.energy_smoothing,
        config.min_decibels,
        config.max_decibels,
    )
}

fn detector_analyser(config: &AudioConfig) -> SpectrumAnalyser {
    SpectrumAnalyser::new(
        config.detector_fft_size,
        config.detector_smoothing,
        config.min_decibels,
        config.max_decibels,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / 44100.0).sin())
            .collect()
    }

    #[test]
    fn empty_buffer_reads_zero() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        assert_eq!(analyzer.sample_energy(), EnergyReading::default());
        assert!(analyzer.analyze().bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn buffer_keeps_only_history() {
        let config = AudioConfig::default();
        let mut analyzer = AudioAnalyzer::new(&config);
        analyzer.add_samples(&vec![0.1; 5000]);
        assert_eq!(analyzer.history().len(), config.history_len());
    }

    #[test]
    fn amplitude_is_rms() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        analyzer.add_samples(&[0.5, -0.5, 0.5, -0.5]);
        assert!((analyzer.calculate_amplitude() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn bass_tone_lands_in_low_band() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        analyzer.add_samples(&tone(80.0, 1024));
        let reading = analyzer.sample_energy();

        assert!(reading.low > 0.5, "low = {}", reading.low);
        assert!(reading.low > reading.high);
        assert!(reading.low <= 1.0);
        assert!(reading.amplitude > 0.3);
    }

    #[test]
    fn treble_tone_lands_in_high_band() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        analyzer.add_samples(&tone(9000.0, 1024));
        let reading = analyzer.sample_energy();

        assert!(reading.high > reading.low);
    }

    #[test]
    fn detector_frame_reports_rate_and_size() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        analyzer.set_sample_rate(48000.0);
        analyzer.add_samples(&tone(440.0, 256));
        let frame = analyzer.analyze();

        assert_eq!(frame.fft_size, 256);
        assert_eq!(frame.bins.len(), 128);
        assert_eq!(frame.sample_rate, 48000.0);
    }

    #[test]
    fn reconfigure_changes_fft_size() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        let config = AudioConfig {
            detector_fft_size: 512,
            ..AudioConfig::default()
        };
        analyzer.reconfigure(&config);
        assert_eq!(analyzer.analyze().bins.len(), 256);
    }

    #[test]
    fn clear_discards_samples() {
        let mut analyzer = AudioAnalyzer::new(&AudioConfig::default());
        analyzer.add_samples(&tone(440.0, 1024));
        analyzer.sample_energy();
        analyzer.clear();

        assert!(analyzer.history().is_empty());
        assert_eq!(analyzer.sample_energy(), EnergyReading::default());
    }
}
