use crate::audio::SpectrumFrame;
use crate::audio::spectrum::dominant_bin;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrequencyBand {
    LowBass,
    MusicalBass,
    UpperBass,
    Midrange,
    Treble,
}

impl FrequencyBand {
    pub fn classify(hz: f32) -> Self {
        if hz < 50.0 {
            Self::LowBass
        } else if hz < 100.0 {
            Self::MusicalBass
        } else if hz < 200.0 {
            Self::UpperBass
        } else if hz < 5000.0 {
            Self::Midrange
        } else {
            Self::Treble
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LowBass => "Low Bass (LFE)",
            Self::MusicalBass => "Musical Bass (Kick Drum, Bass Guitar)",
            Self::UpperBass => "Upper Bass (Lowest Male Vocals)",
            Self::Midrange => "Midrange (Dialog, Instruments, Effects)",
            Self::Treble => "Treble (Cymbals, High Speech Sounds)",
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct DetectorOutput {
    /// Rounded dominant frequency in Hz. `None` until a non-zero frequency is seen.
    pub frequency_hz: Option<u32>,
    pub band: Option<FrequencyBand>,
}

#[derive(Default)]
pub struct FrequencyDetector;

impl FrequencyDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, frame: &SpectrumFrame) -> DetectorOutput {
        let Some(bin) = dominant_bin(&frame.bins) else {
            return DetectorOutput::default();
        };
        if frame.fft_size == 0 {
            return DetectorOutput::default();
        }

        let dominant = bin as f32 * frame.sample_rate / frame.fft_size as f32;
        let rounded = dominant.round() as u32;
        if rounded == 0 {
            return DetectorOutput::default();
        }

        DetectorOutput {
            frequency_hz: Some(rounded),
            band: Some(FrequencyBand::classify(dominant)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_peak(bin: usize) -> SpectrumFrame {
        let mut bins = vec![10u8; 128];
        bins[bin] = 200;
        SpectrumFrame {
            bins,
            sample_rate: 44100.0,
            fft_size: 256,
        }
    }

    #[test]
    fn reports_rounded_bin_frequency() {
        let detector = FrequencyDetector::new();
        for bin in [1, 2, 5, 29, 100] {
            let output = detector.process(&frame_with_peak(bin));
            let expected = (bin as f32 * 44100.0 / 256.0).round() as u32;
            assert_eq!(output.frequency_hz, Some(expected));
        }
    }

    #[test]
    fn classifies_peak_into_band() {
        let detector = FrequencyDetector::new();
        // 172.27 Hz per bin.
        assert_eq!(
            detector.process(&frame_with_peak(1)).band,
            Some(FrequencyBand::UpperBass)
        );
        assert_eq!(
            detector.process(&frame_with_peak(10)).band,
            Some(FrequencyBand::Midrange)
        );
        assert_eq!(
            detector.process(&frame_with_peak(30)).band,
            Some(FrequencyBand::Treble)
        );
    }

    #[test]
    fn silence_reports_nothing() {
        let detector = FrequencyDetector::new();
        let frame = SpectrumFrame {
            bins: vec![0; 128],
            sample_rate: 44100.0,
            fft_size: 256,
        };
        assert_eq!(detector.process(&frame), DetectorOutput::default());
        assert_eq!(
            detector.process(&SpectrumFrame::default()),
            DetectorOutput::default()
        );
    }

    #[test]
    fn band_edges() {
        assert_eq!(FrequencyBand::classify(49.9), FrequencyBand::LowBass);
        assert_eq!(FrequencyBand::classify(50.0), FrequencyBand::MusicalBass);
        assert_eq!(FrequencyBand::classify(100.0), FrequencyBand::UpperBass);
        assert_eq!(FrequencyBand::classify(200.0), FrequencyBand::Midrange);
        assert_eq!(FrequencyBand::classify(4999.0), FrequencyBand::Midrange);
        assert_eq!(FrequencyBand::classify(5000.0), FrequencyBand::Treble);
    }

    #[test]
    fn labels_read_as_displayed() {
        assert_eq!(FrequencyBand::LowBass.to_string(), "Low Bass (LFE)");
        assert_eq!(
            FrequencyBand::Treble.label(),
            "Treble (Cymbals, High Speech Sounds)"
        );
    }
}
