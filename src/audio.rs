pub mod analyzer;
pub mod audio_stream;
pub mod spectrum;

pub use analyzer::{AudioAnalyzer, EnergyReading, SpectrumFrame};
pub use audio_stream::AudioStream;
