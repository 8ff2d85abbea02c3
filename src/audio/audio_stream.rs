use crate::audio::analyzer::AudioAnalyzer;
use anyhow::{Context, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

/// A running microphone capture. Dropping it stops the capture.
pub struct AudioStream {
    _stream: cpal::Stream,
    device_name: String,
    sample_rate: u32,
}

impl AudioStream {
    pub fn new(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        sample_format: SampleFormat,
        analyzer: Arc<Mutex<AudioAnalyzer>>,
    ) -> Result<Self, anyhow::Error> {
        let sample_rate = config.sample_rate.0;
        {
            let mut analyzer = analyzer.lock().unwrap();
            analyzer.clear();
            analyzer.set_sample_rate(sample_rate as f32);
        }

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(device, config, analyzer)?,
            SampleFormat::I16 => build_stream::<i16>(device, config, analyzer)?,
            SampleFormat::U16 => build_stream::<u16>(device, config, analyzer)?,
            other => {
                warn!("Input device offers unsupported sample format {other:?}");
                return Err(anyhow!("Unsupported sample format {other:?}"));
            }
        };

        stream.play().context("start audio stream")?;

        let device_name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
        info!("Audio started on {device_name} at {sample_rate} Hz");

        Ok(Self {
            _stream: stream,
            device_name,
            sample_rate,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn list_input_devices() -> Vec<String> {
    cpal::default_host()
        .input_devices()
        .map(|iter| iter.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

pub fn default_input_device_name() -> Option<String> {
    cpal::default_host()
        .default_input_device()
        .and_then(|d| d.name().ok())
}

/// Opens the device at `device_idx` in `devices` (matched by name) and starts
/// feeding its samples to `analyzer`.
pub fn create_audio_stream(
    device_idx: usize,
    devices: &[String],
    analyzer: Arc<Mutex<AudioAnalyzer>>,
) -> anyhow::Result<AudioStream> {
    let host = cpal::default_host();

    let device_name = devices
        .get(device_idx)
        .ok_or_else(|| anyhow!("No audio input device available"))?;

    let device = host
        .input_devices()
        .context("enumerate input devices")?
        .find(|d| d.name().ok().as_ref() == Some(device_name))
        .ok_or_else(|| anyhow!("Input device '{device_name}' is no longer available"))?;

    let supported_config = device
        .default_input_config()
        .with_context(|| format!("query input config of '{device_name}'"))?;
    let sample_format = supported_config.sample_format();
    let stream_config: cpal::StreamConfig = supported_config.into();

    AudioStream::new(&device, &stream_config, sample_format, analyzer)
        .with_context(|| format!("open microphone '{device_name}'"))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    analyzer: Arc<Mutex<AudioAnalyzer>>,
) -> Result<cpal::Stream, anyhow::Error>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let samples = downmix(data, channels);
                analyzer.lock().unwrap().add_samples(&samples);
            },
            |err| error!("Audio stream error: {err}"),
            None,
        )
        .context("build input stream")?;

    Ok(stream)
}

/// Averages interleaved frames into mono samples.
fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: Sample,
    f32: FromSample<T>,
{
    data.chunks(channels)
        .map(|frame| {
            let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
            sum / frame.len() as f32
        })
        .collect()
}
