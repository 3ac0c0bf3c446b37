//! Audio system wiring playback and capture into the output stream.

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::capture::{capture_pipeline, CaptureCounts, SnapshotReader};
use super::source::{FilePlayer, Source, SynthPlayer};
use crate::params::{AnalysisConfig, PlaybackConfig};

/// Audio system managing playback and the capture hand-off
pub struct AudioSystem {
    /// Consumer end of the capture exchange
    reader: SnapshotReader,

    /// Raised when a non-looping file has played out
    finished: Option<Arc<AtomicBool>>,

    sample_rate: u32,
    channels: usize,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device, start playback, and begin capturing
    pub fn new(analysis: &AnalysisConfig, playback: &PlaybackConfig) -> Result<Self> {
        analysis.validate().context("Invalid analysis config")?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No audio output device found")?;

        let config = device
            .default_output_config()
            .context("Failed to get audio config")?;

        if config.sample_format() != SampleFormat::F32 {
            bail!(
                "Unsupported output sample format {:?} (need f32)",
                config.sample_format()
            );
        }

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let (mut source, finished) = open_source(playback, sample_rate)?;
        log::info!("Playing {}", playback.describe());

        let (mut stage, reader) = capture_pipeline(analysis.window_size, channels)
            .context("Failed to build capture pipeline")?;

        // Real-time callback: render, then snapshot what was rendered.
        // No locks, logging, or allocation past this point.
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    source.render(data, channels);
                    stage.process(data);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .context("Failed to build audio stream")?;

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            reader,
            finished,
            sample_rate,
            channels,
            _stream: stream,
        })
    }

    /// Take the latest complete window if one is ready (never blocks)
    pub fn poll(&mut self) -> bool {
        self.reader.poll()
    }

    /// Latest mono window
    pub fn snapshot(&self) -> &[f32] {
        self.reader.snapshot()
    }

    pub fn stats(&self) -> CaptureCounts {
        self.reader.stats()
    }

    /// Device sample rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// True once a non-looping file source has ended
    pub fn is_finished(&self) -> bool {
        self.finished
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn open_source(
    playback: &PlaybackConfig,
    device_rate: u32,
) -> Result<(Source, Option<Arc<AtomicBool>>)> {
    match &playback.input {
        Some(path) => {
            let player = FilePlayer::open(path, playback.looping)?;
            if player.sample_rate() != device_rate {
                log::warn!(
                    "{} is {}Hz but the device runs at {}Hz; playing without resampling",
                    path.display(),
                    player.sample_rate(),
                    device_rate
                );
            }
            let finished = player.finished_flag();
            Ok((Source::File(player), Some(finished)))
        }
        None => Ok((Source::Synth(SynthPlayer::new(device_rate)?), None)),
    }
}
