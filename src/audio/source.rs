//! Playback sources rendered into the output device's callback.
//!
//! Both sources produce interleaved frames for an arbitrary device channel
//! count and never allocate once constructed.

use anyhow::{bail, Context, Result};
use glicol::Engine;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::params::audio_constants::BLOCK_SIZE;

/// Glicol composition (procedural music code)
const GLICOL_COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 60 _60 _~a 48
~a: choose 48 48 48 72 0 0 0
~amp: ~gate >> envperc 0.001 0.1
~pit: ~gate >> mul 261.63
~lead: saw ~pit >> mul ~amp >> lpf ~mod 5.0 >> mul 0.1
~mod: sin 0.2 >> mul 1300 >> add 1500
o: ~lead >> plate 0.1
"#;

/// Audio that feeds the output stream
pub enum Source {
    File(FilePlayer),
    Synth(SynthPlayer),
}

impl Source {
    /// Fill `out` with interleaved frames of `channels` samples each
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        match self {
            Source::File(player) => player.render(out, channels),
            Source::Synth(player) => player.render(out, channels),
        }
    }
}

/// Decoded WAV file played from memory
pub struct FilePlayer {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
    cursor: usize,
    looping: bool,
    finished: Arc<AtomicBool>,
}

impl FilePlayer {
    /// Decode `path` fully into memory, normalising to f32 in [-1, 1]
    pub fn open(path: &Path, looping: bool) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .context("Failed to decode float samples")?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .context("Failed to decode integer samples")?
            }
        };

        log::info!(
            "Decoded {}: {} ch @ {}Hz, {:.1}s",
            path.display(),
            spec.channels,
            spec.sample_rate,
            samples.len() as f32 / spec.channels.max(1) as f32 / spec.sample_rate as f32
        );

        Self::from_samples(samples, spec.channels as usize, spec.sample_rate, looping)
    }

    /// Play already-decoded interleaved samples
    pub fn from_samples(
        samples: Vec<f32>,
        channels: usize,
        sample_rate: u32,
        looping: bool,
    ) -> Result<Self> {
        if channels == 0 {
            bail!("audio has no channels");
        }
        if samples.len() < channels {
            bail!("audio contains no complete frames");
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
            cursor: 0,
            looping,
            finished: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Flag raised once a non-looping file has played to the end
    pub fn finished_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.finished)
    }

    fn frame_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    fn render(&mut self, out: &mut [f32], channels: usize) {
        let frames = self.frame_count();
        for frame in out.chunks_exact_mut(channels) {
            if self.cursor >= frames {
                if self.looping {
                    self.cursor = 0;
                } else {
                    frame.fill(0.0);
                    self.finished.store(true, Ordering::Relaxed);
                    continue;
                }
            }

            let source = &self.samples[self.cursor * self.channels..][..self.channels];
            for (c, sample) in frame.iter_mut().enumerate() {
                // Mono spreads to every channel; extra device channels reuse the last one
                *sample = source[c.min(self.channels - 1)];
            }
            self.cursor += 1;
        }
    }
}

/// Procedural Glicol synth
pub struct SynthPlayer {
    engine: Engine<BLOCK_SIZE>,
    left: [f32; BLOCK_SIZE],
    right: [f32; BLOCK_SIZE],
    position: usize,
}

impl SynthPlayer {
    pub fn new(sample_rate: u32) -> Result<Self> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(GLICOL_COMPOSITION);
        engine
            .update()
            .map_err(|e| anyhow::anyhow!("Glicol engine init failed: {:?}", e))?;

        Ok(Self {
            engine,
            left: [0.0; BLOCK_SIZE],
            right: [0.0; BLOCK_SIZE],
            position: BLOCK_SIZE,
        })
    }

    fn render(&mut self, out: &mut [f32], channels: usize) {
        for frame in out.chunks_exact_mut(channels) {
            if self.position == BLOCK_SIZE {
                let (buffers, _) = self.engine.next_block(vec![]);
                for i in 0..BLOCK_SIZE {
                    // Safety limiter: hard clip to ±0.5 to prevent ear damage
                    self.left[i] = buffers[0][i].clamp(-0.5, 0.5);
                    self.right[i] = buffers[1][i].clamp(-0.5, 0.5);
                }
                self.position = 0;
            }

            let (l, r) = (self.left[self.position], self.right[self.position]);
            for (c, sample) in frame.iter_mut().enumerate() {
                *sample = match c {
                    0 => l,
                    1 => r,
                    _ => 0.5 * (l + r),
                };
            }
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_file_spreads_to_stereo() {
        let mut player = FilePlayer::from_samples(vec![0.1, 0.2, 0.3], 1, 44100, false).unwrap();
        let mut out = [9.0f32; 8];
        player.render(&mut out, 2);

        assert_eq!(out, [0.1, 0.1, 0.2, 0.2, 0.3, 0.3, 0.0, 0.0]);
        assert!(player.finished_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn test_looping_file_wraps() {
        let mut player =
            FilePlayer::from_samples(vec![1.0, -1.0, 0.5, -0.5], 2, 48000, true).unwrap();
        let mut out = [0.0f32; 6];
        player.render(&mut out, 2);

        assert_eq!(out, [1.0, -1.0, 0.5, -0.5, 1.0, -1.0]);
        assert!(!player.finished_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn test_stereo_file_on_mono_device() {
        let mut player = FilePlayer::from_samples(vec![0.4, 0.8], 2, 44100, false).unwrap();
        let mut out = [0.0f32; 1];
        player.render(&mut out, 1);
        assert_eq!(out, [0.4]);
    }

    #[test]
    fn test_rejects_empty_audio() {
        assert!(FilePlayer::from_samples(vec![], 2, 44100, false).is_err());
        assert!(FilePlayer::from_samples(vec![0.0], 0, 44100, false).is_err());
    }

    #[test]
    fn test_reads_wav_through_hound() {
        let path = std::env::temp_dir().join(format!("octave-scope-{}.wav", std::process::id()));
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        {
            let mut writer = hound::WavWriter::create(&path, spec).unwrap();
            for sample in [16384i16, -16384, 0, 32767] {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }

        let mut player = FilePlayer::open(&path, false).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(player.sample_rate(), 22050);
        let mut out = [0.0f32; 4];
        player.render(&mut out, 2);
        assert_eq!(out[0], 0.5);
        assert_eq!(out[1], -0.5);
        assert_eq!(out[2], 0.0);
        assert!((out[3] - 1.0).abs() < 1e-4);
    }
}
