//! Capture stage (real-time producer) and snapshot reader (consumer).
//!
//! The capture stage runs inside the audio engine's callback. It mixes each
//! block to mono and fills the exchange buffer until a full window is
//! collected, then hands it to the reader. It never blocks, locks, logs, or
//! allocates; when no buffer is available the block is simply skipped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::exchange::{BufferExchange, SampleBuffer, SingleSlot, Slot};
use crate::error::ConfigError;

/// Lock-free counters shared between producer and consumer
#[derive(Debug, Default)]
pub struct CaptureStats {
    windows_completed: AtomicU64,
    skipped_blocks: AtomicU64,
    dropped_windows: AtomicU64,
}

/// Point-in-time copy of [`CaptureStats`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureCounts {
    /// Full windows handed to the reader
    pub windows_completed: u64,
    /// Blocks ignored because no buffer was available at fill start
    pub skipped_blocks: u64,
    /// Full windows discarded because the reader's slot was occupied
    pub dropped_windows: u64,
}

impl CaptureStats {
    pub fn counts(&self) -> CaptureCounts {
        CaptureCounts {
            windows_completed: self.windows_completed.load(Ordering::Relaxed),
            skipped_blocks: self.skipped_blocks.load(Ordering::Relaxed),
            dropped_windows: self.dropped_windows.load(Ordering::Relaxed),
        }
    }
}

/// Where the producer is in its fill cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// Progress is zero; the next block tries to acquire a buffer
    AwaitingBuffer,
    /// Some samples written; the next block continues filling
    Filling { progress: usize },
}

/// Build a connected capture stage and reader.
///
/// One buffer of `window_size` samples is allocated here and circulates
/// between the two for the life of the pipeline. `channels` is the number
/// of interleaved channels per frame in the blocks fed to
/// [`CaptureStage::process`].
pub fn capture_pipeline(
    window_size: usize,
    channels: usize,
) -> Result<(CaptureStage, SnapshotReader), ConfigError> {
    if window_size == 0 {
        return Err(ConfigError::InvalidWindowSize(window_size));
    }
    connect(Arc::new(BufferExchange::with_window(window_size)), channels)
}

/// Wire a stage and reader to an existing exchange.
///
/// The window size is taken from the exchange's buffer.
pub fn connect<S: Slot<SampleBuffer>>(
    exchange: Arc<BufferExchange<S>>,
    channels: usize,
) -> Result<(CaptureStage<S>, SnapshotReader<S>), ConfigError> {
    let window_size = exchange.window_size();
    if window_size == 0 {
        return Err(ConfigError::InvalidWindowSize(window_size));
    }
    if channels == 0 {
        return Err(ConfigError::InvalidChannelCount);
    }
    let stats = Arc::new(CaptureStats::default());

    let stage = CaptureStage {
        exchange: Arc::clone(&exchange),
        buffer: None,
        progress: 0,
        window_size,
        channels,
        stats: Arc::clone(&stats),
    };
    let reader = SnapshotReader {
        exchange,
        snapshot: vec![0.0; window_size],
        pending_return: None,
        stats,
    };
    Ok((stage, reader))
}

/// Producer half, owned by the audio callback
pub struct CaptureStage<S = SingleSlot<SampleBuffer>> {
    exchange: Arc<BufferExchange<S>>,
    buffer: Option<SampleBuffer>,
    progress: usize,
    window_size: usize,
    channels: usize,
    stats: Arc<CaptureStats>,
}

impl<S: Slot<SampleBuffer>> CaptureStage<S> {
    pub fn state(&self) -> CaptureState {
        match self.progress {
            0 => CaptureState::AwaitingBuffer,
            progress => CaptureState::Filling { progress },
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stats(&self) -> Arc<CaptureStats> {
        Arc::clone(&self.stats)
    }

    /// Feed one engine block of interleaved frames.
    ///
    /// A trailing partial frame is ignored. Samples left over in the block
    /// after a window completes are not carried into the next window.
    pub fn process(&mut self, block: &[f32]) {
        if self.progress == 0 && self.buffer.is_none() {
            match self.exchange.acquire() {
                Some(buffer) => self.buffer = Some(buffer),
                None => {
                    self.stats.skipped_blocks.fetch_add(1, Ordering::Relaxed);
                    return;
                }
            }
        }

        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };

        let remaining = self.window_size - self.progress;
        let scale = 1.0 / self.channels as f32;
        for (slot, frame) in buffer[self.progress..]
            .iter_mut()
            .zip(block.chunks_exact(self.channels))
            .take(remaining)
        {
            // Mix down to mono
            *slot = frame.iter().sum::<f32>() * scale;
            self.progress += 1;
        }

        if self.progress == self.window_size {
            self.progress = 0;
            if let Some(full) = self.buffer.take() {
                match self.exchange.deliver(full) {
                    Ok(()) => {
                        self.stats.windows_completed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(full) => {
                        // Reader still holds an older window; refill this one
                        self.buffer = Some(full);
                        self.stats.dropped_windows.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    }
}

/// Consumer half, polled from the display/update loop
pub struct SnapshotReader<S = SingleSlot<SampleBuffer>> {
    exchange: Arc<BufferExchange<S>>,
    snapshot: Vec<f32>,
    pending_return: Option<SampleBuffer>,
    stats: Arc<CaptureStats>,
}

impl<S: Slot<SampleBuffer>> SnapshotReader<S> {
    /// Check for a new window without blocking.
    ///
    /// Returns `true` when the snapshot was replaced. Otherwise the previous
    /// snapshot is kept. While an earlier buffer is still waiting to go back
    /// to the producer no new window is taken, so at most one is held here.
    pub fn poll(&mut self) -> bool {
        if let Some(buffer) = self.pending_return.take() {
            self.return_buffer(buffer);
            if self.pending_return.is_some() {
                return false;
            }
        }

        let Some(buffer) = self.exchange.take_completed() else {
            return false;
        };
        if buffer.len() != self.snapshot.len() {
            log::warn!(
                "discarding {}-sample window, expected {}",
                buffer.len(),
                self.snapshot.len()
            );
            return false;
        }
        self.snapshot.copy_from_slice(&buffer);
        self.return_buffer(buffer);
        true
    }

    /// Latest complete window (zeros until the first one arrives)
    pub fn snapshot(&self) -> &[f32] {
        &self.snapshot
    }

    pub fn stats(&self) -> CaptureCounts {
        self.stats.counts()
    }

    fn return_buffer(&mut self, buffer: SampleBuffer) {
        if let Err(buffer) = self.exchange.give_back(buffer) {
            log::debug!("return slot occupied, retrying on next poll");
            self.pending_return = Some(buffer);
        }
    }
}
