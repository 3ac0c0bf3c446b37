//! Real-time capture and playback.
//!
//! The output stream's callback renders the playback source and feeds the
//! same samples to the capture stage, which hands complete windows to the
//! consumer through a single-slot buffer exchange.

mod capture;
mod exchange;
mod source;
mod system;

// Re-export public types
pub use capture::{
    capture_pipeline, connect, CaptureCounts, CaptureStage, CaptureState, CaptureStats,
    SnapshotReader,
};
pub use exchange::{BufferExchange, SampleBuffer, SingleSlot, Slot};
pub use source::{FilePlayer, Source, SynthPlayer};
pub use system::AudioSystem;
