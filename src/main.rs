//! octave-scope - real-time spectrum and octave-band meter
//!
//! Plays a WAV file (or a procedural synth patch), snapshots what is being
//! played from the audio callback, and shows the latest window as a time
//! trace, a spectrum, or octave bands.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use octave_scope::analysis::Analyzer;
use octave_scope::audio::{AudioSystem, CaptureCounts};
use octave_scope::cli::Args;
use octave_scope::display;
use octave_scope::params::{locate_config, ConfigFile};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    let file = match locate_config(args.config.as_deref()) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            ConfigFile::load(&path)?
        }
        None => ConfigFile::default(),
    };
    let (mut analysis_config, playback_config) = args.apply_overrides(file);
    analysis_config
        .validate()
        .context("Invalid analysis config")?;

    let mut audio = AudioSystem::new(&analysis_config, &playback_config)?;

    // Label bins with the rate actually being played
    analysis_config.sample_rate_hz = audio.sample_rate();
    let mut analyzer = Analyzer::new(&analysis_config)?;

    log::info!(
        "Analysing {}-sample windows ({:.1}Hz per bin), {} octave bands",
        analyzer.window_size(),
        analysis_config.bin_width_hz(),
        analyzer.octave_count()
    );

    let interval = Duration::from_millis(analysis_config.poll_interval_ms);
    let deadline = args.run_duration().map(|d| Instant::now() + d);
    let mut last_counts = CaptureCounts::default();
    let stdout = std::io::stdout();

    loop {
        thread::sleep(interval);

        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::info!("Duration reached");
            break;
        }
        if audio.is_finished() {
            log::info!("Playback finished");
            break;
        }

        // Keep showing the previous window until a fresh one arrives
        if !audio.poll() {
            continue;
        }

        let analysis = analyzer.analyze(audio.snapshot())?;
        let frame = display::render(args.view, audio.snapshot(), &analysis, &analysis_config);

        let mut out = stdout.lock();
        // Clear screen and home the cursor before each frame
        write!(out, "\x1b[2J\x1b[H{frame}")?;
        out.flush()?;

        let counts = audio.stats();
        if counts != last_counts {
            log::debug!(
                "capture: {} windows, {} skipped blocks, {} dropped windows",
                counts.windows_completed,
                counts.skipped_blocks,
                counts.dropped_windows
            );
            last_counts = counts;
        }
    }

    let counts = audio.stats();
    log::info!(
        "Captured {} windows ({} blocks skipped, {} windows dropped)",
        counts.windows_completed,
        counts.skipped_blocks,
        counts.dropped_windows
    );
    Ok(())
}
