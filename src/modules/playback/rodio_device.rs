use crate::core::traits::AudioDevice;
use anyhow::{Context, Result, bail};
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Rodio-backed audio device.
///
/// Duration comes from a decode probe at bind time and may be unknown for
/// some containers; position is tracked with Instant arithmetic because a
/// rodio sink does not report a playhead.
pub struct RodioDevice {
    sink: Sink,
    source_path: Option<PathBuf>,
    duration: Option<Duration>,
    // A decoded source has been appended since the last bind.
    appended: bool,

    // Track playback position
    playback_start: Option<Instant>,
    pause_elapsed: Duration,
}

impl RodioDevice {
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("Could not open default audio output")?;
        let sink = Sink::connect_new(stream.mixer());

        // This keeps the audio engine running globally for the life of the
        // program without binding it to this struct.
        // If we simply dropped it, sound would stop.
        std::mem::forget(stream);

        Ok(Self {
            sink,
            source_path: None,
            duration: None,
            appended: false,
            playback_start: None,
            pause_elapsed: Duration::from_secs(0),
        })
    }

    fn probe_duration(path: &Path) -> Option<Duration> {
        let file = File::open(path).ok()?;
        let decoder = Decoder::new(BufReader::new(file)).ok()?;
        decoder.total_duration()
    }
}

impl AudioDevice for RodioDevice {
    fn bind(&mut self, source: &Path) {
        self.sink.stop();
        self.appended = false;
        self.duration = Self::probe_duration(source);
        self.source_path = Some(source.to_path_buf());
        self.playback_start = None;
        self.pause_elapsed = Duration::from_secs(0);
    }

    fn play(&mut self) -> Result<()> {
        // Resume if a source is already queued and merely paused.
        if self.appended && !self.sink.empty() {
            self.sink.play();
            self.playback_start = Some(Instant::now());
            return Ok(());
        }

        let Some(path) = self.source_path.clone() else {
            bail!("no source bound");
        };

        let file = File::open(&path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode audio file: {}", path.display()))?;

        self.duration = self.duration.or_else(|| source.total_duration());
        self.sink.stop();
        self.sink.append(source);
        self.sink.play();
        self.appended = true;

        // Reset position tracking
        self.playback_start = Some(Instant::now());
        self.pause_elapsed = Duration::from_secs(0);

        Ok(())
    }

    fn pause(&mut self) {
        // Capture current position before pausing
        if let Some(start) = self.playback_start {
            self.pause_elapsed += start.elapsed();
        }

        self.sink.pause();
        self.playback_start = None; // Stop tracking time while paused
    }

    fn position(&self) -> Duration {
        match self.playback_start {
            Some(start) => self.pause_elapsed + start.elapsed(),
            None => self.pause_elapsed,
        }
    }

    fn set_position(&mut self, position: Duration) {
        if self.sink.try_seek(position).is_ok() {
            self.pause_elapsed = position;
            if self.playback_start.is_some() {
                self.playback_start = Some(Instant::now());
            }
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, amplitude: f32) {
        self.sink.set_volume(amplitude.clamp(0.0, 1.0));
    }

    fn finished(&self) -> bool {
        self.appended && self.sink.empty()
    }
}

// To avoid leaks
impl Drop for RodioDevice {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
