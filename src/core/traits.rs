use crate::application::state::AppState;
use crate::core::events::UiEvent;
use crate::modules::storage::Settings;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// Abstraction for the single underlying audio output device.
///
/// The playback service owns track-list semantics (indices, wraparound,
/// notifications); the device only knows about one bound source at a time.
pub trait AudioDevice: Send {
    /// Bind the device to a new source. Clears any queued audio and resets
    /// the reported position. Does not start playback.
    fn bind(&mut self, source: &Path);

    /// Request playback of the bound source. May be rejected (unreadable or
    /// undecodable source); callers must treat rejection as "not playing",
    /// never as a fatal error.
    fn play(&mut self) -> Result<()>;

    /// Stop playback, keeping the bound source.
    fn pause(&mut self);

    /// Current playback position. Duration::ZERO when nothing was started.
    fn position(&self) -> Duration;

    /// Move the playhead. No-op if the device cannot seek the bound source.
    fn set_position(&mut self, position: Duration);

    /// Total duration of the bound source, if known yet.
    fn duration(&self) -> Option<Duration>;

    /// Set output volume (0.0 - 1.0 amplitude).
    fn set_volume(&mut self, amplitude: f32);

    /// True once the bound source has played to its end.
    fn finished(&self) -> bool;
}

/// Abstraction for persistent user settings storage
pub trait StorageBackend: Send {
    /// Load persisted settings
    fn load(&self) -> Result<Settings>;

    /// Save settings
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Abstraction for UI rendering
pub trait UiRenderer {
    /// Initialize the UI (setup terminal, etc.)
    fn init(&mut self) -> Result<()>;

    /// Cleanup the UI (restore terminal, etc.)
    fn cleanup(&mut self) -> Result<()>;

    /// Render current state
    fn render(&mut self, state: &AppState) -> Result<()>;

    /// Poll for user input (non-blocking)
    /// Returns events generated from user input
    fn poll_input(&mut self) -> Result<Vec<UiEvent>>;
}
