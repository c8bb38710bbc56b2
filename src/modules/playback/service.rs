use crate::core::models::Track;
use crate::core::traits::AudioDevice;
use crate::utils::{clamp_percent, volume_percent_to_amplitude};
use std::path::PathBuf;
use std::time::Duration;

/// Initial volume percentage for a freshly constructed service.
pub const DEFAULT_VOLUME: u8 = 70;

pub type PlaybackChangeCallback = Box<dyn FnMut(bool) + Send>;
pub type ProgressChangeCallback = Box<dyn FnMut(f32) + Send>;
pub type TrackChangeCallback = Box<dyn FnMut(usize, &str) + Send>;
pub type VolumeChangeCallback = Box<dyn FnMut(u8) + Send>;
pub type TrackEndedCallback = Box<dyn FnMut() + Send>;

/// Callback-driven wrapper around a single audio output device.
///
/// The service owns the active track list, the loaded index, and the
/// playing flag; the device only ever sees one bound source. Each of the
/// five notification signals is single-slot: registering a callback
/// replaces the previous one, passing `None` clears it. Callers that need
/// fan-out must multiplex behind their own callback.
///
/// No operation here returns an error. Device-level playback rejection is
/// absorbed and surfaced as a `playing = false` notification; invalid
/// indices are silent no-ops.
pub struct AudioPlayerService {
    device: Box<dyn AudioDevice>,
    tracks: Vec<Track>,
    current_index: usize,
    playing: bool,
    volume: u8,
    loaded_file: Option<PathBuf>,
    // One ended notification per finished track.
    ended_fired: bool,

    on_playback_change: Option<PlaybackChangeCallback>,
    on_progress_change: Option<ProgressChangeCallback>,
    on_track_change: Option<TrackChangeCallback>,
    on_volume_change: Option<VolumeChangeCallback>,
    on_track_ended: Option<TrackEndedCallback>,
}

impl AudioPlayerService {
    pub fn new(mut device: Box<dyn AudioDevice>) -> Self {
        device.set_volume(volume_percent_to_amplitude(DEFAULT_VOLUME));

        Self {
            device,
            tracks: Vec::new(),
            current_index: 0,
            playing: false,
            volume: DEFAULT_VOLUME,
            loaded_file: None,
            ended_fired: false,
            on_playback_change: None,
            on_progress_change: None,
            on_track_change: None,
            on_volume_change: None,
            on_track_ended: None,
        }
    }

    /// Replace the addressable track list. Does not change the loaded or
    /// playing state by itself.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Bind the device to the track at `index` and notify track-change
    /// subscribers with `(index, name)`.
    ///
    /// Reloading the already-loaded track skips the device rebind (no
    /// audible re-buffering on nominal re-selection) but still notifies,
    /// and still starts playback when `auto_play` is set and nothing is
    /// playing. Out-of-range indices are silent no-ops.
    pub fn load_track(&mut self, index: usize, auto_play: bool) {
        let Some(track) = self.tracks.get(index) else {
            return;
        };
        let name = track.name.clone();
        let file = track.file.clone();

        let already_loaded =
            self.loaded_file.as_deref() == Some(file.as_path()) && self.current_index == index;
        if already_loaded {
            self.notify_track_change(index, &name);
            if auto_play && !self.playing {
                self.play();
            }
            return;
        }

        self.current_index = index;
        self.device.bind(&file);
        self.loaded_file = Some(file);
        self.ended_fired = false;
        self.notify_progress(0.0);
        self.notify_track_change(index, &name);
        if auto_play {
            self.play();
        }
    }

    /// Request playback. Rejection is absorbed: subscribers receive exactly
    /// one playback notification carrying the resulting state, so callers
    /// must rely on that notification for ground truth rather than assume
    /// the request succeeded.
    pub fn play(&mut self) {
        match self.device.play() {
            Ok(()) => {
                self.playing = true;
                self.ended_fired = false;
                self.notify_playback(true);
            }
            Err(_) => {
                self.playing = false;
                self.notify_playback(false);
            }
        }
    }

    /// Stop the device and notify `playing = false`.
    pub fn pause(&mut self) {
        self.device.pause();
        self.playing = false;
        self.notify_playback(false);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead to `percent` (0-100) of the track. No-op while the
    /// duration is not yet known.
    pub fn seek(&mut self, percent: f32) {
        let Some(duration) = self.device.duration() else {
            return;
        };
        if duration.is_zero() {
            return;
        }
        let fraction = clamp_percent(percent) / 100.0;
        self.device.set_position(duration.mul_f32(fraction));
    }

    /// Set volume as a percentage (0-100) and notify volume subscribers
    /// with the exact stored value.
    pub fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        self.device
            .set_volume(volume_percent_to_amplitude(self.volume));
        let volume = self.volume;
        self.notify_volume(volume);
    }

    /// Advance to the next track, wrapping over the track list. The current
    /// playing state carries over to the new track.
    pub fn next_track(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let next = (self.current_index + 1) % self.tracks.len();
        let auto_play = self.playing;
        self.load_track(next, auto_play);
    }

    /// Retreat to the previous track, wrapping over the track list.
    pub fn prev_track(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len();
        let prev = (self.current_index + len - 1) % len;
        let auto_play = self.playing;
        self.load_track(prev, auto_play);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Drive the device's time signals. Called once per application loop
    /// iteration: emits a progress notification while playing (skipped when
    /// the duration is unknown) and fires the track-ended notification once
    /// per finished track. Responding to the ended signal (conventionally
    /// by advancing to the next track) is the consumer's job.
    pub fn pump(&mut self) {
        if !self.playing {
            return;
        }

        if let Some(duration) = self.device.duration()
            && !duration.is_zero()
        {
            let percent =
                (self.device.position().as_secs_f32() / duration.as_secs_f32() * 100.0).min(100.0);
            self.notify_progress(percent);
        }

        if self.loaded_file.is_some() && self.device.finished() && !self.ended_fired {
            self.ended_fired = true;
            if let Some(cb) = self.on_track_ended.as_mut() {
                cb();
            }
        }
    }

    // ── subscriptions (single-slot: registering replaces, None clears) ──────

    pub fn on_playback_change(&mut self, cb: Option<PlaybackChangeCallback>) {
        self.on_playback_change = cb;
    }

    pub fn on_progress_change(&mut self, cb: Option<ProgressChangeCallback>) {
        self.on_progress_change = cb;
    }

    pub fn on_track_change(&mut self, cb: Option<TrackChangeCallback>) {
        self.on_track_change = cb;
    }

    pub fn on_volume_change(&mut self, cb: Option<VolumeChangeCallback>) {
        self.on_volume_change = cb;
    }

    pub fn on_track_ended(&mut self, cb: Option<TrackEndedCallback>) {
        self.on_track_ended = cb;
    }

    /// Drop every registered callback. Part of session teardown: no
    /// notification may fire after the owner has let go of the service.
    pub fn clear_subscriptions(&mut self) {
        self.on_playback_change = None;
        self.on_progress_change = None;
        self.on_track_change = None;
        self.on_volume_change = None;
        self.on_track_ended = None;
    }

    fn notify_playback(&mut self, playing: bool) {
        if let Some(cb) = self.on_playback_change.as_mut() {
            cb(playing);
        }
    }

    fn notify_progress(&mut self, percent: f32) {
        if let Some(cb) = self.on_progress_change.as_mut() {
            cb(percent);
        }
    }

    fn notify_track_change(&mut self, index: usize, name: &str) {
        if let Some(cb) = self.on_track_change.as_mut() {
            cb(index, name);
        }
    }

    fn notify_volume(&mut self, percent: u8) {
        if let Some(cb) = self.on_volume_change.as_mut() {
            cb(percent);
        }
    }
}
