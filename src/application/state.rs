use crate::core::events::*;
use crate::core::models::Direction;
use crate::modules::playback::service::DEFAULT_VOLUME;

/// Complete application state (single source of truth)
///
/// The shell exclusively owns `current_theme`; the carousel and the
/// playback service only learn about it through the application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Id of the theme currently on screen.
    pub current_theme: String,
    pub playback: PlaybackState,
    pub carousel: CarouselState,
    pub ui: UiState,
}

/// View of the playback service, kept current by playback events.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub track_index: usize,
    pub track_name: String,
    pub is_playing: bool,
    /// Elapsed progress of the current track, 0-100.
    pub progress: f32,
    pub volume: u8,
}

impl Default for PlaybackState {
    fn default() -> Self {
        // The view starts at the service's default volume so the two agree
        // even when no volume event ever arrives (e.g. settings failed to
        // load).
        Self {
            track_index: 0,
            track_name: String::new(),
            is_playing: false,
            progress: 0.0,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// View of the carousel and the transition controller.
#[derive(Debug, Clone, Default)]
pub struct CarouselState {
    pub auto_play: bool,
    /// Elapsed progress of the current slide, 0-100.
    pub progress: f32,
    pub direction: Direction,
    /// Visual offset of the theme strip, in gesture points.
    pub strip_offset: f32,
    pub in_transition: bool,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub status_message: String,
    pub error_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status_message: "Welcome".to_string(),
            error_message: None,
        }
    }
}

impl AppState {
    pub fn new(current_theme: String) -> Self {
        Self {
            current_theme,
            playback: PlaybackState::default(),
            carousel: CarouselState::default(),
            ui: UiState::default(),
        }
    }

    /// Update state based on an event
    pub fn apply_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Playback(pe) => match pe {
                PlaybackEvent::PlaybackChanged { playing } => {
                    self.playback.is_playing = *playing;
                    self.ui.status_message = if *playing {
                        format!("Playing: {}", self.playback.track_name)
                    } else {
                        "Paused".to_string()
                    };
                }
                PlaybackEvent::ProgressChanged { percent } => {
                    self.playback.progress = *percent;
                }
                PlaybackEvent::TrackChanged { index, name } => {
                    self.playback.track_index = *index;
                    self.playback.track_name = name.clone();
                    self.playback.progress = 0.0;
                }
                PlaybackEvent::VolumeChanged { percent } => {
                    self.playback.volume = *percent;
                    self.ui.status_message = format!("Volume set to {}%", percent);
                }
                PlaybackEvent::TrackEnded => {
                    // The application answers this by advancing; nothing to
                    // record here.
                }
            },

            AppEvent::Carousel(ce) => match ce {
                CarouselEvent::ThemeChanged { id, direction } => {
                    self.current_theme = id.clone();
                    self.carousel.direction = *direction;
                    self.ui.error_message = None;
                }
                CarouselEvent::NavigateRequested { .. } => {
                    // Navigation requests are committed (or ignored) by the
                    // application; state changes only on ThemeChanged.
                }
            },

            AppEvent::Ui(ue) => match ue {
                UiEvent::ShowMessage { message } => {
                    self.ui.status_message = message.clone();
                    self.ui.error_message = None;
                }
                UiEvent::ShowError { message } => {
                    self.ui.error_message = Some(message.clone());
                }
                _ => {}
            },

            AppEvent::Shutdown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_change_updates_flag_and_status() {
        let mut state = AppState::new("a".to_string());
        state.playback.track_name = "T1".to_string();

        state.apply_event(&AppEvent::Playback(PlaybackEvent::PlaybackChanged {
            playing: true,
        }));
        assert!(state.playback.is_playing);
        assert_eq!(state.ui.status_message, "Playing: T1");

        state.apply_event(&AppEvent::Playback(PlaybackEvent::PlaybackChanged {
            playing: false,
        }));
        assert!(!state.playback.is_playing);
        assert_eq!(state.ui.status_message, "Paused");
    }

    #[test]
    fn track_change_resets_progress() {
        let mut state = AppState::new("a".to_string());
        state.playback.progress = 73.0;

        state.apply_event(&AppEvent::Playback(PlaybackEvent::TrackChanged {
            index: 1,
            name: "T2".to_string(),
        }));

        assert_eq!(state.playback.track_index, 1);
        assert_eq!(state.playback.track_name, "T2");
        assert_eq!(state.playback.progress, 0.0);
    }

    #[test]
    fn theme_change_moves_current_and_direction() {
        let mut state = AppState::new("a".to_string());

        state.apply_event(&AppEvent::Carousel(CarouselEvent::ThemeChanged {
            id: "b".to_string(),
            direction: Direction::Backward,
        }));

        assert_eq!(state.current_theme, "b");
        assert_eq!(state.carousel.direction, Direction::Backward);
    }

    #[test]
    fn navigate_request_alone_does_not_move_current() {
        let mut state = AppState::new("a".to_string());

        state.apply_event(&AppEvent::Carousel(CarouselEvent::NavigateRequested {
            id: "b".to_string(),
            direction: Direction::Forward,
        }));

        assert_eq!(state.current_theme, "a");
    }

    #[test]
    fn fresh_state_carries_the_service_default_volume() {
        let state = AppState::new("a".to_string());
        assert_eq!(state.playback.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn show_error_sets_and_message_clears() {
        let mut state = AppState::new("a".to_string());

        state.apply_event(&AppEvent::Ui(UiEvent::ShowError {
            message: "boom".to_string(),
        }));
        assert_eq!(state.ui.error_message.as_deref(), Some("boom"));

        state.apply_event(&AppEvent::Ui(UiEvent::ShowMessage {
            message: "ok".to_string(),
        }));
        assert_eq!(state.ui.error_message, None);
        assert_eq!(state.ui.status_message, "ok");
    }
}
