use crate::core::models::Direction;

/// All events that can occur in the application
#[derive(Debug, Clone)]
pub enum AppEvent {
    // Playback events
    Playback(PlaybackEvent),

    // Carousel navigation events
    Carousel(CarouselEvent),

    // UI events
    Ui(UiEvent),

    // Application lifecycle
    Shutdown,
}

/// Notifications surfaced by the audio playback service.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// Playing flag changed. Carries ground truth: a rejected play request
    /// arrives here as `playing: false`.
    PlaybackChanged { playing: bool },

    /// Track position advanced (0-100, derived from position / duration).
    ProgressChanged { percent: f32 },

    /// A track was loaded (index within the active track list, plus name).
    TrackChanged { index: usize, name: String },

    /// Volume changed (0-100).
    VolumeChanged { percent: u8 },

    /// The current track finished playing.
    TrackEnded,
}

#[derive(Debug, Clone)]
pub enum CarouselEvent {
    /// The carousel asks the host to navigate to a theme, carrying the
    /// transition direction. Emitted by next()/prev() and by the
    /// auto-advance timer; the host decides whether and when to commit it.
    NavigateRequested { id: String, direction: Direction },

    /// The host committed a navigation: the current theme changed.
    ThemeChanged { id: String, direction: Direction },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// User requested the next theme
    NextThemeRequested,

    /// User requested the previous theme
    PrevThemeRequested,

    /// User toggled carousel auto-advance
    ToggleAutoPlayRequested,

    /// User requested play/pause toggle
    TogglePlayRequested,

    /// User requested next track
    NextTrackRequested,

    /// User requested previous track
    PreviousTrackRequested,

    /// User requested a seek (0-100)
    SeekRequested { percent: f32 },

    /// User requested volume change (0-100)
    VolumeChangeRequested { percent: u8 },

    /// User selected a specific track in the current theme
    TrackSelected { index: usize },

    /// Horizontal drag started at x (gesture points)
    DragStarted { x: f32 },

    /// Horizontal drag moved to x
    DragMoved { x: f32 },

    /// Horizontal drag ended at x
    DragEnded { x: f32 },

    /// Display message to user
    ShowMessage { message: String },

    /// Display error to user
    ShowError { message: String },

    /// User requested quit
    QuitRequested,
}

/// Type alias for event sender
pub type EventSender = crossbeam_channel::Sender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = crossbeam_channel::Receiver<AppEvent>;
