use crate::application::state::AppState;
use crate::core::events::*;
use crate::core::models::Direction;
use crate::core::traits::{StorageBackend, UiRenderer};
use crate::modules::carousel::Carousel;
use crate::modules::catalog::Catalog;
use crate::modules::gesture::{SwipeController, SwipeOutcome};
use crate::modules::playback::service::AudioPlayerService;
use crate::modules::storage::Settings;
use anyhow::Result;
use crossbeam_channel::bounded;
use std::time::{Duration, Instant};

/// How far the theme strip slides to leave the screen, in gesture points.
const STRIP_WIDTH: f32 = 800.0;

/// Main application orchestrator.
///
/// Owns the single source of truth (`AppState`), the event channel, and
/// the three core collaborators: the playback service, the carousel, and
/// the swipe controller. The collaborators never talk to each other
/// directly — playing audio disabling auto-advance, manual navigation
/// pausing audio, and track-ended advancing the playlist are all wired
/// here.
pub struct Application {
    state: AppState,
    catalog: Catalog,
    event_tx: EventSender,
    event_rx: EventReceiver,

    player: AudioPlayerService,
    carousel: Carousel,
    swipe: SwipeController,

    // Module references
    storage_backend: Option<Box<dyn StorageBackend>>,
    ui_renderer: Option<Box<dyn UiRenderer>>,

    running: bool,
}

impl Application {
    pub fn new(catalog: Catalog, player: AudioPlayerService, slide_duration: Duration) -> Self {
        let (tx, rx) = bounded(100);

        let initial = catalog.themes()[0].id.clone();
        let carousel = Carousel::new(catalog.ids(), initial.clone(), tx.clone(), slide_duration);

        Self {
            state: AppState::new(initial),
            catalog,
            event_tx: tx,
            event_rx: rx,
            player,
            carousel,
            swipe: SwipeController::new(),
            storage_backend: None,
            ui_renderer: None,
            running: false,
        }
    }

    /// Set the storage backend
    pub fn with_storage_backend(mut self, backend: Box<dyn StorageBackend>) -> Self {
        self.storage_backend = Some(backend);
        self
    }

    /// Set the UI renderer
    pub fn with_ui_renderer(mut self, renderer: Box<dyn UiRenderer>) -> Self {
        self.ui_renderer = Some(renderer);
        self
    }

    /// Get event sender (for modules to emit events)
    pub fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }

    /// Get current state (read-only)
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Initialize the application
    pub fn init(&mut self) -> Result<()> {
        let now = Instant::now();

        // Wire the playback service's five signals into the event channel.
        let tx = self.event_tx.clone();
        self.player.on_playback_change(Some(Box::new(move |playing| {
            tx.send(AppEvent::Playback(PlaybackEvent::PlaybackChanged {
                playing,
            }))
            .ok();
        })));
        let tx = self.event_tx.clone();
        self.player.on_progress_change(Some(Box::new(move |percent| {
            tx.send(AppEvent::Playback(PlaybackEvent::ProgressChanged {
                percent,
            }))
            .ok();
        })));
        let tx = self.event_tx.clone();
        self.player.on_track_change(Some(Box::new(move |index, name| {
            tx.send(AppEvent::Playback(PlaybackEvent::TrackChanged {
                index,
                name: name.to_string(),
            }))
            .ok();
        })));
        let tx = self.event_tx.clone();
        self.player.on_volume_change(Some(Box::new(move |percent| {
            tx.send(AppEvent::Playback(PlaybackEvent::VolumeChanged {
                percent,
            }))
            .ok();
        })));
        let tx = self.event_tx.clone();
        self.player.on_track_ended(Some(Box::new(move || {
            tx.send(AppEvent::Playback(PlaybackEvent::TrackEnded)).ok();
        })));

        // Restore persisted settings.
        let mut initial = self.state.current_theme.clone();
        if let Some(storage) = &self.storage_backend {
            match storage.load() {
                Ok(settings) => {
                    self.player.set_volume(settings.volume);
                    if let Some(last) = settings.last_theme
                        && self.catalog.ids().contains(&last)
                    {
                        initial = last;
                    }
                }
                Err(e) => {
                    eprintln!("Warning: Could not load settings: {}", e);
                }
            }
        }

        // Bring the playback service in line with the initial theme. A
        // restored theme is an external jump, so the direction is inferred.
        let direction = self.carousel.direction_to(&initial);
        self.apply_navigation(&initial, direction, now);

        // Initialize UI
        if let Some(ui) = &mut self.ui_renderer {
            ui.init()?;
        }

        Ok(())
    }

    /// Run the main event loop
    pub fn run(&mut self) -> Result<()> {
        self.running = true;

        while self.running {
            let now = Instant::now();

            // Process all pending events
            self.process_events(now)?;

            // Poll UI for input
            if let Some(ui) = &mut self.ui_renderer {
                let ui_events = ui.poll_input()?;
                for event in ui_events {
                    self.event_tx.send(AppEvent::Ui(event))?;
                }
            }

            // Advance timers: auto-advance deadline and in-flight transition.
            self.advance(now);
            self.process_events(now)?;

            // Drive the device's time signals (progress bar, track ended).
            self.player.pump();

            // Render UI with current state
            self.sync_view();
            if let Some(ui) = &mut self.ui_renderer {
                ui.render(&self.state)?;
            }

            // Small sleep to prevent CPU spinning
            std::thread::sleep(Duration::from_millis(16)); // ~60 FPS
        }

        Ok(())
    }

    /// Advance carousel and transition clocks to `now`. A completed
    /// slide-out applies its pending navigation in the same pass, so the
    /// new theme appears already centered.
    fn advance(&mut self, now: Instant) {
        self.carousel.tick(now);
        if let Some((target, direction)) = self.swipe.tick(now) {
            self.apply_navigation(&target, direction, now);
        }
    }

    /// Copy collaborator-owned display values into the state snapshot.
    fn sync_view(&mut self) {
        self.state.carousel.auto_play = self.carousel.auto_play();
        self.state.carousel.progress = self.carousel.progress();
        self.state.carousel.strip_offset = self.swipe.offset();
        self.state.carousel.in_transition = self.swipe.in_flight();
    }

    /// Process all pending events in the queue
    fn process_events(&mut self, now: Instant) -> Result<()> {
        // Drain all events currently in queue
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event, now)?;
        }
        Ok(())
    }

    /// Handle a single event
    fn handle_event(&mut self, event: AppEvent, now: Instant) -> Result<()> {
        // Update state based on event
        self.state.apply_event(&event);

        match &event {
            AppEvent::Playback(pe) => self.handle_playback_event(pe, now)?,
            AppEvent::Carousel(CarouselEvent::NavigateRequested { id, direction }) => {
                let id = id.clone();
                let direction = *direction;
                self.request_navigation(&id, direction, now);
            }
            AppEvent::Carousel(CarouselEvent::ThemeChanged { .. }) => {}
            AppEvent::Ui(ue) => {
                let ue = ue.clone();
                self.handle_ui_event(&ue, now)?;
            }
            AppEvent::Shutdown => {
                self.running = false;
            }
        }

        Ok(())
    }

    fn handle_playback_event(&mut self, event: &PlaybackEvent, now: Instant) -> Result<()> {
        match event {
            // Playing audio disables carousel auto-advance.
            PlaybackEvent::PlaybackChanged { playing: true } => {
                if self.carousel.auto_play() {
                    self.carousel.toggle_auto_play(now);
                }
            }

            // Conventional response to a finished track: advance, keeping
            // the playing state (so playback continues down the list).
            PlaybackEvent::TrackEnded => {
                self.player.next_track();
            }

            PlaybackEvent::VolumeChanged { .. } => {
                self.persist_settings();
            }

            _ => {}
        }

        Ok(())
    }

    fn handle_ui_event(&mut self, event: &UiEvent, now: Instant) -> Result<()> {
        match event {
            UiEvent::NextThemeRequested => {
                if !self.swipe.in_flight() {
                    self.pause_for_manual_navigation();
                    self.carousel.next();
                }
            }

            UiEvent::PrevThemeRequested => {
                if !self.swipe.in_flight() {
                    self.pause_for_manual_navigation();
                    self.carousel.prev();
                }
            }

            UiEvent::ToggleAutoPlayRequested => {
                self.carousel.toggle_auto_play(now);
                let message = if self.carousel.auto_play() {
                    "Auto-advance on".to_string()
                } else {
                    "Auto-advance off".to_string()
                };
                self.event_tx
                    .send(AppEvent::Ui(UiEvent::ShowMessage { message }))?;
            }

            UiEvent::TogglePlayRequested => {
                self.player.toggle();
            }

            UiEvent::NextTrackRequested => {
                self.player.next_track();
            }

            UiEvent::PreviousTrackRequested => {
                self.player.prev_track();
            }

            UiEvent::SeekRequested { percent } => {
                self.player.seek(*percent);
            }

            UiEvent::VolumeChangeRequested { percent } => {
                self.player.set_volume(*percent);
            }

            UiEvent::TrackSelected { index } => {
                self.player.load_track(*index, true);
            }

            UiEvent::DragStarted { x } => {
                self.swipe.drag_start(*x, now);
            }

            UiEvent::DragMoved { x } => {
                self.swipe.drag_move(*x);
            }

            UiEvent::DragEnded { x } => {
                match self.swipe.drag_end(*x, now) {
                    Some(SwipeOutcome::Next) => {
                        self.pause_for_manual_navigation();
                        let target = self.catalog.next_id(&self.state.current_theme).to_string();
                        self.request_navigation(&target, Direction::Forward, now);
                    }
                    Some(SwipeOutcome::Prev) => {
                        self.pause_for_manual_navigation();
                        let target = self.catalog.prev_id(&self.state.current_theme).to_string();
                        self.request_navigation(&target, Direction::Backward, now);
                    }
                    // Snap-back animates home on its own; nothing to commit.
                    Some(SwipeOutcome::SnapBack) | None => {}
                }
            }

            UiEvent::QuitRequested => {
                self.event_tx.send(AppEvent::Shutdown)?;
            }

            _ => {}
        }

        Ok(())
    }

    /// Start the animate-then-jump handshake toward `id`, sliding in the
    /// requested direction. Ignored while a transition is already in
    /// flight, so overlapping requests cannot garble the animation.
    fn request_navigation(&mut self, id: &str, direction: Direction, now: Instant) {
        self.swipe
            .begin_transition(direction, STRIP_WIDTH, id.to_string(), now);
    }

    /// Commit a navigation: the one place the current theme id actually
    /// changes. Pushes the theme's tracks into the playback service and
    /// loads the first one.
    fn apply_navigation(&mut self, id: &str, direction: Direction, now: Instant) {
        let theme = self.catalog.theme_by_id(id).clone();

        self.state.current_theme = theme.id.clone();
        self.carousel.observe_current(&theme.id, Some(direction), now);
        self.player.set_tracks(theme.tracks.clone());
        self.player.load_track(0, false);

        self.event_tx
            .send(AppEvent::Carousel(CarouselEvent::ThemeChanged {
                id: theme.id,
                direction,
            }))
            .ok();

        self.persist_settings();
    }

    fn pause_for_manual_navigation(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        }
    }

    fn persist_settings(&mut self) {
        if let Some(storage) = &self.storage_backend {
            let settings = Settings {
                volume: self.player.volume(),
                last_theme: Some(self.state.current_theme.clone()),
            };
            if let Err(e) = storage.save(&settings) {
                self.event_tx
                    .send(AppEvent::Ui(UiEvent::ShowError {
                        message: format!("Could not save settings: {}", e),
                    }))
                    .ok();
            }
        }
    }

    /// Cleanup resources
    pub fn cleanup(&mut self) -> Result<()> {
        self.persist_settings();

        // Drop every playback subscription so nothing fires after teardown.
        self.player.clear_subscriptions();

        // Cleanup UI
        if let Some(ui) = &mut self.ui_renderer {
            ui.cleanup()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Theme, ThemeStatus, Track};
    use crate::core::traits::AudioDevice;
    use crate::modules::gesture::TRANSITION_DURATION;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// Always-accepting device double; playback state only.
    struct QuietDevice {
        playing: bool,
    }

    impl AudioDevice for QuietDevice {
        fn bind(&mut self, _source: &Path) {}
        fn play(&mut self) -> Result<()> {
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn position(&self) -> Duration {
            Duration::ZERO
        }
        fn set_position(&mut self, _position: Duration) {}
        fn duration(&self) -> Option<Duration> {
            None
        }
        fn set_volume(&mut self, _amplitude: f32) {}
        fn finished(&self) -> bool {
            false
        }
    }

    fn theme(id: &str, track_names: &[&str]) -> Theme {
        Theme {
            id: id.to_string(),
            name: id.to_uppercase(),
            icon: "◆".to_string(),
            status: ThemeStatus::Available,
            status_label: None,
            description: vec![],
            tracks: track_names
                .iter()
                .enumerate()
                .map(|(i, name)| Track {
                    id: i as u32 + 1,
                    name: name.to_string(),
                    file: PathBuf::from(format!("{}-{}.mp3", id, i)),
                })
                .collect(),
            links: None,
            artwork: None,
        }
    }

    fn test_app() -> Application {
        let catalog = Catalog::new(vec![theme("a", &["T1", "T2"]), theme("b", &["T3"])]).unwrap();
        let player = AudioPlayerService::new(Box::new(QuietDevice { playing: false }));
        let mut app = Application::new(catalog, player, Duration::from_millis(5_000));
        app.init().unwrap();
        app
    }

    fn send_ui(app: &Application, event: UiEvent) {
        app.event_sender().send(AppEvent::Ui(event)).unwrap();
    }

    #[test]
    fn init_loads_first_track_of_first_theme() {
        let mut app = test_app();
        app.process_events(Instant::now()).unwrap();

        assert_eq!(app.state().current_theme, "a");
        assert_eq!(app.state().playback.track_name, "T1");
        assert_eq!(app.state().playback.track_index, 0);
    }

    #[test]
    fn manual_next_commits_after_the_transition() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::NextThemeRequested);
        app.process_events(t0).unwrap();
        assert!(app.swipe.in_flight(), "slide-out starts immediately");
        assert_eq!(app.state().current_theme, "a", "data swap waits for it");

        app.advance(t0 + TRANSITION_DURATION);
        app.process_events(t0 + TRANSITION_DURATION).unwrap();

        assert_eq!(app.state().current_theme, "b");
        assert_eq!(app.state().playback.track_name, "T3");
        assert!(!app.swipe.in_flight());
    }

    #[test]
    fn manual_navigation_pauses_audio() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::TogglePlayRequested);
        app.process_events(t0).unwrap();
        assert!(app.state().playback.is_playing);

        send_ui(&app, UiEvent::NextThemeRequested);
        app.process_events(t0).unwrap();

        assert!(!app.player.is_playing());
    }

    #[test]
    fn prev_on_two_themes_lands_with_backward_direction() {
        // Shorter-path inference ties forward on a two-ring, so the
        // explicit prev direction must survive the whole handshake.
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::PrevThemeRequested);
        app.process_events(t0).unwrap();

        app.advance(t0 + TRANSITION_DURATION);
        app.process_events(t0 + TRANSITION_DURATION).unwrap();

        assert_eq!(app.state().current_theme, "b");
        assert_eq!(app.state().carousel.direction, Direction::Backward);
        assert_eq!(app.carousel.direction(), Direction::Backward);
    }

    #[test]
    fn rightward_swipe_commits_prev_with_backward_direction() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::DragStarted { x: 100.0 });
        app.process_events(t0).unwrap();
        send_ui(&app, UiEvent::DragEnded { x: 200.0 });
        let released = t0 + Duration::from_millis(100);
        app.process_events(released).unwrap();

        let landed = released + TRANSITION_DURATION;
        app.advance(landed);
        app.process_events(landed).unwrap();

        assert_eq!(app.state().current_theme, "b");
        assert_eq!(app.state().carousel.direction, Direction::Backward);
    }

    #[test]
    fn navigation_requests_are_ignored_while_in_flight() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::NextThemeRequested);
        send_ui(&app, UiEvent::NextThemeRequested);
        app.process_events(t0).unwrap();

        app.advance(t0 + TRANSITION_DURATION);
        app.process_events(t0 + TRANSITION_DURATION).unwrap();

        // A double-press lands on b, not back on a (two themes wrap).
        assert_eq!(app.state().current_theme, "b");
    }

    #[test]
    fn track_ended_advances_down_the_list() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        app.event_sender()
            .send(AppEvent::Playback(PlaybackEvent::TrackEnded))
            .unwrap();
        app.process_events(t0).unwrap();

        assert_eq!(app.state().playback.track_index, 1);
        assert_eq!(app.state().playback.track_name, "T2");
    }

    #[test]
    fn starting_playback_disables_auto_advance() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::ToggleAutoPlayRequested);
        app.process_events(t0).unwrap();
        assert!(app.carousel.auto_play());

        send_ui(&app, UiEvent::TogglePlayRequested);
        app.process_events(t0).unwrap();

        assert!(app.state().playback.is_playing);
        assert!(!app.carousel.auto_play());
    }

    #[test]
    fn auto_advance_navigates_via_the_same_handshake() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::ToggleAutoPlayRequested);
        app.process_events(t0).unwrap();

        // Slide expires: the carousel requests navigation, which starts a
        // transition rather than swapping instantly.
        let expiry = t0 + Duration::from_millis(5_000);
        app.advance(expiry);
        app.process_events(expiry).unwrap();
        assert!(app.swipe.in_flight());
        assert_eq!(app.state().current_theme, "a");

        let landed = expiry + TRANSITION_DURATION;
        app.advance(landed);
        app.process_events(landed).unwrap();
        assert_eq!(app.state().current_theme, "b");
    }

    #[test]
    fn committed_swipe_navigates_and_pauses() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::TogglePlayRequested);
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::DragStarted { x: 300.0 });
        app.process_events(t0).unwrap();
        send_ui(&app, UiEvent::DragMoved { x: 220.0 });
        send_ui(&app, UiEvent::DragEnded { x: 220.0 });
        let released = t0 + Duration::from_millis(100);
        app.process_events(released).unwrap();

        assert!(!app.player.is_playing(), "commit pauses audio");
        assert!(app.swipe.in_flight());

        let landed = released + TRANSITION_DURATION;
        app.advance(landed);
        app.process_events(landed).unwrap();
        assert_eq!(app.state().current_theme, "b");
    }

    #[test]
    fn snap_back_navigates_nowhere() {
        let mut app = test_app();
        let t0 = Instant::now();
        app.process_events(t0).unwrap();

        send_ui(&app, UiEvent::DragStarted { x: 300.0 });
        app.process_events(t0).unwrap();
        send_ui(&app, UiEvent::DragEnded { x: 270.0 });
        app.process_events(t0 + Duration::from_millis(100)).unwrap();

        let settled = t0 + Duration::from_millis(500);
        app.advance(settled);
        app.process_events(settled).unwrap();

        assert_eq!(app.state().current_theme, "a");
    }

    #[test]
    fn quit_event_stops_the_loop() {
        let mut app = test_app();
        app.running = true;
        send_ui(&app, UiEvent::QuitRequested);
        app.process_events(Instant::now()).unwrap();
        assert!(!app.running);
    }
}
