use crate::core::events::{AppEvent, CarouselEvent, EventSender};
use crate::core::models::Direction;
use std::time::{Duration, Instant};

/// How long a theme stays on screen while auto-advance is on.
pub const DEFAULT_SLIDE_DURATION: Duration = Duration::from_millis(10_000);

/// Carousel navigation state machine.
///
/// The carousel never owns the current theme id — the host does. It keeps a
/// mirror of the last id it was shown (`observe_current`), turns next/prev
/// requests and auto-advance expiry into `CarouselEvent::NavigateRequested`
/// messages, and tracks progress and transition direction for the renderer.
///
/// Timers are deadlines checked by `tick`, which the application loop calls
/// every frame. The deadline re-arms whenever the observed id or the
/// auto-play flag changes, so a stale slide can never fire after the state
/// has moved on, and dropping the carousel drops all pending deadlines.
pub struct Carousel {
    items: Vec<String>,
    current: String,
    auto_play: bool,
    progress: f32,
    direction: Direction,
    slide_duration: Duration,
    slide_origin: Option<Instant>,
    // The auto-advance deadline is one-shot per slide.
    advance_fired: bool,
    event_tx: EventSender,
}

impl Carousel {
    pub fn new(
        items: Vec<String>,
        current: String,
        event_tx: EventSender,
        slide_duration: Duration,
    ) -> Self {
        Self {
            items,
            current,
            auto_play: false,
            progress: 0.0,
            direction: Direction::Forward,
            slide_duration,
            slide_origin: None,
            advance_fired: false,
            event_tx,
        }
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    /// Elapsed progress of the current slide, 0-100. Monotonically
    /// non-decreasing between resets, saturating at 100.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn index_of(&self, id: &str) -> usize {
        self.items.iter().position(|i| i == id).unwrap_or(0)
    }

    fn next_id(&self) -> String {
        let index = self.index_of(&self.current);
        self.items[(index + 1) % self.items.len()].clone()
    }

    fn prev_id(&self) -> String {
        let index = self.index_of(&self.current);
        let len = self.items.len();
        self.items[(index + len - 1) % len].clone()
    }

    /// Shorter-path direction around the ring from the mirrored current id
    /// to `id`. Ties favor forward. Pure; used once per navigation event.
    pub fn direction_to(&self, id: &str) -> Direction {
        let len = self.items.len();
        if len <= 1 {
            return self.direction;
        }
        let old = self.index_of(&self.current);
        let new = self.index_of(id);
        let forward = (new + len - old) % len;
        let backward = (old + len - new) % len;
        if forward <= backward {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Ask the host to navigate forward. Does not mutate the mirrored id;
    /// the host commits the change and the carousel observes it.
    ///
    /// A single-item ring degenerates to a same-id request and leaves the
    /// direction untouched.
    pub fn next(&mut self) {
        if self.items.len() > 1 {
            self.direction = Direction::Forward;
        }
        let id = self.next_id();
        let direction = self.direction;
        self.request_navigation(id, direction);
    }

    /// Ask the host to navigate backward.
    pub fn prev(&mut self) {
        if self.items.len() > 1 {
            self.direction = Direction::Backward;
        }
        let id = self.prev_id();
        let direction = self.direction;
        self.request_navigation(id, direction);
    }

    /// Flip auto-advance. Progress resets and the slide deadline is armed
    /// or cancelled in the same step.
    pub fn toggle_auto_play(&mut self, now: Instant) {
        self.auto_play = !self.auto_play;
        self.progress = 0.0;
        self.advance_fired = false;
        self.slide_origin = self.auto_play.then_some(now);
    }

    /// Tell the carousel what the host-owned current id is. On a change,
    /// progress resets and the slide deadline re-arms. A navigation
    /// committed with a known direction passes it in; for an external
    /// jump (`None`) the direction is inferred from the shorter ring
    /// path, ties forward.
    pub fn observe_current(&mut self, id: &str, direction: Option<Direction>, now: Instant) {
        if id == self.current {
            return;
        }
        self.direction = direction.unwrap_or_else(|| self.direction_to(id));
        self.current = id.to_string();
        self.progress = 0.0;
        self.advance_fired = false;
        if self.auto_play {
            self.slide_origin = Some(now);
        }
    }

    /// Advance the auto-play clock. Recomputes progress against the slide
    /// origin and fires the one-shot navigation request at expiry.
    /// Auto-advance always moves forward.
    pub fn tick(&mut self, now: Instant) {
        if !self.auto_play {
            return;
        }
        let Some(origin) = self.slide_origin else {
            return;
        };

        let elapsed = now.saturating_duration_since(origin);
        self.progress = (elapsed.as_secs_f32() / self.slide_duration.as_secs_f32() * 100.0)
            .min(100.0);

        if !self.advance_fired && elapsed >= self.slide_duration {
            self.advance_fired = true;
            let id = self.next_id();
            self.request_navigation(id, Direction::Forward);
        }
    }

    fn request_navigation(&mut self, id: String, direction: Direction) {
        self.event_tx
            .send(AppEvent::Carousel(CarouselEvent::NavigateRequested {
                id,
                direction,
            }))
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::EventReceiver;
    use crossbeam_channel::bounded;

    fn carousel_with(
        ids: &[&str],
        current: &str,
        slide_ms: u64,
    ) -> (Carousel, EventReceiver) {
        let (tx, rx) = bounded(64);
        let carousel = Carousel::new(
            ids.iter().map(|s| s.to_string()).collect(),
            current.to_string(),
            tx,
            Duration::from_millis(slide_ms),
        );
        (carousel, rx)
    }

    fn drain_navigations(rx: &EventReceiver) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Carousel(CarouselEvent::NavigateRequested { id, .. }) = event {
                out.push(id);
            }
        }
        out
    }

    // ── initial state ────────────────────────────────────────────────────────

    #[test]
    fn starts_idle_with_forward_direction() {
        let (carousel, _rx) = carousel_with(&["a", "b", "c"], "a", 10_000);
        assert!(!carousel.auto_play());
        assert_eq!(carousel.progress(), 0.0);
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    // ── next / prev ──────────────────────────────────────────────────────────

    #[test]
    fn next_requests_the_following_item() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "a", 10_000);
        carousel.next();
        assert_eq!(drain_navigations(&rx), vec!["b"]);
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "c", 10_000);
        carousel.next();
        assert_eq!(drain_navigations(&rx), vec!["a"]);
    }

    #[test]
    fn prev_requests_the_preceding_item() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "b", 10_000);
        carousel.prev();
        assert_eq!(drain_navigations(&rx), vec!["a"]);
        assert_eq!(carousel.direction(), Direction::Backward);
    }

    #[test]
    fn prev_wraps_from_first_to_last() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "a", 10_000);
        carousel.prev();
        assert_eq!(drain_navigations(&rx), vec!["c"]);
    }

    #[test]
    fn two_item_catalog_next_alternates_between_both() {
        // Catalog scenario: themes A and B; next goes A -> B, then wraps B -> A.
        let (mut carousel, rx) = carousel_with(&["A", "B"], "A", 10_000);
        let now = Instant::now();

        carousel.next();
        assert_eq!(drain_navigations(&rx), vec!["B"]);

        carousel.observe_current("B", None, now);
        carousel.next();
        assert_eq!(drain_navigations(&rx), vec!["A"]);
    }

    #[test]
    fn prev_request_carries_backward_even_on_a_two_ring() {
        // Shorter-path inference would call a -> b forward (tie); the
        // explicit prev direction must survive to the request.
        let (mut carousel, rx) = carousel_with(&["a", "b"], "a", 10_000);
        carousel.prev();
        let Ok(AppEvent::Carousel(CarouselEvent::NavigateRequested { id, direction })) =
            rx.try_recv()
        else {
            panic!("expected a navigation request");
        };
        assert_eq!(id, "b");
        assert_eq!(direction, Direction::Backward);
    }

    #[test]
    fn single_item_ring_degenerates_to_same_id_and_keeps_direction() {
        let (mut carousel, rx) = carousel_with(&["only"], "only", 10_000);
        carousel.prev(); // would set Backward on a larger ring
        assert_eq!(drain_navigations(&rx), vec!["only"]);
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    // ── direction inference ──────────────────────────────────────────────────

    #[test]
    fn observing_a_forward_neighbor_infers_forward() {
        let (mut carousel, _rx) = carousel_with(&["a", "b", "c"], "a", 10_000);
        carousel.observe_current("b", None, Instant::now());
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    #[test]
    fn observing_a_backward_neighbor_infers_backward() {
        let (mut carousel, _rx) = carousel_with(&["a", "b", "c"], "b", 10_000);
        carousel.observe_current("a", None, Instant::now());
        assert_eq!(carousel.direction(), Direction::Backward);
    }

    #[test]
    fn wraparound_jump_takes_the_shorter_path() {
        // a -> c on a three-ring: backward distance 1 beats forward distance 2.
        let (mut carousel, _rx) = carousel_with(&["a", "b", "c"], "a", 10_000);
        carousel.observe_current("c", None, Instant::now());
        assert_eq!(carousel.direction(), Direction::Backward);
    }

    #[test]
    fn equidistant_jump_favors_forward() {
        // a -> c on a four-ring: both distances are 2.
        let (mut carousel, _rx) = carousel_with(&["a", "b", "c", "d"], "a", 10_000);
        carousel.observe_current("c", None, Instant::now());
        assert_eq!(carousel.direction(), Direction::Forward);
    }

    #[test]
    fn observing_with_committed_direction_skips_inference() {
        // a -> b on a two-ring: inference would pick the forward tie, but
        // the committed direction wins.
        let (mut carousel, _rx) = carousel_with(&["a", "b"], "a", 10_000);
        carousel.observe_current("b", Some(Direction::Backward), Instant::now());
        assert_eq!(carousel.direction(), Direction::Backward);
    }

    #[test]
    fn observing_resets_progress() {
        let (mut carousel, _rx) = carousel_with(&["a", "b"], "a", 1_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0);
        carousel.tick(t0 + Duration::from_millis(500));
        assert!(carousel.progress() > 0.0);

        carousel.observe_current("b", None, t0 + Duration::from_millis(500));
        assert_eq!(carousel.progress(), 0.0);
    }

    // ── auto-advance ─────────────────────────────────────────────────────────

    #[test]
    fn toggle_enables_auto_play_and_resets_progress() {
        let (mut carousel, _rx) = carousel_with(&["a", "b"], "a", 10_000);
        carousel.toggle_auto_play(Instant::now());
        assert!(carousel.auto_play());
        assert_eq!(carousel.progress(), 0.0);
    }

    #[test]
    fn auto_advance_fires_navigation_at_slide_duration() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "a", 5_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0);

        carousel.tick(t0 + Duration::from_millis(4_999));
        assert!(drain_navigations(&rx).is_empty());

        carousel.tick(t0 + Duration::from_millis(5_000));
        assert_eq!(drain_navigations(&rx), vec!["b"]);
    }

    #[test]
    fn auto_advance_is_one_shot_until_observation_rearms_it() {
        let (mut carousel, rx) = carousel_with(&["a", "b"], "a", 1_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0);

        carousel.tick(t0 + Duration::from_millis(1_000));
        carousel.tick(t0 + Duration::from_millis(3_000));
        assert_eq!(drain_navigations(&rx).len(), 1, "deadline fires once");

        // Host commits the navigation; the deadline re-arms.
        carousel.observe_current("b", None, t0 + Duration::from_millis(3_000));
        carousel.tick(t0 + Duration::from_millis(4_000));
        assert_eq!(drain_navigations(&rx), vec!["a"]);
    }

    #[test]
    fn progress_is_monotonic_and_saturates_at_hundred() {
        let (mut carousel, _rx) = carousel_with(&["a", "b"], "a", 1_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0);

        let mut last = 0.0;
        for ms in [0u64, 100, 250, 500, 900, 1_000, 1_500, 10_000] {
            carousel.tick(t0 + Duration::from_millis(ms));
            assert!(carousel.progress() >= last, "progress must not decrease");
            assert!(carousel.progress() <= 100.0, "progress must not exceed 100");
            last = carousel.progress();
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn progress_reflects_elapsed_fraction() {
        let (mut carousel, _rx) = carousel_with(&["a", "b"], "a", 10_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0);
        carousel.tick(t0 + Duration::from_millis(5_000));
        assert!((carousel.progress() - 50.0).abs() < 1.0);
    }

    #[test]
    fn toggling_off_cancels_pending_deadlines() {
        let (mut carousel, rx) = carousel_with(&["a", "b"], "a", 1_000);
        let t0 = Instant::now();
        carousel.toggle_auto_play(t0); // on
        carousel.toggle_auto_play(t0 + Duration::from_millis(500)); // off

        // Well past the slide duration: nothing may fire.
        carousel.tick(t0 + Duration::from_millis(5_000));
        assert!(drain_navigations(&rx).is_empty());
        assert!(!carousel.auto_play());
        assert_eq!(carousel.progress(), 0.0);
    }

    #[test]
    fn unknown_current_id_falls_back_to_first_item() {
        let (mut carousel, rx) = carousel_with(&["a", "b", "c"], "missing", 10_000);
        carousel.next();
        // index_of falls back to 0, so next resolves relative to "a".
        assert_eq!(drain_navigations(&rx), vec!["b"]);
    }
}
