use crate::core::models::Direction;
use std::time::{Duration, Instant};

/// Drag distance (gesture points) beyond which a release commits.
pub const COMMIT_DISTANCE: f32 = 60.0;
/// Release velocity (points per millisecond) beyond which a release commits.
pub const COMMIT_VELOCITY: f32 = 0.3;
/// Slide-out animation length for a committed navigation.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(280);
/// Return-to-center animation length for an uncommitted release.
pub const SNAP_BACK_DURATION: Duration = Duration::from_millis(200);

/// Decision taken when a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Commit to the next item.
    Next,
    /// Commit to the previous item.
    Prev,
    /// Not enough distance or speed: animate back to center, no navigation.
    SnapBack,
}

struct Transition {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    // Navigation payload delivered when the slide-out completes.
    // None for a snap-back.
    target: Option<String>,
    direction: Direction,
}

impl Transition {
    fn offset_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

enum Phase {
    Idle,
    Dragging {
        start_x: f32,
        last_x: f32,
        started: Instant,
    },
    Animating(Transition),
}

/// Turns horizontal drag gestures into committed navigations or snap-backs
/// and keeps the strip offset in sync with both gesture-driven and
/// programmatic navigation.
///
/// A committed navigation is a two-phase handshake: the strip animates
/// fully off-screen, and only on completion does `tick` hand the pending
/// target back to the host, resetting the base offset in the same pass so
/// the new center item appears already centered (animate-then-jump).
/// Exactly one visual transition plays per logical navigation, and while
/// one is in flight all new gesture and programmatic input is ignored.
pub struct SwipeController {
    phase: Phase,
}

impl SwipeController {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// True while a slide-out or snap-back animation is running.
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::Animating(_))
    }

    /// Current visual offset of the strip from center, in gesture points.
    pub fn offset(&self) -> f32 {
        match &self.phase {
            Phase::Idle => 0.0,
            Phase::Dragging {
                start_x, last_x, ..
            } => last_x - start_x,
            Phase::Animating(transition) => transition.offset_at(Instant::now()),
        }
    }

    /// Begin tracking a drag. Ignored while a transition is in flight.
    pub fn drag_start(&mut self, x: f32, now: Instant) {
        if let Phase::Idle = self.phase {
            self.phase = Phase::Dragging {
                start_x: x,
                last_x: x,
                started: now,
            };
        }
    }

    /// Track the finger. The returned offset is the raw delta, applied with
    /// no easing so the strip follows with zero latency.
    pub fn drag_move(&mut self, x: f32) -> Option<f32> {
        if let Phase::Dragging {
            start_x, last_x, ..
        } = &mut self.phase
        {
            *last_x = x;
            Some(*last_x - *start_x)
        } else {
            None
        }
    }

    /// Release the drag and decide the outcome. On `SnapBack` the controller
    /// starts the return animation itself; on a commit the caller pauses
    /// audio and hands the target id to `begin_transition`, which continues
    /// the motion from the release offset.
    pub fn drag_end(&mut self, x: f32, now: Instant) -> Option<SwipeOutcome> {
        let Phase::Dragging {
            start_x,
            last_x,
            started,
        } = &mut self.phase
        else {
            return None;
        };

        // The release coordinate is authoritative: a commit keeps this
        // offset so the slide-out continues from where the finger left.
        *last_x = x;
        let delta = x - *start_x;
        let elapsed_ms = now.saturating_duration_since(*started).as_millis().max(1) as f32;
        let velocity = delta / elapsed_ms;

        let outcome = if delta < -COMMIT_DISTANCE || velocity < -COMMIT_VELOCITY {
            SwipeOutcome::Next
        } else if delta > COMMIT_DISTANCE || velocity > COMMIT_VELOCITY {
            SwipeOutcome::Prev
        } else {
            SwipeOutcome::SnapBack
        };

        match outcome {
            SwipeOutcome::SnapBack => {
                self.phase = Phase::Animating(Transition {
                    from: delta,
                    to: 0.0,
                    started: now,
                    duration: SNAP_BACK_DURATION,
                    target: None,
                    direction: Direction::Forward,
                });
            }
            // Keep the drag offset; begin_transition continues from it.
            SwipeOutcome::Next | SwipeOutcome::Prev => {}
        }

        Some(outcome)
    }

    /// Start the slide-out toward `direction`, delivering `target` when the
    /// animation completes. Used identically by committed swipes and by
    /// programmatic navigation (buttons, auto-advance) so the two are
    /// visually indistinguishable. Returns false while already in flight.
    pub fn begin_transition(
        &mut self,
        direction: Direction,
        strip_width: f32,
        target: String,
        now: Instant,
    ) -> bool {
        if self.in_flight() {
            return false;
        }
        let from = self.offset();
        self.phase = Phase::Animating(Transition {
            from,
            to: direction.sign() * strip_width,
            started: now,
            duration: TRANSITION_DURATION,
            target: Some(target),
            direction,
        });
        true
    }

    /// Advance the animation clock. When a slide-out completes, returns the
    /// pending target id with its committed direction and resets the strip
    /// to center with no animation; the caller must apply the navigation in
    /// the same pass.
    pub fn tick(&mut self, now: Instant) -> Option<(String, Direction)> {
        let Phase::Animating(transition) = &self.phase else {
            return None;
        };
        if !transition.finished(now) {
            return None;
        }
        let commit = transition
            .target
            .clone()
            .map(|id| (id, transition.direction));
        self.phase = Phase::Idle;
        commit
    }
}

impl Default for SwipeController {
    fn default() -> Self {
        Self::new()
    }
}
