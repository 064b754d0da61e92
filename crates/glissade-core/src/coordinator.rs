#![forbid(unsafe_code)]

//! Trigger coordinator: serializes clicks, swipes, timer fires, resizes, and
//! completion signals against one [`PositionEngine`].
//!
//! # State Machine
//!
//! - **Idle**: the engine is not busy. Any trigger is evaluated.
//! - **Animating**: a transition tagged with a [`MoveGeneration`] is in
//!   flight. Navigation triggers are dropped, not queued. The only way back
//!   to Idle is [`Carousel::on_transition_end`] with the in-flight generation.
//!
//! On Animating → Idle the coordinator finalizes the move, clears transition
//! styling, refreshes the button cues, and re-arms the auto-advance timer if
//! auto-advance is enabled and no manual gesture has happened.
//!
//! # Invariants
//!
//! 1. Every handler runs to completion synchronously; nothing yields while a
//!    transition is being committed.
//! 2. At most one timer token is armed. Any committed move disarms it.
//! 3. Manual navigation and touch start set the manual override and cancel
//!    the armed timer before the request is evaluated.
//! 4. A completion signal commits at most once per generation; duplicates
//!    and stale generations are ignored.
//! 5. No handler returns an error. Collaborator failures are logged and the
//!    position state stays consistent.
//!
//! # Failure Modes
//!
//! - Geometry measurement fails on construction: the carousel stays static
//!   (no spare slides) until a resize measures successfully.
//! - Geometry measurement fails on resize: previous geometry is kept.
//! - The style applier fails to start a transition: the move is finalized
//!   at once so the busy flag cannot wedge.
//! - A transition with zero delay and zero duration never produces a
//!   completion event in a browser, so it is finalized synchronously.

use core::fmt;

use tracing::{debug, debug_span, trace, warn};

use crate::auto_advance::{AutoAdvance, TimerToken};
use crate::config::CarouselConfig;
use crate::geometry::SlideGeometry;
use crate::host::{ButtonIndicator, CarouselHost, GeometryProvider, StyleApplier, TimerScheduler};
use crate::position::{Direction, MoveResult, PositionEngine, Rejection};
use crate::swipe::SwipeTracker;
use crate::transition::{MoveGeneration, Transition};

/// Why a trigger produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// A transition is in flight.
    Busy,
    /// Already at the first slide.
    AtStart,
    /// Already at the last reachable slide.
    AtEnd,
    /// Completion for a generation that is not in flight.
    StaleCompletion,
    /// Timer fire for a token that is not armed.
    StaleTimer,
    /// A manual gesture has suppressed auto-advance.
    ManualOverride,
    /// Touch start with more than one finger.
    MultiTouch,
    /// Swipe displacement did not pass half a slide width.
    BelowThreshold,
    /// Geometry could not be measured or was invalid.
    MeasurementFailed,
    /// The carousel was torn down.
    TornDown,
}

impl IgnoreReason {
    /// Short, stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::AtStart => "at_start",
            Self::AtEnd => "at_end",
            Self::StaleCompletion => "stale_completion",
            Self::StaleTimer => "stale_timer",
            Self::ManualOverride => "manual_override",
            Self::MultiTouch => "multi_touch",
            Self::BelowThreshold => "below_threshold",
            Self::MeasurementFailed => "measurement_failed",
            Self::TornDown => "torn_down",
        }
    }
}

impl From<Rejection> for IgnoreReason {
    fn from(r: Rejection) -> Self {
        match r {
            Rejection::Busy => Self::Busy,
            Rejection::AtStart => Self::AtStart,
            Rejection::AtEnd => Self::AtEnd,
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a trigger handler did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    /// A transition was committed and handed to the style applier.
    Started(Transition),
    /// A move committed and finished synchronously.
    Completed {
        /// Generation that finished.
        generation: MoveGeneration,
        /// Committed offset (px).
        offset_px: f64,
    },
    /// Style application failed; the move was committed without animation.
    Snapped {
        /// Committed offset (px).
        offset_px: f64,
    },
    /// A single-finger touch is now tracked.
    Tracking,
    /// Geometry was re-measured.
    Remeasured {
        /// Spare count under the new geometry.
        spare_count: u32,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl TriggerOutcome {
    /// `true` if a move was committed by this trigger.
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(
            self,
            Self::Started(_) | Self::Completed { .. } | Self::Snapped { .. }
        )
    }
}

/// Point-in-time view of the coordinator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSnapshot {
    /// Slides advanced so far.
    pub advanced_count: u32,
    /// Maximum legal advanced count.
    pub spare_count: u32,
    /// Committed offset (px).
    pub current_offset: f64,
    /// A transition is in flight.
    pub busy: bool,
    /// Generation of the in-flight transition.
    pub in_flight: Option<MoveGeneration>,
    /// Armed auto-advance token.
    pub timer_armed: Option<TimerToken>,
    /// A manual gesture has occurred.
    pub manual_override: bool,
    /// A touch contact is being tracked.
    pub tracking_touch: bool,
}

/// A carousel instance bound to a host environment.
pub struct Carousel<H: CarouselHost> {
    host: H,
    config: CarouselConfig,
    engine: PositionEngine,
    auto: AutoAdvance,
    swipe: SwipeTracker,
    generation: MoveGeneration,
    in_flight: Option<MoveGeneration>,
    torn_down: bool,
}

impl<H: CarouselHost> fmt::Debug for Carousel<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("engine", &self.engine)
            .field("auto", &self.auto)
            .field("in_flight", &self.in_flight)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<H: CarouselHost> Carousel<H> {
    /// Measure the layout, push the initial button state, and arm the
    /// auto-advance timer when enabled.
    pub fn new(mut host: H, config: CarouselConfig) -> Self {
        for problem in config.validate() {
            warn!(%problem, "carousel config out of range");
        }

        let engine = match measure(&mut host) {
            Ok(geometry) => match PositionEngine::new(&geometry) {
                Ok(engine) => engine,
                Err(error) => {
                    warn!(%error, "initial geometry invalid; carousel stays static");
                    PositionEngine::unmeasured()
                }
            },
            Err(error) => {
                warn!(%error, "initial geometry measurement failed; carousel stays static");
                PositionEngine::unmeasured()
            }
        };

        let auto = AutoAdvance::new(config.auto_slide, config.delay_duration());
        let mut carousel = Self {
            host,
            config,
            engine,
            auto,
            swipe: SwipeTracker::new(),
            generation: MoveGeneration::default(),
            in_flight: None,
            torn_down: false,
        };
        debug!(
            spare_count = carousel.engine.spare_count(),
            slide_width = carousel.engine.slide_width(),
            auto_slide = carousel.auto.enabled(),
            "carousel initialized"
        );
        carousel.refresh_buttons();
        carousel.arm_timer();
        carousel
    }

    /// Slides advanced so far.
    #[must_use]
    pub const fn advanced_count(&self) -> u32 {
        self.engine.advanced_count()
    }

    /// Options the carousel was built with.
    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Read-only access to the position engine.
    #[must_use]
    pub const fn engine(&self) -> &PositionEngine {
        &self.engine
    }

    /// Borrow the host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Generation of the transition in flight, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<MoveGeneration> {
        self.in_flight
    }

    /// `true` once [`teardown`](Self::teardown) has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            advanced_count: self.engine.advanced_count(),
            spare_count: self.engine.spare_count(),
            current_offset: self.engine.current_offset(),
            busy: self.engine.is_busy(),
            in_flight: self.in_flight,
            timer_armed: self.auto.armed(),
            manual_override: self.auto.manual_override(),
            tracking_touch: self.swipe.is_active(),
        }
    }

    // -----------------------------------------------------------------------
    // Manual navigation
    // -----------------------------------------------------------------------

    /// Forward button or programmatic advance.
    pub fn next(&mut self) -> TriggerOutcome {
        self.navigate(Direction::Forward)
    }

    /// Backward button or programmatic retreat.
    pub fn previous(&mut self) -> TriggerOutcome {
        self.navigate(Direction::Backward)
    }

    /// Manual move in `direction`.
    ///
    /// Sets the manual override and cancels the armed timer before the
    /// request reaches the engine.
    pub fn navigate(&mut self, direction: Direction) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("navigate", IgnoreReason::TornDown);
        }
        self.auto.set_manual_override();
        self.cancel_timer();
        let result = self.engine.request_move(direction);
        self.commit(result, direction)
    }

    // -----------------------------------------------------------------------
    // Touch
    // -----------------------------------------------------------------------

    /// Touch start with `touch_count` active contacts; `x` is the first
    /// contact's horizontal client position.
    pub fn on_touch_start(&mut self, touch_count: usize, x: f64) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("touch_start", IgnoreReason::TornDown);
        }
        if !self.swipe.touch_start(touch_count, x) {
            return self.ignore("touch_start", IgnoreReason::MultiTouch);
        }
        self.auto.set_manual_override();
        self.cancel_timer();
        TriggerOutcome::Tracking
    }

    /// Touch move. Returns `true` if the host should prevent default scrolling.
    pub fn on_touch_move(&mut self, touch_count: usize, x: f64) -> bool {
        if self.torn_down {
            return false;
        }
        self.swipe.touch_move(touch_count, x)
    }

    /// Touch end: classify the swipe and request the move.
    pub fn on_touch_end(&mut self) -> TriggerOutcome {
        let direction = self.swipe.touch_end(self.engine.slide_width());
        self.finish_swipe(direction)
    }

    /// Touch cancel: classified the same way as an end.
    pub fn on_touch_cancel(&mut self) -> TriggerOutcome {
        let direction = self.swipe.touch_cancel(self.engine.slide_width());
        self.finish_swipe(direction)
    }

    fn finish_swipe(&mut self, direction: Option<Direction>) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("touch_end", IgnoreReason::TornDown);
        }
        match direction {
            Some(direction) => {
                self.cancel_timer();
                let result = self.engine.request_move(direction);
                self.commit(result, direction)
            }
            None => self.ignore("touch_end", IgnoreReason::BelowThreshold),
        }
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    /// Auto-advance fire for `token`.
    ///
    /// Advances while there are spare slides, otherwise snaps back to the
    /// start. If neither commits a transition the timer is re-armed.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("timer", IgnoreReason::TornDown);
        }
        if !self.auto.claim(token) {
            return self.ignore("timer", IgnoreReason::StaleTimer);
        }
        if self.auto.manual_override() {
            return self.ignore("timer", IgnoreReason::ManualOverride);
        }
        if self.engine.is_busy() {
            return self.ignore("timer", IgnoreReason::Busy);
        }

        let outcome = if self.engine.can_go_forward() {
            let result = self.engine.request_move(Direction::Forward);
            self.commit(result, Direction::Forward)
        } else {
            let result = self.engine.reset();
            self.commit(result, Direction::Backward)
        };
        if matches!(outcome, TriggerOutcome::Ignored(_)) {
            self.arm_timer();
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Completion + resize
    // -----------------------------------------------------------------------

    /// Animation-completion signal for `generation`.
    ///
    /// The first signal for the in-flight generation commits; every other
    /// signal is ignored.
    pub fn on_transition_end(&mut self, generation: MoveGeneration) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("transition_end", IgnoreReason::TornDown);
        }
        if self.in_flight != Some(generation) {
            return self.ignore("transition_end", IgnoreReason::StaleCompletion);
        }
        self.in_flight = None;
        let offset_px = self.engine.finalize_move().unwrap_or(self.engine.current_offset());
        trace!(%generation, offset_px, "transition complete");
        self.settle();
        TriggerOutcome::Completed {
            generation,
            offset_px,
        }
    }

    /// Re-measure layout after a resize.
    ///
    /// Never moves and never clears the busy flag.
    pub fn on_resize(&mut self) -> TriggerOutcome {
        if self.torn_down {
            return self.ignore("resize", IgnoreReason::TornDown);
        }
        let _span = debug_span!("carousel.resize").entered();
        let geometry = match measure(&mut self.host) {
            Ok(geometry) => geometry,
            Err(error) => {
                warn!(%error, "geometry measurement failed; keeping previous geometry");
                return TriggerOutcome::Ignored(IgnoreReason::MeasurementFailed);
            }
        };
        if let Err(error) = self.engine.recompute_geometry(&geometry) {
            warn!(%error, "measured geometry invalid; keeping previous geometry");
            return TriggerOutcome::Ignored(IgnoreReason::MeasurementFailed);
        }
        let spare_count = self.engine.spare_count();
        debug!(spare_count, slide_width = geometry.slide_width, "geometry recomputed");
        if !self.engine.is_busy() {
            self.refresh_buttons();
        }
        TriggerOutcome::Remeasured { spare_count }
    }

    /// Cancel the armed timer and stop reacting to triggers.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_timer();
        self.swipe.reset();
        self.torn_down = true;
        debug!("carousel torn down");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn commit(&mut self, result: MoveResult, direction: Direction) -> TriggerOutcome {
        let pending = match result {
            MoveResult::Committed(pending) => pending,
            MoveResult::NoOp(rejection) => {
                trace!(%direction, reason = rejection.as_str(), "move rejected");
                return TriggerOutcome::Ignored(rejection.into());
            }
        };

        self.cancel_timer();
        self.generation = self.generation.next();
        let transition = Transition {
            generation: self.generation,
            offset_px: pending.offset_px,
            delay: pending.delay,
            rate: self.config.rate_duration(),
        };
        self.in_flight = Some(transition.generation);

        if let Err(error) = self.host.style().apply(&transition) {
            warn!(%error, %direction, generation = %transition.generation, "transition failed to start; snapping");
            self.in_flight = None;
            let offset_px = self.engine.finalize_move().unwrap_or(self.engine.current_offset());
            self.settle();
            return TriggerOutcome::Snapped { offset_px };
        }

        debug!(
            %direction,
            offset_px = transition.offset_px,
            generation = %transition.generation,
            advanced_count = pending.advanced_count,
            "move committed"
        );

        if transition.is_instant() {
            return self.on_transition_end(transition.generation);
        }
        TriggerOutcome::Started(transition)
    }

    fn settle(&mut self) {
        if let Err(error) = self.host.style().clear() {
            warn!(%error, "failed to clear transition styling");
        }
        self.refresh_buttons();
        self.arm_timer();
    }

    fn refresh_buttons(&mut self) {
        let forward = self.engine.can_go_forward();
        let backward = self.engine.can_go_backward();
        self.host.buttons().update(forward, backward);
    }

    fn arm_timer(&mut self) {
        if self.torn_down || !self.auto.should_rearm() {
            return;
        }
        let (token, previous) = self.auto.arm();
        if let Some(previous) = previous {
            self.host.timers().cancel(previous);
        }
        let delay = self.auto.delay();
        self.host.timers().schedule(token, delay);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        trace!(%token, delay_ms, "auto-advance armed");
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.auto.take_armed() {
            self.host.timers().cancel(token);
            trace!(%token, "auto-advance cancelled");
        }
    }

    fn ignore(&self, trigger: &'static str, reason: IgnoreReason) -> TriggerOutcome {
        trace!(trigger, %reason, "trigger ignored");
        TriggerOutcome::Ignored(reason)
    }
}

fn measure<H: CarouselHost>(host: &mut H) -> Result<SlideGeometry, String> {
    host.geometry().measure().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoButtons;
    use core::time::Duration;

    #[derive(Debug, Default)]
    struct FixedGeometry(Option<SlideGeometry>);

    impl GeometryProvider for FixedGeometry {
        type Error = &'static str;

        fn measure(&mut self) -> Result<SlideGeometry, Self::Error> {
            self.0.ok_or("no layout")
        }
    }

    #[derive(Debug, Default)]
    struct Styles {
        applied: Vec<Transition>,
        clears: usize,
        fail: bool,
    }

    impl StyleApplier for Styles {
        type Error = &'static str;

        fn apply(&mut self, transition: &Transition) -> Result<(), Self::Error> {
            if self.fail {
                return Err("detached");
            }
            self.applied.push(*transition);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.clears += 1;
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Timers {
        scheduled: Vec<(TimerToken, Duration)>,
        cancelled: Vec<TimerToken>,
    }

    impl TimerScheduler for Timers {
        fn schedule(&mut self, token: TimerToken, delay: Duration) {
            self.scheduled.push((token, delay));
        }

        fn cancel(&mut self, token: TimerToken) {
            self.cancelled.push(token);
        }
    }

    #[derive(Debug, Default)]
    struct Host {
        geometry: FixedGeometry,
        styles: Styles,
        buttons: NoButtons,
        timers: Timers,
    }

    impl CarouselHost for Host {
        type Geometry = FixedGeometry;
        type Style = Styles;
        type Buttons = NoButtons;
        type Timers = Timers;

        fn geometry(&mut self) -> &mut FixedGeometry {
            &mut self.geometry
        }
        fn style(&mut self) -> &mut Styles {
            &mut self.styles
        }
        fn buttons(&mut self) -> &mut NoButtons {
            &mut self.buttons
        }
        fn timers(&mut self) -> &mut Timers {
            &mut self.timers
        }
    }

    fn carousel(config: CarouselConfig) -> Carousel<Host> {
        let host = Host {
            geometry: FixedGeometry(Some(SlideGeometry::new(100.0, 100.0, 4))),
            ..Host::default()
        };
        Carousel::new(host, config)
    }

    fn started(outcome: TriggerOutcome) -> Transition {
        match outcome {
            TriggerOutcome::Started(t) => t,
            other => panic!("expected Started, got {other:?}"),
        }
    }

    #[test]
    fn next_starts_transition_with_configured_rate() {
        let mut c = carousel(CarouselConfig::default().with_rate(0.3));
        let t = started(c.next());
        assert_eq!(t.offset_px, -100.0);
        assert_eq!(t.rate, Duration::from_millis(300));
        assert_eq!(t.delay, Duration::ZERO);
        assert!(c.snapshot().busy);
    }

    #[test]
    fn busy_drops_navigation() {
        let mut c = carousel(CarouselConfig::default());
        c.next();
        assert_eq!(c.next(), TriggerOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(c.previous(), TriggerOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(c.advanced_count(), 1);
        assert_eq!(c.host().styles.applied.len(), 1);
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut c = carousel(CarouselConfig::default());
        let t = started(c.next());
        assert!(matches!(c.on_transition_end(t.generation), TriggerOutcome::Completed { .. }));
        assert_eq!(
            c.on_transition_end(t.generation),
            TriggerOutcome::Ignored(IgnoreReason::StaleCompletion)
        );
        assert_eq!(c.host().styles.clears, 1);
        assert_eq!(c.engine().current_offset(), -100.0);
    }

    #[test]
    fn style_failure_snaps_instead_of_wedging() {
        let mut c = carousel(CarouselConfig::default());
        c.host_mut().styles.fail = true;
        assert_eq!(c.next(), TriggerOutcome::Snapped { offset_px: -100.0 });
        assert!(!c.snapshot().busy);
        assert_eq!(c.snapshot().in_flight, None);
    }

    #[test]
    fn zero_rate_completes_synchronously() {
        let mut c = carousel(CarouselConfig::default().with_rate(0.0));
        assert!(matches!(c.next(), TriggerOutcome::Completed { offset_px, .. } if offset_px == -100.0));
        assert!(!c.snapshot().busy);
    }

    #[test]
    fn auto_slide_arms_on_construction() {
        let c = carousel(CarouselConfig::default().with_auto_slide(true));
        assert_eq!(c.host().timers.scheduled.len(), 1);
        assert_eq!(c.host().timers.scheduled[0].1, Duration::from_secs(5));
        assert!(c.snapshot().timer_armed.is_some());
    }

    #[test]
    fn largest_delay_is_scheduled_unchanged() {
        let c = carousel(
            CarouselConfig::default()
                .with_auto_slide(true)
                .with_delay_between_slides(u64::MAX),
        );
        assert_eq!(c.host().timers.scheduled[0].1, Duration::from_millis(u64::MAX));
    }

    #[test]
    fn failed_initial_measure_leaves_static_carousel() {
        let mut c = Carousel::new(Host::default(), CarouselConfig::default());
        assert_eq!(c.next(), TriggerOutcome::Ignored(IgnoreReason::AtEnd));
        assert_eq!(c.snapshot().spare_count, 0);
    }

    #[test]
    fn teardown_cancels_timer_and_ignores_triggers() {
        let mut c = carousel(CarouselConfig::default().with_auto_slide(true));
        let token = c.snapshot().timer_armed.expect("armed");
        c.teardown();
        assert_eq!(c.host().timers.cancelled, vec![token]);
        assert_eq!(c.next(), TriggerOutcome::Ignored(IgnoreReason::TornDown));
        assert_eq!(c.on_timer_fired(token), TriggerOutcome::Ignored(IgnoreReason::TornDown));
        assert!(c.is_torn_down());
    }
}
