#![forbid(unsafe_code)]

//! Scenario driver over a [`RecordingHost`].
//!
//! [`Rig`] plays the part of the browser: it delivers completion signals for
//! the transition in flight and fires timers as virtual time advances.

use core::time::Duration;

use glissade_core::{Carousel, CarouselConfig, CarouselSnapshot, SlideGeometry, TriggerOutcome};

use crate::host::RecordingHost;

/// A carousel bound to a recording host.
#[derive(Debug)]
pub struct Rig {
    carousel: Carousel<RecordingHost>,
}

impl Rig {
    /// Build a carousel over `geometry` with `config`.
    #[must_use]
    pub fn new(geometry: SlideGeometry, config: CarouselConfig) -> Self {
        Self::with_host(RecordingHost::new(geometry), config)
    }

    /// Build a carousel over a prepared host.
    #[must_use]
    pub fn with_host(host: RecordingHost, config: CarouselConfig) -> Self {
        Self {
            carousel: Carousel::new(host, config),
        }
    }

    /// `slide_width` px slides, a frame showing one slide, and
    /// `spare + 1` slides in total.
    #[must_use]
    pub fn single_visible(slide_width: f64, spare: u32, config: CarouselConfig) -> Self {
        Self::new(SlideGeometry::new(slide_width, slide_width, spare + 1), config)
    }

    /// The carousel under test.
    pub fn carousel(&mut self) -> &mut Carousel<RecordingHost> {
        &mut self.carousel
    }

    /// The recording host.
    #[must_use]
    pub fn host(&self) -> &RecordingHost {
        self.carousel.host()
    }

    /// Mutable access to the recording host.
    pub fn host_mut(&mut self) -> &mut RecordingHost {
        self.carousel.host_mut()
    }

    /// Current coordinator state.
    #[must_use]
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.carousel.snapshot()
    }

    /// Deliver the completion signal for the transition in flight.
    ///
    /// Returns `None` when nothing is in flight.
    pub fn complete(&mut self) -> Option<TriggerOutcome> {
        let generation = self.carousel.in_flight()?;
        Some(self.carousel.on_transition_end(generation))
    }

    /// Deliver the in-flight completion `times` times in a row, the way a
    /// browser raising prefixed and unprefixed events does.
    pub fn complete_repeatedly(&mut self, times: usize) -> Vec<TriggerOutcome> {
        let Some(generation) = self.carousel.in_flight() else {
            return Vec::new();
        };
        (0..times)
            .map(|_| self.carousel.on_transition_end(generation))
            .collect()
    }

    /// Advance virtual time, firing every timer that comes due.
    pub fn advance(&mut self, dt: Duration) -> Vec<TriggerOutcome> {
        let due = self.carousel.host_mut().timers.advance(dt);
        due.into_iter()
            .map(|token| self.carousel.on_timer_fired(token))
            .collect()
    }

    /// Run one auto-advance cycle: wait out the delay, then complete the
    /// resulting transition if one started.
    pub fn auto_cycle(&mut self) -> Vec<TriggerOutcome> {
        let delay = self.carousel.config().delay_duration();
        let mut outcomes = self.advance(delay);
        if let Some(done) = self.complete() {
            outcomes.push(done);
        }
        outcomes
    }

    /// Perform a single-finger swipe from `from_x` to `to_x`.
    pub fn swipe(&mut self, from_x: f64, to_x: f64) -> TriggerOutcome {
        self.carousel.on_touch_start(1, from_x);
        self.carousel.on_touch_move(1, to_x);
        self.carousel.on_touch_end()
    }

    /// Move forward and complete the transition.
    pub fn step_forward(&mut self) -> TriggerOutcome {
        let outcome = self.carousel.next();
        self.complete();
        outcome
    }

    /// Move backward and complete the transition.
    pub fn step_backward(&mut self) -> TriggerOutcome {
        let outcome = self.carousel.previous();
        self.complete();
        outcome
    }
}
