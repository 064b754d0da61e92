#![forbid(unsafe_code)]

//! Collaborator traits: the boundary between the coordinator and the
//! environment that measures layout, writes styles, shows button cues, and
//! runs timers.
//!
//! The browser adapter lives in `glissade-web`; the deterministic test host
//! lives in `glissade-harness`. The coordinator never talks to the DOM
//! directly, all of it flows through these traits.

use core::time::Duration;

use crate::auto_advance::TimerToken;
use crate::geometry::SlideGeometry;
use crate::transition::Transition;

/// Supplies slide, frame, and button widths on demand.
pub trait GeometryProvider {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Measure the current layout.
    fn measure(&mut self) -> Result<SlideGeometry, Self::Error>;
}

/// Writes the container's horizontal-margin transition.
pub trait StyleApplier {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Start a linear transition of the container margin to `transition.offset_px`.
    fn apply(&mut self, transition: &Transition) -> Result<(), Self::Error>;

    /// Remove transition styling so the next transition re-fires.
    ///
    /// The committed margin offset stays in place.
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Toggles the disabled cue on the navigation controls.
///
/// Implementations without controls make this a no-op.
pub trait ButtonIndicator {
    /// Reflect which directions are currently reachable.
    fn update(&mut self, can_go_forward: bool, can_go_backward: bool);
}

/// One-shot timer scheduling.
///
/// The host calls back into
/// [`Carousel::on_timer_fired`](crate::coordinator::Carousel::on_timer_fired)
/// with the same token once `delay` has elapsed.
pub trait TimerScheduler {
    /// Schedule a fire for `token` after `delay`.
    fn schedule(&mut self, token: TimerToken, delay: Duration);

    /// Cancel a scheduled fire. Cancelling an unknown token is a no-op.
    fn cancel(&mut self, token: TimerToken);
}

/// Unified host combining every collaborator.
///
/// [`Carousel`](crate::coordinator::Carousel) is generic over this trait.
pub trait CarouselHost {
    /// Layout measurement.
    type Geometry: GeometryProvider;

    /// Container style writer.
    type Style: StyleApplier;

    /// Button cue updater.
    type Buttons: ButtonIndicator;

    /// Timer scheduler.
    type Timers: TimerScheduler;

    /// Access the geometry provider.
    fn geometry(&mut self) -> &mut Self::Geometry;

    /// Access the style applier.
    fn style(&mut self) -> &mut Self::Style;

    /// Access the button updater.
    fn buttons(&mut self) -> &mut Self::Buttons;

    /// Access the timer scheduler.
    fn timers(&mut self) -> &mut Self::Timers;
}

/// [`ButtonIndicator`] for carousels with no controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoButtons;

impl ButtonIndicator for NoButtons {
    fn update(&mut self, _can_go_forward: bool, _can_go_backward: bool) {}
}
