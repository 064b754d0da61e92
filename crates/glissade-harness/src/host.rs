#![forbid(unsafe_code)]

//! Recording collaborators.
//!
//! Each piece implements one `glissade-core` host trait and records what the
//! coordinator asked of it. Time is virtual: [`ManualTimers`] only fires when
//! the test advances it.

use core::fmt;
use core::time::Duration;

use glissade_core::host::{
    ButtonIndicator, CarouselHost, GeometryProvider, StyleApplier, TimerScheduler,
};
use glissade_core::{SlideGeometry, TimerToken, Transition};

/// Failure injected by a scripted collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFault(pub &'static str);

impl fmt::Display for InjectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected fault: {}", self.0)
    }
}

impl std::error::Error for InjectedFault {}

/// Geometry provider whose answers the test controls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGeometry {
    current: Option<SlideGeometry>,
    fail_next: bool,
    measurements: usize,
}

impl ScriptedGeometry {
    /// Provider that reports `geometry` until changed.
    #[must_use]
    pub fn new(geometry: SlideGeometry) -> Self {
        Self {
            current: Some(geometry),
            ..Self::default()
        }
    }

    /// Provider with no layout; every measurement fails.
    #[must_use]
    pub fn unmeasurable() -> Self {
        Self::default()
    }

    /// Change what the next measurement reports.
    pub fn set(&mut self, geometry: SlideGeometry) {
        self.current = Some(geometry);
    }

    /// Make the next measurement fail once.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Number of measurements taken.
    #[must_use]
    pub const fn measurements(&self) -> usize {
        self.measurements
    }
}

impl GeometryProvider for ScriptedGeometry {
    type Error = InjectedFault;

    fn measure(&mut self) -> Result<SlideGeometry, Self::Error> {
        self.measurements += 1;
        if std::mem::take(&mut self.fail_next) {
            return Err(InjectedFault("layout query threw"));
        }
        self.current.ok_or(InjectedFault("no layout"))
    }
}

/// Style applier that records every transition.
#[derive(Debug, Clone, Default)]
pub struct RecordingStyle {
    applied: Vec<Transition>,
    clears: usize,
    fail_next: bool,
}

impl RecordingStyle {
    /// Transitions applied so far, oldest first.
    #[must_use]
    pub fn applied(&self) -> &[Transition] {
        &self.applied
    }

    /// Most recent transition.
    #[must_use]
    pub fn last(&self) -> Option<&Transition> {
        self.applied.last()
    }

    /// Number of times styling was cleared.
    #[must_use]
    pub const fn clears(&self) -> usize {
        self.clears
    }

    /// Make the next `apply` fail once.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }
}

impl StyleApplier for RecordingStyle {
    type Error = InjectedFault;

    fn apply(&mut self, transition: &Transition) -> Result<(), Self::Error> {
        if std::mem::take(&mut self.fail_next) {
            return Err(InjectedFault("container detached"));
        }
        self.applied.push(*transition);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.clears += 1;
        Ok(())
    }
}

/// Button updater that remembers the latest cue.
#[derive(Debug, Clone, Default)]
pub struct RecordingButtons {
    last: Option<(bool, bool)>,
    updates: usize,
}

impl RecordingButtons {
    /// Latest `(can_go_forward, can_go_backward)`.
    #[must_use]
    pub const fn last(&self) -> Option<(bool, bool)> {
        self.last
    }

    /// Number of updates received.
    #[must_use]
    pub const fn updates(&self) -> usize {
        self.updates
    }
}

impl ButtonIndicator for RecordingButtons {
    fn update(&mut self, can_go_forward: bool, can_go_backward: bool) {
        self.last = Some((can_go_forward, can_go_backward));
        self.updates += 1;
    }
}

/// Timer scheduler driven by a virtual clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimers {
    now: Duration,
    pending: Vec<(TimerToken, Duration)>,
    scheduled: usize,
    cancelled: Vec<TimerToken>,
}

impl ManualTimers {
    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Tokens still waiting to fire with their due times.
    #[must_use]
    pub fn pending(&self) -> &[(TimerToken, Duration)] {
        &self.pending
    }

    /// Tokens cancelled so far, oldest first.
    #[must_use]
    pub fn cancelled(&self) -> &[TimerToken] {
        &self.cancelled
    }

    /// Total `schedule` calls.
    #[must_use]
    pub const fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Advance virtual time by `dt`, returning tokens that came due in
    /// due-time order. Returned tokens are no longer pending.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerToken> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let mut due: Vec<(TimerToken, Duration)> = Vec::new();
        self.pending.retain(|&(token, at)| {
            if at <= now {
                due.push((token, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(token, at)| (at, token));
        due.into_iter().map(|(token, _)| token).collect()
    }
}

impl TimerScheduler for ManualTimers {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.scheduled += 1;
        self.pending.push((token, self.now.saturating_add(delay)));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|&(t, _)| t != token);
        self.cancelled.push(token);
    }
}

/// Host bundling the recording collaborators.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    /// Layout measurement.
    pub geometry: ScriptedGeometry,
    /// Container styles.
    pub style: RecordingStyle,
    /// Button cues.
    pub buttons: RecordingButtons,
    /// Timers.
    pub timers: ManualTimers,
}

impl RecordingHost {
    /// Host measuring `geometry`.
    #[must_use]
    pub fn new(geometry: SlideGeometry) -> Self {
        Self {
            geometry: ScriptedGeometry::new(geometry),
            ..Self::default()
        }
    }
}

impl CarouselHost for RecordingHost {
    type Geometry = ScriptedGeometry;
    type Style = RecordingStyle;
    type Buttons = RecordingButtons;
    type Timers = ManualTimers;

    fn geometry(&mut self) -> &mut Self::Geometry {
        &mut self.geometry
    }

    fn style(&mut self) -> &mut Self::Style {
        &mut self.style
    }

    fn buttons(&mut self) -> &mut Self::Buttons {
        &mut self.buttons
    }

    fn timers(&mut self) -> &mut Self::Timers {
        &mut self.timers
    }
}
