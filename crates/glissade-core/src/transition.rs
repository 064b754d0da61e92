#![forbid(unsafe_code)]

//! Transition descriptors handed to the style applier.

use core::fmt;
use core::time::Duration;

/// Tag identifying one committed move.
///
/// The coordinator mints a new generation for every transition it starts.
/// Completion signals carry the generation back, so a duplicate or late
/// signal can be told apart from the one that finishes the in-flight move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MoveGeneration(u64);

impl MoveGeneration {
    /// Wrap a raw generation value (host round-trips use this).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for MoveGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move#{}", self.0)
    }
}

/// A linear horizontal-margin transition to apply to the slide container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Move this transition belongs to.
    pub generation: MoveGeneration,
    /// Target margin offset (px, `<= 0`).
    pub offset_px: f64,
    /// Delay before the transition starts.
    pub delay: Duration,
    /// Transition duration.
    pub rate: Duration,
}

impl Transition {
    /// `true` when the transition finishes without running any animation time.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.delay.is_zero() && self.rate.is_zero()
    }
}
