#![forbid(unsafe_code)]

//! Single-finger horizontal swipe recognition.
//!
//! [`SwipeTracker`] follows one touch contact from start to end and classifies
//! the net horizontal displacement against half a slide width. Moves are only
//! decided at touch end or cancel; touch-move events update the tracked end
//! position and tell the caller to suppress page scrolling.
//!
//! # Invariants
//!
//! 1. A track exists only between a single-finger touch start and the
//!    matching end or cancel.
//! 2. A second finger landing mid-gesture discards the track; nothing fires
//!    for that contact.
//! 3. Displacement exactly at the threshold produces no move.

use crate::position::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureTrack {
    start_x: f64,
    end_x: f64,
}

/// Tracks the active single-finger gesture, if any.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    track: Option<GestureTrack>,
}

impl SwipeTracker {
    /// Create an idle tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { track: None }
    }

    /// Begin tracking. Returns `true` if a single-finger track started.
    pub fn touch_start(&mut self, touch_count: usize, x: f64) -> bool {
        if touch_count != 1 {
            self.track = None;
            return false;
        }
        self.track = Some(GestureTrack {
            start_x: x,
            end_x: x,
        });
        true
    }

    /// Update the tracked end position.
    ///
    /// Returns `true` when the caller should prevent the default page scroll.
    pub fn touch_move(&mut self, touch_count: usize, x: f64) -> bool {
        if touch_count != 1 {
            self.track = None;
            return false;
        }
        match self.track.as_mut() {
            Some(track) => {
                track.end_x = x;
                true
            }
            None => false,
        }
    }

    /// Finish the gesture and classify it.
    pub fn touch_end(&mut self, slide_width: f64) -> Option<Direction> {
        let track = self.track.take()?;
        classify(track.end_x - track.start_x, slide_width)
    }

    /// Finish a cancelled gesture. Classified the same way as an end.
    pub fn touch_cancel(&mut self, slide_width: f64) -> Option<Direction> {
        self.touch_end(slide_width)
    }

    /// `true` while a single-finger contact is being tracked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.track.is_some()
    }

    /// Net horizontal displacement of the active track.
    #[must_use]
    pub fn displacement(&self) -> Option<f64> {
        self.track.map(|t| t.end_x - t.start_x)
    }

    /// Drop any active track without classifying it.
    pub fn reset(&mut self) {
        self.track = None;
    }
}

/// Classify a horizontal displacement (px) against half a slide width.
///
/// Swiping left past the threshold moves forward; right moves backward.
#[must_use]
pub fn classify(displacement: f64, slide_width: f64) -> Option<Direction> {
    let threshold = slide_width / 2.0;
    if displacement < -threshold {
        Some(Direction::Forward)
    } else if displacement > threshold {
        Some(Direction::Backward)
    } else {
        None
    }
}
