#![forbid(unsafe_code)]

//! Measured slide and frame dimensions.
//!
//! [`SlideGeometry`] is the value a [`GeometryProvider`](crate::host::GeometryProvider)
//! hands to the coordinator on construction and on every resize. All widths are
//! in CSS pixels.
//!
//! # Invariants
//!
//! 1. A geometry that passed [`SlideGeometry::validate`] has a finite,
//!    strictly positive `slide_width` and a finite, non-negative `frame_width`.
//! 2. [`SlideGeometry::spare_count`] never underflows: a frame wide enough to
//!    show every slide yields `0`.

use core::fmt;

/// One measurement of the carousel layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideGeometry {
    /// Width of a single slide (px).
    pub slide_width: f64,
    /// Width of the visible frame (px).
    pub frame_width: f64,
    /// Total number of slides in the list.
    pub slide_count: u32,
    /// Width of one navigation button (px). Zero when the controls are absent.
    pub button_width: f64,
}

impl SlideGeometry {
    /// Create a geometry with no navigation buttons.
    #[must_use]
    pub const fn new(slide_width: f64, frame_width: f64, slide_count: u32) -> Self {
        Self {
            slide_width,
            frame_width,
            slide_count,
            button_width: 0.0,
        }
    }

    /// Set the measured button width (builder pattern).
    #[must_use]
    pub const fn with_button_width(mut self, button_width: f64) -> Self {
        self.button_width = button_width;
        self
    }

    /// Check that the measurement can drive the position engine.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.slide_width.is_finite() || self.slide_width <= 0.0 {
            return Err(GeometryError::InvalidSlideWidth(self.slide_width));
        }
        if !self.frame_width.is_finite() || self.frame_width < 0.0 {
            return Err(GeometryError::InvalidFrameWidth(self.frame_width));
        }
        Ok(())
    }

    /// Number of whole slides that fit in the frame at once.
    #[must_use]
    pub fn visible_count(&self) -> u32 {
        let visible = (self.frame_width / self.slide_width).floor();
        if visible.is_finite() && visible > 0.0 {
            // Saturating float-to-int cast.
            visible as u32
        } else {
            0
        }
    }

    /// Slides beyond what the frame shows; the maximum legal advanced count.
    #[must_use]
    pub fn spare_count(&self) -> u32 {
        self.slide_count.saturating_sub(self.visible_count())
    }
}

/// Reasons a geometry measurement cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Slide width was zero, negative, or not finite.
    InvalidSlideWidth(f64),
    /// Frame width was negative or not finite.
    InvalidFrameWidth(f64),
    /// The layout could not be measured at all.
    Unmeasurable(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlideWidth(w) => write!(f, "slide width must be positive, got {w}"),
            Self::InvalidFrameWidth(w) => write!(f, "frame width must be non-negative, got {w}"),
            Self::Unmeasurable(msg) => write!(f, "layout unmeasurable: {msg}"),
        }
    }
}

impl std::error::Error for GeometryError {}
