#![forbid(unsafe_code)]

//! Frame layout math.
//!
//! The visible frame is the carousel root minus the two navigation buttons
//! that flank it.

use glissade_core::SlideGeometry;

/// Width left for the frame once both buttons are placed.
#[must_use]
pub fn frame_width(container_width: f64, button_width: Option<f64>) -> f64 {
    let buttons = button_width.map_or(0.0, |w| 2.0 * w.max(0.0));
    (container_width - buttons).max(0.0)
}

/// Assemble a geometry from raw element widths.
#[must_use]
pub fn build_geometry(
    slide_width: f64,
    container_width: f64,
    slide_count: u32,
    button_width: Option<f64>,
) -> SlideGeometry {
    SlideGeometry::new(slide_width, frame_width(container_width, button_width), slide_count)
        .with_button_width(button_width.unwrap_or(0.0))
}
