#![forbid(unsafe_code)]

//! CSS strings for the slide container and controls.
//!
//! Everything here is pure string formatting so it can be tested off the
//! browser. The DOM adapter writes these declarations verbatim.

use glissade_core::Transition;

/// Transition shorthand properties, unprefixed first.
pub const TRANSITION_PROPERTIES: [&str; 2] = ["transition", "-webkit-transition"];

/// Property animated by every transition.
pub const OFFSET_PROPERTY: &str = "margin-left";

/// Completion events to listen for. Some engines raise both for one
/// transition; the coordinator ignores the duplicate.
pub const TRANSITION_END_EVENTS: [&str; 2] = ["transitionend", "webkitTransitionEnd"];

/// Class toggled on a control that cannot currently move.
pub const DISABLED_CLASS: &str = "glissade-disabled";

/// Format a pixel offset, normalizing negative zero.
#[must_use]
pub fn px(offset: f64) -> String {
    if offset == 0.0 {
        "0px".to_owned()
    } else {
        format!("{offset}px")
    }
}

/// `margin-left <rate>s linear <delay>s`.
#[must_use]
pub fn transition_value(transition: &Transition) -> String {
    format!(
        "{OFFSET_PROPERTY} {}s linear {}s",
        transition.rate.as_secs_f64(),
        transition.delay.as_secs_f64()
    )
}

/// Declarations that start `transition`, in write order.
///
/// The transition shorthand is written before the margin so the margin
/// change is animated.
#[must_use]
pub fn transition_declarations(transition: &Transition) -> Vec<(&'static str, String)> {
    let value = transition_value(transition);
    let mut out: Vec<(&'static str, String)> = TRANSITION_PROPERTIES
        .iter()
        .map(|&prop| (prop, value.clone()))
        .collect();
    out.push((OFFSET_PROPERTY, px(transition.offset_px)));
    out
}
