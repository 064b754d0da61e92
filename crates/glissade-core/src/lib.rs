#![forbid(unsafe_code)]

//! Core: slide-position state machine and trigger coordination.
//!
//! # Role in glissade
//! `glissade-core` decides, for every trigger (button, swipe, timer, resize),
//! whether a move is legal, what the new offset is, and how the move is
//! serialized against the other triggers. It owns no platform bindings; the
//! environment is reached only through the traits in [`host`].
//!
//! # Primary responsibilities
//! - **PositionEngine**: offsets, advanced count, busy flag.
//! - **Carousel**: the trigger coordinator and auto-advance re-arming.
//! - **SwipeTracker**: single-finger horizontal swipe classification.
//! - **CarouselConfig**: `rate`, `autoSlide`, `delayBetweenSlides`.
//!
//! # How it fits in the system
//! `glissade-web` implements the host traits over the DOM and forwards
//! browser events into [`coordinator::Carousel`]. `glissade-harness` provides
//! a recording host for deterministic tests.

pub mod auto_advance;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod host;
pub mod position;
pub mod swipe;
pub mod transition;

pub use auto_advance::TimerToken;
pub use config::{CarouselConfig, ConfigError};
pub use coordinator::{Carousel, CarouselSnapshot, IgnoreReason, TriggerOutcome};
pub use geometry::{GeometryError, SlideGeometry};
pub use host::{ButtonIndicator, CarouselHost, GeometryProvider, StyleApplier, TimerScheduler};
pub use position::{Direction, MoveResult, PositionEngine, Rejection};
pub use swipe::SwipeTracker;
pub use transition::{MoveGeneration, Transition};
