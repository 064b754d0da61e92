#![forbid(unsafe_code)]

//! Position engine: the single source of truth for how far the carousel has
//! advanced.
//!
//! [`PositionEngine`] validates direction requests, computes the next margin
//! offset, and holds the busy flag that serializes transitions. It never
//! touches styles or timers; the coordinator turns a [`MoveResult`] into
//! side effects.
//!
//! # Offsets
//!
//! Offsets are horizontal margins in the slide-width pixel unit. Moving
//! [`Direction::Forward`] from advanced count `a` targets
//! `-(slide_width * a) - slide_width`; moving [`Direction::Backward`] targets
//! `-(slide_width * a) + slide_width`. No partial-slide offset is produced.
//!
//! # Invariants
//!
//! 1. `0 <= advanced_count <= spare_count` after every committed move.
//! 2. The committed offset is `0` iff `advanced_count == 0`, and is otherwise
//!    a negative whole multiple of the slide width.
//! 3. While busy, [`request_move`](PositionEngine::request_move) and
//!    [`reset`](PositionEngine::reset) leave all state unchanged.
//! 4. [`finalize_move`](PositionEngine::finalize_move) commits at most once
//!    per committed move.
//!
//! # Failure Modes
//!
//! - Geometry that fails validation is rejected by
//!   [`recompute_geometry`](PositionEngine::recompute_geometry); the previous
//!   geometry stays in effect.
//! - A resize can shrink `spare_count` below `advanced_count`. The next move
//!   request, in either direction, commits a move onto the last reachable
//!   slide (`-(slide_width * spare_count)`) instead of the requested step.
//!   A rejected request never changes state.

use core::fmt;
use core::time::Duration;

use crate::geometry::{GeometryError, SlideGeometry};

/// Direction of a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Content moves left; the offset becomes more negative.
    Forward,
    /// Content moves right; the offset moves toward zero.
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        })
    }
}

/// Why a move request produced no transition.
///
/// None of these are faults; they are the natural boundary behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// A transition is already in flight.
    Busy,
    /// Already at the first slide (backward request, or reset at offset 0).
    AtStart,
    /// Already at the last reachable slide.
    AtEnd,
}

impl Rejection {
    /// Short, stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::AtStart => "at_start",
            Self::AtEnd => "at_end",
        }
    }
}

/// A move the engine has committed to; awaiting animation completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMove {
    /// Target offset (px).
    pub offset_px: f64,
    /// Delay before the transition should start.
    pub delay: Duration,
    /// Advanced count after the move.
    pub advanced_count: u32,
}

/// Result of a move or reset request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveResult {
    /// The engine is now busy with this move.
    Committed(PendingMove),
    /// Nothing changed and no transition should start.
    NoOp(Rejection),
}

impl MoveResult {
    /// `true` for [`MoveResult::Committed`].
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// How far the slide list has been advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidePosition {
    /// Slides already advanced past.
    pub advanced_count: u32,
    /// Width of one slide (px).
    pub slide_width: f64,
    /// Total slides minus visible slides.
    pub spare_count: u32,
    /// Committed margin offset (px, `<= 0`).
    pub current_offset: f64,
}

/// Transient state of a transition in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    /// A transition is in flight.
    pub busy: bool,
    /// Target offset until completion is observed.
    pub pending_offset: f64,
    /// Delay requested for the pending transition.
    pub pending_delay: Duration,
}

/// Slide-offset state machine.
#[derive(Debug, Clone)]
pub struct PositionEngine {
    position: SlidePosition,
    motion: MotionState,
}

impl PositionEngine {
    /// Create an engine for a validated geometry.
    pub fn new(geometry: &SlideGeometry) -> Result<Self, GeometryError> {
        geometry.validate()?;
        Ok(Self {
            position: SlidePosition {
                advanced_count: 0,
                slide_width: geometry.slide_width,
                spare_count: geometry.spare_count(),
                current_offset: 0.0,
            },
            motion: MotionState::default(),
        })
    }

    /// Engine for a layout that could not be measured.
    ///
    /// It has no spare slides, so every move is a boundary no-op until a
    /// later [`recompute_geometry`](Self::recompute_geometry) succeeds.
    #[must_use]
    pub fn unmeasured() -> Self {
        Self {
            position: SlidePosition {
                advanced_count: 0,
                slide_width: 1.0,
                spare_count: 0,
                current_offset: 0.0,
            },
            motion: MotionState::default(),
        }
    }

    /// Validate and commit a move in `direction`.
    pub fn request_move(&mut self, direction: Direction) -> MoveResult {
        if self.motion.busy {
            return MoveResult::NoOp(Rejection::Busy);
        }
        if let Some(result) = self.clamp_to_range() {
            return result;
        }

        let width = self.position.slide_width;
        let advanced = self.position.advanced_count;
        let (offset, next_count) = match direction {
            Direction::Forward => {
                if advanced >= self.position.spare_count {
                    return MoveResult::NoOp(Rejection::AtEnd);
                }
                let offset = if advanced == 0 {
                    -width
                } else {
                    -(width * f64::from(advanced)) - width
                };
                (offset, advanced + 1)
            }
            Direction::Backward => {
                if advanced == 0 {
                    return MoveResult::NoOp(Rejection::AtStart);
                }
                (-(width * f64::from(advanced)) + width, advanced - 1)
            }
        };

        self.position.advanced_count = next_count;
        self.begin(offset, Duration::ZERO)
    }

    /// Snap back to the first slide.
    ///
    /// Forces the advanced count to zero. Commits a zero-delay transition to
    /// offset `0` unless the committed offset is already `0`.
    pub fn reset(&mut self) -> MoveResult {
        if self.motion.busy {
            return MoveResult::NoOp(Rejection::Busy);
        }
        self.position.advanced_count = 0;
        if self.position.current_offset == 0.0 {
            return MoveResult::NoOp(Rejection::AtStart);
        }
        self.begin(0.0, Duration::ZERO)
    }

    /// Commit the pending offset once the animation has completed.
    ///
    /// Returns the committed offset, or `None` when no move was in flight.
    pub fn finalize_move(&mut self) -> Option<f64> {
        if !self.motion.busy {
            return None;
        }
        self.position.current_offset = if self.position.advanced_count == 0 {
            0.0
        } else {
            self.motion.pending_offset
        };
        self.motion.busy = false;
        self.motion.pending_delay = Duration::ZERO;
        Some(self.position.current_offset)
    }

    /// Apply a new measurement. The advanced count is left untouched.
    pub fn recompute_geometry(&mut self, geometry: &SlideGeometry) -> Result<(), GeometryError> {
        geometry.validate()?;
        self.position.slide_width = geometry.slide_width;
        self.position.spare_count = geometry.spare_count();
        Ok(())
    }

    /// Slides advanced so far.
    #[must_use]
    pub const fn advanced_count(&self) -> u32 {
        self.position.advanced_count
    }

    /// Maximum legal advanced count for the current geometry.
    #[must_use]
    pub const fn spare_count(&self) -> u32 {
        self.position.spare_count
    }

    /// Width of a single slide (px).
    #[must_use]
    pub const fn slide_width(&self) -> f64 {
        self.position.slide_width
    }

    /// Last committed offset (px).
    #[must_use]
    pub const fn current_offset(&self) -> f64 {
        self.position.current_offset
    }

    /// `true` while a transition is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.motion.busy
    }

    /// Whether a forward move would currently be legal (ignoring busy).
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.position.advanced_count < self.position.spare_count
    }

    /// Whether a backward move would currently be legal (ignoring busy).
    #[must_use]
    pub fn can_go_backward(&self) -> bool {
        self.position.advanced_count > 0
    }

    /// Snapshot of the position state.
    #[must_use]
    pub const fn position(&self) -> &SlidePosition {
        &self.position
    }

    /// Snapshot of the motion state.
    #[must_use]
    pub const fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Commit a move onto the last reachable slide if a geometry shrink left
    /// the count out of range.
    fn clamp_to_range(&mut self) -> Option<MoveResult> {
        let spare = self.position.spare_count;
        if self.position.advanced_count <= spare {
            return None;
        }
        tracing::debug!(
            advanced_count = self.position.advanced_count,
            spare_count = spare,
            "clamping advanced count after geometry shrink"
        );
        self.position.advanced_count = spare;
        let offset = if spare == 0 {
            0.0
        } else {
            -(self.position.slide_width * f64::from(spare))
        };
        Some(self.begin(offset, Duration::ZERO))
    }

    fn begin(&mut self, offset: f64, delay: Duration) -> MoveResult {
        self.motion = MotionState {
            busy: true,
            pending_offset: offset,
            pending_delay: delay,
        };
        MoveResult::Committed(PendingMove {
            offset_px: offset,
            delay,
            advanced_count: self.position.advanced_count,
        })
    }
}
