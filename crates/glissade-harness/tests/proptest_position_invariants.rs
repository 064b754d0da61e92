//! Property-based invariant tests for the position engine and coordinator.
//!
//! 1. `0 <= advanced_count <= spare_count` after every committed move
//! 2. Triggers issued while busy never change the count or the offset
//! 3. Settled offsets are `-(slide_width * advanced_count)`
//! 4. Completion commits once; repeats are ignored
//! 5. No panics on arbitrary trigger sequences, resizes included

use std::time::Duration;

use glissade_core::{
    CarouselConfig, Direction, IgnoreReason, MoveResult, PositionEngine, SlideGeometry,
    TriggerOutcome,
};
use glissade_harness::Rig;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Complete,
    CompleteRepeatedly(usize),
    Swipe(f64),
    Wait(u64),
    Resize(u32),
}

fn op_strategy(with_resize: bool) -> BoxedStrategy<Op> {
    let base = prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Complete),
        (2usize..4).prop_map(Op::CompleteRepeatedly),
        (-300.0f64..300.0).prop_map(Op::Swipe),
        (0u64..2500).prop_map(Op::Wait),
    ];
    if with_resize {
        prop_oneof![4 => base, 1 => (1u32..8).prop_map(Op::Resize)].boxed()
    } else {
        base.boxed()
    }
}

const SLIDE: f64 = 100.0;
const SLIDES: u32 = 7;

fn rig(auto_slide: bool) -> Rig {
    let config = CarouselConfig::default()
        .with_auto_slide(auto_slide)
        .with_delay_between_slides(1000);
    Rig::new(SlideGeometry::new(SLIDE, SLIDE * 2.0, SLIDES), config)
}

fn apply(rig: &mut Rig, op: &Op) -> Vec<TriggerOutcome> {
    match op {
        Op::Next => vec![rig.carousel().next()],
        Op::Previous => vec![rig.carousel().previous()],
        Op::Complete => rig.complete().into_iter().collect(),
        Op::CompleteRepeatedly(n) => rig.complete_repeatedly(*n),
        Op::Swipe(dx) => vec![rig.swipe(400.0, 400.0 + dx)],
        Op::Wait(ms) => rig.advance(Duration::from_millis(*ms)),
        Op::Resize(visible) => {
            let frame = SLIDE * f64::from(*visible);
            rig.host_mut()
                .geometry
                .set(SlideGeometry::new(SLIDE, frame, SLIDES));
            vec![rig.carousel().on_resize()]
        }
    }
}

fn is_navigation(op: &Op) -> bool {
    matches!(op, Op::Next | Op::Previous | Op::Swipe(_) | Op::Wait(_))
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn range_holds_after_every_committed_move(
        auto_slide in any::<bool>(),
        ops in prop::collection::vec(op_strategy(true), 1..80),
    ) {
        let mut rig = rig(auto_slide);
        for op in &ops {
            let outcomes = apply(&mut rig, op);
            if outcomes.iter().any(TriggerOutcome::moved) {
                let snap = rig.snapshot();
                prop_assert!(snap.advanced_count <= snap.spare_count,
                    "op {:?} left {:?}", op, snap);
            }
            prop_assert!(rig.snapshot().current_offset <= 0.0);
        }
    }

    #[test]
    fn busy_guard_freezes_position(
        auto_slide in any::<bool>(),
        ops in prop::collection::vec(op_strategy(false), 1..80),
    ) {
        let mut rig = rig(auto_slide);
        for op in &ops {
            let before = rig.snapshot();
            apply(&mut rig, op);
            if before.busy && is_navigation(op) {
                let after = rig.snapshot();
                prop_assert_eq!(after.advanced_count, before.advanced_count);
                prop_assert_eq!(after.current_offset, before.current_offset);
                prop_assert!(after.busy);
            }
        }
    }

    #[test]
    fn settled_offset_matches_count(
        auto_slide in any::<bool>(),
        ops in prop::collection::vec(op_strategy(true), 1..80),
    ) {
        let mut rig = rig(auto_slide);
        for op in &ops {
            apply(&mut rig, op);
            let snap = rig.snapshot();
            if !snap.busy {
                prop_assert_eq!(snap.current_offset, -(SLIDE * f64::from(snap.advanced_count)));
                prop_assert_eq!(snap.current_offset == 0.0, snap.advanced_count == 0);
            }
        }
    }

    #[test]
    fn repeated_completion_commits_once(
        forwards in 1usize..6,
        repeats in 2usize..5,
    ) {
        let mut rig = rig(false);
        for _ in 0..forwards {
            rig.carousel().next();
            let outcomes = rig.complete_repeatedly(repeats);
            prop_assert!(
                matches!(outcomes[0], TriggerOutcome::Completed { .. }),
                "first completion should commit: {:?}",
                outcomes
            );
            for later in &outcomes[1..] {
                prop_assert_eq!(*later, TriggerOutcome::Ignored(IgnoreReason::StaleCompletion));
            }
        }
        prop_assert_eq!(rig.host().style.clears(), forwards);
    }

    #[test]
    fn engine_offsets_are_whole_slides(
        width in 1.0f64..500.0,
        spare in 0u32..10,
        dirs in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let geometry = SlideGeometry::new(width, width, spare + 1);
        let mut engine = PositionEngine::new(&geometry).expect("valid geometry");
        for forward in dirs {
            let dir = if forward { Direction::Forward } else { Direction::Backward };
            if let MoveResult::Committed(m) = engine.request_move(dir) {
                let slides = -m.offset_px / width;
                prop_assert!((slides - slides.round()).abs() < 1e-9);
                prop_assert!((slides.round() as u32) == m.advanced_count);
            }
            engine.finalize_move();
            prop_assert!(engine.advanced_count() <= engine.spare_count());
        }
    }
}
