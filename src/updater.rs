// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Frame Updater (`spec.md` §4.2): applies an already-admitted
//! transition to the live frame. Group boundaries are written first (using
//! the *current* index, before anything advances), then quantifier guards
//! run in guard order (reversed for backward execution), then the new input
//! index is computed from the target state's kind.

use crate::direction::Direction;
use crate::error::EngineError;
use crate::frame::Frame;
use crate::groups::resolved_group;
use crate::nfa::{GuardKind, Nfa, StateId, StateKind, Transition};

/// Applies `transition` to `frame`, leaving `frame.index` pointing at the
/// position the *target* state should be evaluated from. Returns the target
/// state id (mirroring the dispatcher's "next `pc`" convention).
pub fn update_state(
    nfa: &Nfa,
    dir: Direction,
    transition: &Transition,
    frame: &mut Frame,
) -> Result<StateId, EngineError> {
    apply_group_boundaries(transition, frame);
    apply_quantifier_guards(nfa, dir, transition, frame);

    let target_id = transition.target(dir);
    let target = nfa.state(target_id);
    frame.index = new_index(nfa, dir, transition, frame, target_id, &target.kind)?;
    Ok(target_id)
}

/// Writes the transition's update/clear bitsets into the capture array using
/// the *current* index as the new boundary value (`spec.md` §4.2: "using the
/// current index as the new boundary value").
fn apply_group_boundaries(transition: &Transition, frame: &mut Frame) {
    for slot in transition.boundaries.updated_slots() {
        frame.captures[slot] = frame.index as isize;
    }
    for slot in transition.boundaries.cleared_slots() {
        frame.captures[slot] = crate::frame::UNSET;
    }
}

/// Processes each `QuantifierGuard` attached to `transition`, in guard order
/// (reversed for backward execution per `spec.md` §4.2).
fn apply_quantifier_guards(nfa: &Nfa, dir: Direction, transition: &Transition, frame: &mut Frame) {
    let guards: Box<dyn Iterator<Item = &_>> = if dir.is_forward() {
        Box::new(transition.guards.iter())
    } else {
        Box::new(transition.guards.iter().rev())
    };
    for guard in guards {
        let q = nfa.quantifier(guard.quantifier);
        match guard.kind(dir) {
            GuardKind::Enter | GuardKind::EnterInc | GuardKind::Loop | GuardKind::LoopInc => {
                frame.quant_counts[q.index] = frame.quant_counts[q.index].saturating_add(1);
            }
            GuardKind::Exit | GuardKind::ExitReset => {
                frame.quant_counts[q.index] = 0;
            }
            GuardKind::EnterZeroWidth => {
                if let Some(zw) = q.zero_width_index {
                    frame.zero_width[zw] = frame.index as isize;
                }
            }
            GuardKind::EnterEmptyMatch => {
                if !transition.caret_guard && !transition.dollar_guard {
                    // Short-circuit the empty iterations required to reach
                    // the minimum: there is nothing further the zero-width
                    // guard needs to police once the counter is pinned at
                    // `min` this way, since no input was consumed to get
                    // here either.
                    frame.quant_counts[q.index] = q.min;
                } else {
                    frame.quant_counts[q.index] =
                        frame.quant_counts[q.index].saturating_add(1);
                }
            }
            GuardKind::ExitZeroWidth => {}
        }
    }
}

/// Computes the new input index from the target state's kind, per
/// `spec.md` §4.2's table.
fn new_index(
    _nfa: &Nfa,
    dir: Direction,
    transition: &Transition,
    frame: &Frame,
    target_id: StateId,
    kind: &StateKind,
) -> Result<usize, EngineError> {
    let step = |index: usize| -> usize {
        match dir {
            Direction::Forward => index + 1,
            Direction::Backward => index.saturating_sub(1),
        }
    };
    match kind {
        StateKind::CharacterClass(_) | StateKind::InitialOrFinal(_) => Ok(step(frame.index)),
        StateKind::Lookaround { .. } | StateKind::EmptyMatch => Ok(frame.index),
        StateKind::BackReference { group } => {
            let (start, end) = resolved_group(transition, frame, *group);
            if start < 0 || end < 0 || end <= start {
                Ok(frame.index)
            } else {
                let len = (end - start) as usize;
                match dir {
                    Direction::Forward => Ok(frame.index + len),
                    Direction::Backward => frame.index.checked_sub(len).ok_or_else(|| {
                        tracing::error!(state = target_id, "backreference underflowed index");
                        EngineError::UnreachableState { state: target_id }
                    }),
                }
            }
        }
    }
}
