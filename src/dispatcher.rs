// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The State Dispatcher (`spec.md` §4.1): one cycle of the engine's main
//! loop. Given a live frame suspended at some `pc`, it either commits to a
//! match, commits to the highest-priority admissible successor (deferring
//! the rest to the backtrack stack), or signals that the caller should pop
//! the stack.
//!
//! The "iterate successors last-to-first, commit the latest match found"
//! idiom (`spec.md` §9) is equivalent to "commit the first match and defer
//! the rest", but lets each deferred alternative be built from a frame that
//! has not yet been mutated by a higher-priority alternative.

use crate::backtrack::BacktrackStack;
use crate::direction::Direction;
use crate::error::EngineError;
use crate::evaluator::transition_matches;
use crate::frame::Frame;
use crate::input::{CaseFold, InputCursor};
use crate::nfa::{Nfa, StateId, StateKind, TransitionId};
use crate::submatch::{self, SubExecutors};
use crate::updater::update_state;

/// What the caller (`Engine::execute`) should do after one dispatcher step.
pub enum StepOutcome {
    /// Keep going: `frame.pc` has already been updated to this state id.
    Continue(StateId),
    /// A final state was reached directly (not via a deferred candidate);
    /// this is the match.
    Matched(Vec<isize>),
    /// No admissible successor (or a non-inlined lookaround failed): the
    /// caller should pop the backtrack stack.
    Backtrack,
}

/// One dispatcher cycle, `spec.md` §4.1. `frame.pc` names the current state.
#[allow(clippy::too_many_arguments)]
pub fn step<C: InputCursor>(
    nfa: &Nfa,
    dir: Direction,
    cursor: &C,
    frame: &mut Frame,
    stack: &mut BacktrackStack,
    case_insensitive: bool,
    case_fold: Option<&CaseFold>,
    sub_executors: &SubExecutors,
) -> Result<StepOutcome, EngineError> {
    let pc = frame.pc;
    let state = nfa.state(pc);

    if let StateKind::InitialOrFinal(flags) = &state.kind {
        if flags.is_final() {
            return Ok(StepOutcome::Matched(frame.captures.clone()));
        }
    }

    if matches!(&state.kind, StateKind::Lookaround { .. })
        && !submatch::is_inlineable(nfa, dir, pc, sub_executors)?
    {
        let (admitted, merge) = submatch::run_sub_match(nfa, cursor, frame, pc, sub_executors)?;
        if !admitted {
            return Ok(StepOutcome::Backtrack);
        }
        if let Some(caps) = merge {
            submatch::merge_captures(frame, &caps);
        }
    }

    let current_char = cursor.next_in_direction(frame.index, dir);

    let successors: Vec<TransitionId> = nfa.state(pc).successors(dir).to_vec();
    let mut first_match: Option<TransitionId> = None;
    for &tid in successors.iter().rev() {
        let t = nfa.transition(tid);
        let admitted = transition_matches(
            nfa,
            dir,
            t,
            frame,
            cursor,
            current_char,
            case_insensitive,
            case_fold,
            sub_executors,
        )?;
        if !admitted {
            continue;
        }
        if let Some(prev) = first_match {
            defer_transition(nfa, dir, prev, frame, stack)?;
        }
        first_match = Some(tid);
    }

    match first_match {
        None => Ok(StepOutcome::Backtrack),
        Some(tid) => {
            let t = nfa.transition(tid).clone();
            let target = update_state(nfa, dir, &t, frame)?;
            frame.pc = target;
            Ok(StepOutcome::Continue(target))
        }
    }
}

/// Defers a lower-priority admissible transition discovered while a
/// higher-priority one was still being committed to the live frame
/// (`spec.md` §4.1's "demoted to the stack"). The transition is applied to
/// a *copy* of the current frame first, so the copy's captures/index are
/// exactly what resuming at its target should see.
fn defer_transition(
    nfa: &Nfa,
    dir: Direction,
    tid: TransitionId,
    frame: &Frame,
    stack: &mut BacktrackStack,
) -> Result<(), EngineError> {
    let t = nfa.transition(tid).clone();
    let mut copy = frame.clone();
    let target = update_state(nfa, dir, &t, &mut copy)?;
    let is_unanchored_final = matches!(
        &nfa.state(target).kind,
        StateKind::InitialOrFinal(flags) if flags.unanchored_final
    );
    if is_unanchored_final {
        stack.push_result(copy.captures);
    } else {
        stack.defer_frame(&copy, target);
    }
    Ok(())
}
