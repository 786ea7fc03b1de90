// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Sub-Matcher Driver (`spec.md` §4.5): runs a nested `Engine`
//! instance to decide a lookaround assertion. Each sub-executor is an
//! independent engine with its own NFA and fixed direction, so a
//! lookbehind's sub-executor runs backward while the top-level engine
//! (or an enclosing lookahead) runs forward.

use std::sync::Arc;

use crate::direction::Direction;
use crate::engine::Engine;
use crate::error::{EngineError, MatchOutcome};
use crate::frame::{Frame, UNSET};
use crate::input::InputCursor;
use crate::nfa::{LookaroundId, Nfa, StateId, StateKind};

/// The registry of sub-executors a `Lookaround` state's `sub_executor` id
/// indexes into. Built once, alongside the `Nfa`, and shared (via `Arc`)
/// by every frame that executes against this engine.
#[derive(Clone, Default)]
pub struct SubExecutors {
    executors: Vec<Arc<Engine>>,
}

impl SubExecutors {
    pub fn new(executors: Vec<Arc<Engine>>) -> Self {
        SubExecutors { executors }
    }

    pub fn get(&self, id: LookaroundId) -> Result<&Arc<Engine>, EngineError> {
        self.executors.get(id).ok_or_else(|| {
            tracing::error!(lookaround = id, "no sub-executor registered");
            EngineError::MissingSubExecutor { lookaround: id }
        })
    }
}

/// Whether the lookaround at `state_id` can be folded into the evaluation
/// of its (single) incoming transition, per `spec.md` §4.5: it has
/// exactly one predecessor in `dir`, and either it's negated (so there's
/// never anything to merge) or its sub-executor's NFA writes no captures
/// of its own.
pub fn is_inlineable(
    nfa: &Nfa,
    dir: Direction,
    state_id: StateId,
    sub_executors: &SubExecutors,
) -> Result<bool, EngineError> {
    let (sub_executor, negated) = match &nfa.state(state_id).kind {
        StateKind::Lookaround { sub_executor, negated } => (*sub_executor, *negated),
        _ => return Ok(false),
    };
    if nfa.predecessor_count(dir, state_id) != 1 {
        return Ok(false);
    }
    if negated {
        return Ok(true);
    }
    let sub = sub_executors.get(sub_executor)?;
    Ok(!sub.writes_captures())
}

/// Runs the sub-executor for the lookaround at `state_id` against the
/// same input `cursor` the caller is using, seeded from the caller's
/// frame per `spec.md` §4.5: the sub-frame keeps the outer `from_index`
/// and bounds, and starts at the outer frame's current index (the
/// assertion is always tested at the position it guards, regardless of
/// which way the sub-executor then scans).
///
/// Returns `(admitted, merge)`: `admitted` is whether the lookaround
/// succeeds (already accounting for negation), and `merge` carries the
/// sub-executor's captures when they should be folded into the caller
/// (a non-negated, non-inlined lookaround that matched).
///
/// Cancellation observed by the sub-executor is reported here as simple
/// non-admission: the cancellation flag is sticky, so the enclosing
/// dispatcher's own top-of-step check will observe it and terminate the
/// whole match shortly after, without this driver needing to thread a
/// separate cancellation outcome through the evaluator's boolean result.
pub fn run_sub_match<C: InputCursor>(
    nfa: &Nfa,
    cursor: &C,
    frame: &Frame,
    state_id: StateId,
    sub_executors: &SubExecutors,
) -> Result<(bool, Option<Vec<isize>>), EngineError> {
    let (sub_id, negated) = match &nfa.state(state_id).kind {
        StateKind::Lookaround { sub_executor, negated } => (*sub_executor, *negated),
        _ => return Err(EngineError::UnreachableState { state: state_id }),
    };
    let sub_engine = sub_executors.get(sub_id)?;
    let mut sub_frame = Frame::new(sub_engine.nfa(), frame.from_index, frame.index, frame.max_index);

    match sub_engine.execute_with(&mut sub_frame, cursor)? {
        MatchOutcome::Matched(caps) => {
            if negated {
                Ok((false, None))
            } else {
                Ok((true, Some(caps)))
            }
        }
        MatchOutcome::NoMatch => Ok((negated, None)),
        MatchOutcome::Cancelled => Ok((false, None)),
    }
}

/// Overwrites `frame`'s captures with `sub_captures` wherever the
/// sub-executor actually set a boundary (`spec.md` §4.5's "field-wise
/// merge"). The two arrays share the same global group numbering, since a
/// lookaround's own capturing groups are numbered within the whole
/// pattern, so this is a plain zipped overwrite rather than a remapping.
pub fn merge_captures(frame: &mut Frame, sub_captures: &[isize]) {
    for (dst, &src) in frame.captures.iter_mut().zip(sub_captures.iter()) {
        if src != UNSET {
            *dst = src;
        }
    }
}
