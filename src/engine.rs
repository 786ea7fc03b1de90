// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The public `Engine`: the two external operations from `spec.md` §6,
//! `createFrame` and `execute`, wired up to the dispatcher loop and backtrack
//! stack. An `Engine` is immutable once built (its `Nfa` and registered
//! sub-executors never change) and freely shareable across threads — every
//! mutable piece of state for one match attempt lives in the `Frame` and a
//! stack-local `BacktrackStack`, per `spec.md` §5.

use std::sync::Arc;

use crate::backtrack::{Backtracked, BacktrackStack};
use crate::cancel::CancellationToken;
use crate::dispatcher::{self, StepOutcome};
use crate::direction::Direction;
use crate::error::{EngineError, MatchOutcome};
use crate::frame::Frame;
use crate::input::{CompactCursor, InputCursor, Utf8Cursor};
use crate::nfa::Nfa;
use crate::submatch::SubExecutors;

/// The case-folding predicate a host may supply (`equalsIgnoreCase` from
/// `spec.md` §6), owned so it can be shared across an `Engine`'s lifetime
/// and across its sub-executors.
pub type CaseFoldFn = dyn Fn(char, char) -> bool + Send + Sync;

/// A backtracking-NFA execution engine for one compiled pattern (or one
/// lookaround sub-pattern, when held inside a `SubExecutors` registry).
pub struct Engine {
    nfa: Nfa,
    direction: Direction,
    sub_executors: SubExecutors,
    case_insensitive: bool,
    case_fold: Option<Arc<CaseFoldFn>>,
    cancellation: CancellationToken,
}

impl Engine {
    pub fn new(
        nfa: Nfa,
        direction: Direction,
        sub_executors: SubExecutors,
        case_insensitive: bool,
        case_fold: Option<Arc<CaseFoldFn>>,
        cancellation: CancellationToken,
    ) -> Self {
        Engine { nfa, direction, sub_executors, case_insensitive, case_fold, cancellation }
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this engine's own `Nfa` ever updates or clears a capture
    /// slot. Consulted by the Sub-Matcher Driver (`spec.md` §4.5) to decide
    /// whether a lookaround using this engine can be inlined regardless of
    /// predecessor count.
    pub fn writes_captures(&self) -> bool {
        self.nfa.writes_captures()
    }

    /// `createFrame` from `spec.md` §6: allocate a frame sized to this
    /// engine's capture/quantifier counts, seeded at the given attempt
    /// bounds.
    pub fn create_frame(&self, from_index: usize, index: usize, max_index: usize) -> Frame {
        Frame::new(&self.nfa, from_index, index, max_index)
    }

    /// `execute` from `spec.md` §6: run `frame` to completion against
    /// `input`, selecting the `compact_string_hint`-appropriate cursor.
    /// This is the entry point a top-level host calls; lookaround
    /// sub-executors instead call `execute_with` directly so they share the
    /// caller's already-constructed cursor.
    pub fn execute(
        &self,
        frame: &mut Frame,
        input: &str,
        compact_string_hint: bool,
    ) -> Result<MatchOutcome, EngineError> {
        if compact_string_hint {
            let cursor = CompactCursor::new(input.as_bytes());
            self.execute_with(frame, &cursor)
        } else {
            let cursor = Utf8Cursor::new(input);
            self.execute_with(frame, &cursor)
        }
    }

    /// The dispatcher/backtrack driver loop, generic over the cursor
    /// implementation so a lookaround's sub-executor can reuse its parent's
    /// cursor verbatim (`spec.md` §4.5).
    pub fn execute_with<C: InputCursor>(
        &self,
        frame: &mut Frame,
        cursor: &C,
    ) -> Result<MatchOutcome, EngineError> {
        let mut stack = BacktrackStack::new();
        let case_fold =
            self.case_fold.as_deref().map(|f| f as &crate::input::CaseFold<'_>);

        loop {
            if self.cancellation.is_cancelled() {
                tracing::warn!("match cancelled at safepoint");
                return Ok(MatchOutcome::Cancelled);
            }

            tracing::trace!(pc = frame.pc, index = frame.index, "dispatcher step");
            let outcome = dispatcher::step(
                &self.nfa,
                self.direction,
                cursor,
                frame,
                &mut stack,
                self.case_insensitive,
                case_fold,
                &self.sub_executors,
            )?;

            match outcome {
                StepOutcome::Continue(pc) => {
                    frame.pc = pc;
                }
                StepOutcome::Matched(captures) => {
                    frame.result = Some(captures.clone());
                    return Ok(MatchOutcome::Matched(captures));
                }
                StepOutcome::Backtrack => {
                    tracing::trace!("backtracking");
                    match stack.backtrack(frame) {
                        Backtracked::Resume(pc) => frame.pc = pc,
                        Backtracked::Matched(captures) => {
                            frame.result = Some(captures.clone());
                            return Ok(MatchOutcome::Matched(captures));
                        }
                        Backtracked::Failure => return Ok(MatchOutcome::NoMatch),
                    }
                }
            }
        }
    }
}
