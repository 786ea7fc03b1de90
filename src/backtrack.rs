// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// This is the backtrack stack: an explicit, growable, non-recursive stack
// of suspended alternatives, used instead of host-language recursion so
// pathological patterns don't blow out the call stack (`spec.md` §5).
//
// The teacher (`examples/defuz-regex/src/backtrack.rs`) gets away with a
// `Job::SaveRestore { slot, old_pos }` entry because its engine only ever
// needs to undo a single capture slot assignment on backtrack. Our engine
// also needs to undo quantifier counters and zero-width witnesses, so a
// deferred alternative is a full struct-of-arrays `FrameSnapshot` instead
// (see `spec.md` §9, "Frame clone on defer").

use crate::frame::{Frame, FrameSnapshot};
use crate::nfa::StateId;

/// One entry of the backtrack stack: either a frame suspended at some
/// `pc`, or a precomputed match result discovered while deferring an
/// alternative that led straight to an unanchored final state (see
/// `spec.md` §4.1).
#[derive(Clone, Debug)]
enum StackEntry {
    Frame(FrameSnapshot),
    Result(Vec<isize>),
}

/// The stack itself.
#[derive(Debug, Default)]
pub struct BacktrackStack {
    entries: Vec<StackEntry>,
}

impl BacktrackStack {
    pub fn new() -> Self {
        BacktrackStack { entries: Vec::new() }
    }

    /// Resets the stack for a new match attempt, retaining its allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots the live frame (to be resumed at `pc`) and pushes it.
    /// This is `dupFrame` + `push` from `spec.md` §4.4 combined: the
    /// defer callers in the dispatcher always do both together.
    pub fn defer_frame(&mut self, frame: &Frame, pc: StateId) {
        self.entries.push(StackEntry::Frame(FrameSnapshot::capture(frame, pc)));
    }

    /// Queues a match result discovered while deferring an alternative,
    /// without creating a frame for it: `spec.md` §4.1's "if its target
    /// is an unanchored final state, its captures are pushed as a
    /// candidate result".
    pub fn push_result(&mut self, captures: Vec<isize>) {
        self.entries.push(StackEntry::Result(captures));
    }

    /// Pops the top entry, if any, restoring `frame` in place when it's a
    /// suspended frame. Returns what the dispatcher should do next.
    pub fn backtrack(&mut self, frame: &mut Frame) -> Backtracked {
        match self.entries.pop() {
            None => Backtracked::Failure,
            Some(StackEntry::Result(captures)) => Backtracked::Matched(captures),
            Some(StackEntry::Frame(snapshot)) => {
                let pc = snapshot.restore_into(frame);
                Backtracked::Resume(pc)
            }
        }
    }
}

/// The outcome of `BacktrackStack::backtrack`.
#[derive(Debug)]
pub enum Backtracked {
    /// A suspended frame was restored; resume the dispatcher loop at this
    /// state id.
    Resume(StateId),
    /// A queued result was the next thing on the stack: the match is
    /// done, and this is the leftmost-highest-priority result discovered
    /// so far.
    Matched(Vec<isize>),
    /// The stack is exhausted: overall failure, no match.
    Failure,
}
