// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Match Frame: the complete mutable state of one in-progress match
//! attempt. Laid out as a struct-of-arrays (captures/counters/witnesses
//! each a flat `Vec`) so a defer can be cloned with a handful of bulk
//! `Vec` copies rather than walking a tree, per `spec.md` §9.

use crate::nfa::{Nfa, StateId};

/// Sentinel for "unset" in captures and zero-width witnesses.
pub const UNSET: isize = -1;

/// The live, mutable state of a single match attempt.
#[derive(Clone, Debug)]
pub struct Frame {
    pub from_index: usize,
    pub index: usize,
    pub max_index: usize,
    /// Current state id while suspended on the backtrack stack; undefined
    /// (but harmless) while the frame is live and being driven by the
    /// dispatcher loop, which tracks `pc` on the call stack instead.
    pub pc: StateId,
    /// Length `2 * num_capture_groups`; `UNSET` means not yet captured.
    pub captures: Vec<isize>,
    /// Length `num_quantifiers`.
    pub quant_counts: Vec<u32>,
    /// Length `num_zero_width_quantifiers`; `UNSET` means "never".
    pub zero_width: Vec<isize>,
    /// Set once a final state is reached and the caller commits to it
    /// immediately rather than queuing it on the backtrack stack.
    pub result: Option<Vec<isize>>,
}

impl Frame {
    /// Allocates a frame sized to the given NFA's capture/quantifier
    /// counts, per `createFrame` in `spec.md` §6.
    pub fn new(nfa: &Nfa, from_index: usize, index: usize, max_index: usize) -> Self {
        let mut frame = Frame {
            from_index: 0,
            index: 0,
            max_index: 0,
            pc: nfa.anchored_initial(),
            captures: vec![UNSET; nfa.num_capture_slots()],
            quant_counts: vec![0; nfa.num_quantifiers()],
            zero_width: vec![UNSET; nfa.num_zero_width()],
            result: None,
        };
        frame.reset(from_index, index, max_index);
        frame
    }

    /// Reuses an already-allocated frame for a new attempt, avoiding a
    /// fresh allocation per start position. Not part of the external
    /// interface in `spec.md` §6, but a natural companion to it (see
    /// `SPEC_FULL.md` §F) in the style of the teacher's pooled
    /// `BackMachine`/`NfaThreads` caches.
    pub fn reset(&mut self, from_index: usize, index: usize, max_index: usize) {
        self.from_index = from_index;
        self.index = index;
        self.max_index = max_index;
        for c in &mut self.captures {
            *c = UNSET;
        }
        for q in &mut self.quant_counts {
            *q = 0;
        }
        for w in &mut self.zero_width {
            *w = UNSET;
        }
        self.result = None;
    }

    pub fn capture_pair(&self, group: usize) -> (isize, isize) {
        (self.captures[2 * group], self.captures[2 * group + 1])
    }
}

/// A struct-of-arrays snapshot of a `Frame`, pushed to the backtrack stack
/// when a lower-priority alternative must be deferred, and restored
/// wholesale on pop.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub pc: StateId,
    pub index: usize,
    pub captures: Vec<isize>,
    pub quant_counts: Vec<u32>,
    pub zero_width: Vec<isize>,
}

impl FrameSnapshot {
    pub fn capture(frame: &Frame, pc: StateId) -> Self {
        FrameSnapshot {
            pc,
            index: frame.index,
            captures: frame.captures.clone(),
            quant_counts: frame.quant_counts.clone(),
            zero_width: frame.zero_width.clone(),
        }
    }

    /// Restores `frame` from this snapshot, returning the `pc` to resume
    /// at.
    pub fn restore_into(self, frame: &mut Frame) -> StateId {
        frame.index = self.index;
        frame.captures = self.captures;
        frame.quant_counts = self.quant_counts;
        frame.zero_width = self.zero_width;
        self.pc
    }
}
