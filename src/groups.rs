// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared capture-slot resolution (`spec.md` §4.3) used by both the
//! Transition Evaluator (backreference admissibility) and the Frame
//! Updater (backreference-driven index advance): a transition's own
//! `GroupBoundaries` overlay is consulted before falling back to the
//! frame's committed capture array, since a transition may both close a
//! group and reference it in the same step.

use crate::frame::{Frame, UNSET};
use crate::nfa::Transition;

/// Resolves a single capture slot as it would read *after* `transition`
/// commits: the overlay's clear/update wins over whatever is already in
/// `frame.captures`.
pub(crate) fn resolved_slot(transition: &Transition, frame: &Frame, slot: usize) -> isize {
    if transition.boundaries.clears(slot) {
        UNSET
    } else if transition.boundaries.updates(slot) {
        frame.index as isize
    } else {
        frame.captures[slot]
    }
}

/// Resolves a whole group's `(start, end)` bounds the same way.
pub(crate) fn resolved_group(
    transition: &Transition,
    frame: &Frame,
    group: usize,
) -> (isize, isize) {
    (
        resolved_slot(transition, frame, 2 * group),
        resolved_slot(transition, frame, 2 * group + 1),
    )
}
