// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hand-assembly of an `Nfa`. Compiling a pattern string into this graph is
//! out of scope for this crate (see `spec.md` §1); this builder is the
//! seam a host (or, here, our own tests) uses to construct one directly.

use crate::direction::Direction;

use super::{
    GroupBoundaries, Nfa, Quantifier, QuantifierGuard, QuantifierId, State,
    StateId, StateKind, Transition, TransitionId, ZeroWidthId,
};

/// The pieces of a `Transition` that aren't its endpoints.
#[derive(Clone, Debug, Default)]
pub struct TransitionSpec {
    pub boundaries: GroupBoundaries,
    pub caret_guard: bool,
    pub dollar_guard: bool,
    pub guards: Vec<QuantifierGuard>,
}

impl TransitionSpec {
    pub fn new() -> Self {
        TransitionSpec::default()
    }

    pub fn boundaries(mut self, boundaries: GroupBoundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn caret(mut self) -> Self {
        self.caret_guard = true;
        self
    }

    pub fn dollar(mut self) -> Self {
        self.dollar_guard = true;
        self
    }

    pub fn guard(mut self, guard: QuantifierGuard) -> Self {
        self.guards.push(guard);
        self
    }
}

pub struct NfaBuilder {
    states: Vec<State>,
    transitions: Vec<Transition>,
    quantifiers: Vec<Quantifier>,
    num_capture_slots: usize,
    num_zero_width: usize,
    anchored_initial: Option<StateId>,
    unanchored_initial: Option<StateId>,
    initial_loop_back: bool,
}

impl NfaBuilder {
    /// `num_capture_groups` includes the implicit whole-match group 0.
    pub fn new(num_capture_groups: usize) -> Self {
        NfaBuilder {
            states: Vec::new(),
            transitions: Vec::new(),
            quantifiers: Vec::new(),
            num_capture_slots: num_capture_groups * 2,
            num_zero_width: 0,
            anchored_initial: None,
            unanchored_initial: None,
            initial_loop_back: false,
        }
    }

    pub fn add_state(&mut self, kind: StateKind) -> StateId {
        self.states.push(State::new(kind));
        self.states.len() - 1
    }

    pub fn set_anchored_initial(&mut self, id: StateId) {
        self.anchored_initial = Some(id);
    }

    pub fn set_unanchored_initial(&mut self, id: StateId) {
        self.unanchored_initial = Some(id);
    }

    pub fn set_initial_loop_back(&mut self, value: bool) {
        self.initial_loop_back = value;
    }

    /// Adds a quantifier counter. `zero_width` allocates it a witness slot.
    pub fn add_quantifier(
        &mut self,
        min: u32,
        max: Option<u32>,
        zero_width: bool,
    ) -> QuantifierId {
        let zero_width_index: Option<ZeroWidthId> = if zero_width {
            let id = self.num_zero_width;
            self.num_zero_width += 1;
            Some(id)
        } else {
            None
        };
        let index = self.quantifiers.len();
        self.quantifiers.push(Quantifier { index, min, max, zero_width_index });
        self.quantifiers.len() - 1
    }

    /// Adds a transition used by an NFA that only ever runs in one
    /// direction (the common case: a top-level/lookahead graph running
    /// forward, or a lookbehind sub-graph running backward). The same
    /// transition id is attached to `from`'s successor list in both
    /// direction slots, but only the direction the owning `Engine` was
    /// built with is ever consulted.
    pub fn add_transition(
        &mut self,
        from: StateId,
        target: StateId,
        spec: TransitionSpec,
    ) -> TransitionId {
        let transition = Transition {
            targets: [target, target],
            boundaries: spec.boundaries,
            caret_guard: spec.caret_guard,
            dollar_guard: spec.dollar_guard,
            guards: spec.guards,
        };
        let id = self.transitions.len();
        self.transitions.push(transition);
        self.states[from].successors[Direction::Forward.index()].push(id);
        self.states[from].successors[Direction::Backward.index()].push(id);
        id
    }

    /// Adds a transition with independently specified forward/backward
    /// endpoints, for a genuinely bidirectional graph.
    pub fn add_bidirectional_transition(
        &mut self,
        forward_from: StateId,
        forward_target: StateId,
        backward_from: StateId,
        backward_target: StateId,
        spec: TransitionSpec,
    ) -> TransitionId {
        let transition = Transition {
            targets: [forward_target, backward_target],
            boundaries: spec.boundaries,
            caret_guard: spec.caret_guard,
            dollar_guard: spec.dollar_guard,
            guards: spec.guards,
        };
        let id = self.transitions.len();
        self.transitions.push(transition);
        self.states[forward_from].successors[Direction::Forward.index()]
            .push(id);
        self.states[backward_from].successors[Direction::Backward.index()]
            .push(id);
        id
    }

    pub fn finish(self) -> Nfa {
        let mut predecessor_counts = [
            vec![0u32; self.states.len()],
            vec![0u32; self.states.len()],
        ];
        for dir in [Direction::Forward, Direction::Backward] {
            for state in &self.states {
                for &tid in &state.successors[dir.index()] {
                    let target = self.transitions[tid].targets[dir.index()];
                    predecessor_counts[dir.index()][target] += 1;
                }
            }
        }
        Nfa {
            states: self.states,
            transitions: self.transitions,
            quantifiers: self.quantifiers,
            num_capture_slots: self.num_capture_slots,
            num_zero_width: self.num_zero_width,
            anchored_initial: self
                .anchored_initial
                .expect("NfaBuilder: anchored initial state not set"),
            unanchored_initial: self
                .unanchored_initial
                .expect("NfaBuilder: unanchored initial state not set"),
            initial_loop_back: self.initial_loop_back,
            predecessor_counts,
        }
    }
}
