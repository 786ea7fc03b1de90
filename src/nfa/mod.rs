// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The pure NFA: an immutable, already-compiled graph of states and
//! transitions. Nothing in this module parses a pattern or lowers an AST;
//! it only describes the graph the dispatcher walks. See `builder` for the
//! one way to construct one without a compiler.

pub mod builder;

use crate::charclass::CharClass;
use crate::direction::Direction;

pub type StateId = usize;
pub type TransitionId = usize;
pub type QuantifierId = usize;
pub type ZeroWidthId = usize;
pub type LookaroundId = usize;

/// The semantic kind of a state, a tagged variant rather than an
/// inheritance hierarchy (see design note in `spec.md` §9) so dispatch in
/// the evaluator/updater is a match on the tag.
#[derive(Clone, Debug)]
pub enum StateKind {
    /// The start/end bookends of a (sub-)match, per direction.
    InitialOrFinal(InitialOrFinalFlags),
    /// Consumes one character if it's a member of the class.
    CharacterClass(CharClass),
    /// A lookaround assertion, evaluated by a nested engine instance.
    Lookaround { sub_executor: LookaroundId, negated: bool },
    /// A backreference to a previously captured group.
    BackReference { group: usize },
    /// Marker for empty-match absorption in quantifier tails.
    EmptyMatch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InitialOrFinalFlags {
    pub anchored_initial: bool,
    pub unanchored_initial: bool,
    pub anchored_final: bool,
    pub unanchored_final: bool,
}

impl InitialOrFinalFlags {
    pub fn is_initial(&self) -> bool {
        self.anchored_initial || self.unanchored_initial
    }

    pub fn is_final(&self) -> bool {
        self.anchored_final || self.unanchored_final
    }
}

/// A state plus its ordered, per-direction successor transitions. Order
/// encodes greediness: higher priority first.
#[derive(Clone, Debug)]
pub struct State {
    pub kind: StateKind,
    successors: [Vec<TransitionId>; 2],
}

impl State {
    fn new(kind: StateKind) -> Self {
        State { kind, successors: [Vec::new(), Vec::new()] }
    }

    /// Ordered successor transitions for the given direction, highest
    /// priority first.
    pub fn successors(&self, dir: Direction) -> &[TransitionId] {
        &self.successors[dir.index()]
    }
}

/// Two bitsets over capture slots: positions to set to the current index,
/// and positions to clear (set to the unset sentinel).
#[derive(Clone, Debug, Default)]
pub struct GroupBoundaries {
    update: SlotSet,
    clear: SlotSet,
}

impl GroupBoundaries {
    pub fn new() -> Self {
        GroupBoundaries::default()
    }

    pub fn with_update(mut self, slot: usize) -> Self {
        self.update.insert(slot);
        self
    }

    pub fn with_clear(mut self, slot: usize) -> Self {
        self.clear.insert(slot);
        self
    }

    pub fn updates(&self, slot: usize) -> bool {
        self.update.contains(slot)
    }

    pub fn clears(&self, slot: usize) -> bool {
        self.clear.contains(slot)
    }

    pub fn updated_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.update.iter()
    }

    pub fn cleared_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.clear.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.update.0.is_empty() && self.clear.0.is_empty()
    }
}

/// A small sorted-Vec set; group counts are tiny (a handful of capture
/// slots per transition at most) so this beats a bitmap in both
/// simplicity and cache behaviour.
#[derive(Clone, Debug, Default)]
struct SlotSet(Vec<usize>);

impl SlotSet {
    fn insert(&mut self, slot: usize) {
        if let Err(i) = self.0.binary_search(&slot) {
            self.0.insert(i, slot);
        }
    }

    fn contains(&self, slot: usize) -> bool {
        self.0.binary_search(&slot).is_ok()
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// A `{min,max}` counter, optionally paired with a zero-width witness slot
/// used to forbid non-progressing repetition.
#[derive(Clone, Copy, Debug)]
pub struct Quantifier {
    pub index: usize,
    pub min: u32,
    /// `None` means unbounded.
    pub max: Option<u32>,
    pub zero_width_index: Option<ZeroWidthId>,
}

/// The guard-kind vocabulary from `spec.md` §3/§4.2/§4.3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    Enter,
    EnterInc,
    Loop,
    LoopInc,
    Exit,
    ExitReset,
    EnterZeroWidth,
    ExitZeroWidth,
    EnterEmptyMatch,
}

/// A counter operation attached to a transition, with a direction-specific
/// "reverse kind" used when the engine runs backward (for lookbehind).
#[derive(Clone, Copy, Debug)]
pub struct QuantifierGuard {
    pub quantifier: QuantifierId,
    forward_kind: GuardKind,
    backward_kind: GuardKind,
}

impl QuantifierGuard {
    pub fn symmetric(quantifier: QuantifierId, kind: GuardKind) -> Self {
        QuantifierGuard { quantifier, forward_kind: kind, backward_kind: kind }
    }

    pub fn new(
        quantifier: QuantifierId,
        forward_kind: GuardKind,
        backward_kind: GuardKind,
    ) -> Self {
        QuantifierGuard { quantifier, forward_kind, backward_kind }
    }

    pub fn kind(&self, dir: Direction) -> GuardKind {
        match dir {
            Direction::Forward => self.forward_kind,
            Direction::Backward => self.backward_kind,
        }
    }
}

/// An edge between two states. Carries a per-direction target (so the same
/// transition object can serve a bidirectionally-built NFA), the capture
/// boundary updates it applies on commit, the `^`/`$` guards, and its
/// ordered quantifier guards.
#[derive(Clone, Debug, Default)]
pub struct Transition {
    targets: [StateId; 2],
    pub boundaries: GroupBoundaries,
    pub caret_guard: bool,
    pub dollar_guard: bool,
    pub guards: Vec<QuantifierGuard>,
}

impl Transition {
    pub fn target(&self, dir: Direction) -> StateId {
        self.targets[dir.index()]
    }
}

/// The immutable, compiled NFA graph. Freely shareable once built: nothing
/// in the dispatcher ever mutates it.
#[derive(Clone, Debug)]
pub struct Nfa {
    states: Vec<State>,
    transitions: Vec<Transition>,
    quantifiers: Vec<Quantifier>,
    num_capture_slots: usize,
    num_zero_width: usize,
    anchored_initial: StateId,
    unanchored_initial: StateId,
    /// When true (pattern is not sticky and doesn't begin with `^`), the
    /// anchored initial state gets an extra transition to the unanchored
    /// initial state so each start position gets tried.
    pub initial_loop_back: bool,
    /// Predecessor counts per direction, precomputed at build time so the
    /// Sub-Matcher Driver's inlining test (`spec.md` §4.5) doesn't walk the
    /// whole graph on every evaluation.
    predecessor_counts: [Vec<u32>; 2],
}

impl Nfa {
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id]
    }

    pub fn quantifier(&self, id: QuantifierId) -> &Quantifier {
        &self.quantifiers[id]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_capture_slots(&self) -> usize {
        self.num_capture_slots
    }

    pub fn num_quantifiers(&self) -> usize {
        self.quantifiers.len()
    }

    pub fn num_zero_width(&self) -> usize {
        self.num_zero_width
    }

    pub fn anchored_initial(&self) -> StateId {
        self.anchored_initial
    }

    pub fn unanchored_initial(&self) -> StateId {
        self.unanchored_initial
    }

    /// How many transitions, in `dir`'s successor lists across the whole
    /// graph, target `state`. Used by the Sub-Matcher Driver's inlining
    /// test (`spec.md` §4.5): inlining is only sound when a lookaround has
    /// exactly one predecessor.
    pub fn predecessor_count(&self, dir: Direction, state: StateId) -> u32 {
        self.predecessor_counts[dir.index()][state]
    }

    /// Whether any transition in this graph writes or clears a capture
    /// slot. Used to decide whether a lookaround's sub-executor needs its
    /// captures merged into the caller, or can be inlined regardless of
    /// predecessor count (`spec.md` §4.5).
    pub fn writes_captures(&self) -> bool {
        self.transitions.iter().any(|t| !t.boundaries.is_empty())
    }
}
