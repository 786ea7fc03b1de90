// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end scenarios from `spec.md` §8, each NFA hand-assembled with
//! `nfa::builder::NfaBuilder` since this crate never parses a pattern
//! string. The "find the next match start" loop is out of scope for the
//! engine (`spec.md` §1), so these tests drive it themselves where a
//! scenario needs to try more than one start position.

use std::sync::Arc;

use nfa_backtrack_core::cancel::CancellationToken;
use nfa_backtrack_core::charclass::CharClass;
use nfa_backtrack_core::nfa::builder::{NfaBuilder, TransitionSpec};
use nfa_backtrack_core::nfa::{
    GroupBoundaries, GuardKind, InitialOrFinalFlags, Nfa, QuantifierGuard, StateKind,
};
use nfa_backtrack_core::submatch::SubExecutors;
use nfa_backtrack_core::{Direction, Engine, MatchOutcome};

fn unanchored_init(b: &mut NfaBuilder) -> usize {
    let init = b.add_state(StateKind::InitialOrFinal(InitialOrFinalFlags {
        anchored_initial: true,
        unanchored_initial: true,
        ..Default::default()
    }));
    b.set_anchored_initial(init);
    b.set_unanchored_initial(init);
    init
}

fn unanchored_fin(b: &mut NfaBuilder) -> usize {
    b.add_state(StateKind::InitialOrFinal(InitialOrFinalFlags {
        unanchored_final: true,
        ..Default::default()
    }))
}

/// Runs `engine` at every start position in `[0, input.len()]` in order and
/// returns the first match found, mirroring the host's outer "find next
/// match start" loop that this crate deliberately doesn't implement.
fn find_first(engine: &Engine, input: &str) -> Option<(usize, Vec<isize>)> {
    let len = input.chars().count();
    for start in 0..=len {
        let mut frame = engine.create_frame(start, start, len);
        match engine.execute(&mut frame, input, false).unwrap() {
            MatchOutcome::Matched(caps) => return Some((start, caps)),
            MatchOutcome::NoMatch => continue,
            MatchOutcome::Cancelled => panic!("unexpected cancellation"),
        }
    }
    None
}

/// Scenario 1 (`spec.md` §8): `(a+)(a+)` on `"aaaa"` greedily splits as
/// `[0,4,0,3,3,4]` — the first group takes everything it can, leaving the
/// second group exactly one character.
#[test]
fn greedy_split_of_two_plus_groups() {
    let nfa = two_plus_groups_with_boundaries();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let (start, caps) = find_first(&engine, "aaaa").expect("expected a match");
    assert_eq!(start, 0);
    assert_eq!(caps, vec![0, 4, 0, 3, 3, 4]);
}

fn two_plus_groups_with_boundaries() -> Nfa {
    let mut b = NfaBuilder::new(3);
    let init = unanchored_init(&mut b);
    let g1_open = b.add_state(StateKind::EmptyMatch);
    let g1_char = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let g1_close = b.add_state(StateKind::EmptyMatch);
    let g2_open = b.add_state(StateKind::EmptyMatch);
    let g2_char = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let g2_close = b.add_state(StateKind::EmptyMatch);
    let fin = unanchored_fin(&mut b);

    let q1 = b.add_quantifier(1, None, true);
    let q2 = b.add_quantifier(1, None, true);

    b.add_transition(
        init,
        g1_open,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0).with_update(2)),
    );
    b.add_transition(g1_open, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Enter)));
    b.add_transition(g1_char, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Loop)));
    b.add_transition(g1_char, g1_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Exit)));
    b.add_transition(
        g1_close,
        g2_open,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(3).with_update(4)),
    );
    b.add_transition(g2_open, g2_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Enter)));
    b.add_transition(g2_char, g2_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Loop)));
    b.add_transition(g2_char, g2_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Exit)));
    b.add_transition(
        g2_close,
        fin,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1).with_update(5)),
    );
    b.finish()
}

/// Scenario 2 (`spec.md` §8): `(a+?)(a+)` on `"aaaa"` — the first group is
/// reluctant, so it commits to one character and the greedy second group
/// eats the rest: `[0,4,0,1,1,4]`.
fn reluctant_then_greedy_plus_groups() -> Nfa {
    let mut b = NfaBuilder::new(3);
    let init = unanchored_init(&mut b);
    let g1_open = b.add_state(StateKind::EmptyMatch);
    let g1_char = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let g1_close = b.add_state(StateKind::EmptyMatch);
    let g2_open = b.add_state(StateKind::EmptyMatch);
    let g2_char = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let g2_close = b.add_state(StateKind::EmptyMatch);
    let fin = unanchored_fin(&mut b);

    let q1 = b.add_quantifier(1, None, true);
    let q2 = b.add_quantifier(1, None, true);

    b.add_transition(
        init,
        g1_open,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0).with_update(2)),
    );
    b.add_transition(g1_open, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Enter)));
    // Reluctant: exit (higher priority) before looping again.
    b.add_transition(g1_char, g1_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Exit)));
    b.add_transition(g1_char, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q1, GuardKind::Loop)));
    b.add_transition(
        g1_close,
        g2_open,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(3).with_update(4)),
    );
    b.add_transition(g2_open, g2_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Enter)));
    b.add_transition(g2_char, g2_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Loop)));
    b.add_transition(g2_char, g2_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q2, GuardKind::Exit)));
    b.add_transition(
        g2_close,
        fin,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1).with_update(5)),
    );
    b.finish()
}

#[test]
fn reluctant_first_group_takes_only_what_it_must() {
    let nfa = reluctant_then_greedy_plus_groups();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let (start, caps) = find_first(&engine, "aaaa").expect("expected a match");
    assert_eq!(start, 0);
    assert_eq!(caps, vec![0, 4, 0, 1, 1, 4]);
}

fn word_char_class() -> CharClass {
    CharClass::new(vec![('a', 'z'), ('A', 'Z'), ('0', '9'), ('_', '_')])
}

/// Scenario 3 (`spec.md` §8): `(\w+) \1` on `"foo foo"` — a backreference
/// to the captured word compares equal against the second "foo":
/// `[0,7,0,3]`.
fn word_then_space_then_backreference() -> Nfa {
    let mut b = NfaBuilder::new(2);
    let init = unanchored_init(&mut b);
    let g1_open = b.add_state(StateKind::EmptyMatch);
    let g1_char = b.add_state(StateKind::CharacterClass(word_char_class()));
    let g1_close = b.add_state(StateKind::EmptyMatch);
    let space = b.add_state(StateKind::CharacterClass(CharClass::single(' ')));
    let backref = b.add_state(StateKind::BackReference { group: 1 });
    let fin = unanchored_fin(&mut b);

    let q = b.add_quantifier(1, None, true);

    b.add_transition(
        init,
        g1_open,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0).with_update(2)),
    );
    b.add_transition(g1_open, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Enter)));
    b.add_transition(g1_char, g1_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Loop)));
    b.add_transition(g1_char, g1_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Exit)));
    b.add_transition(
        g1_close,
        space,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(3)),
    );
    b.add_transition(space, backref, TransitionSpec::new());
    b.add_transition(backref, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    b.finish()
}

#[test]
fn backreference_matches_repeated_word() {
    let nfa = word_then_space_then_backreference();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let (start, caps) = find_first(&engine, "foo foo").expect("expected a match");
    assert_eq!(start, 0);
    assert_eq!(caps, vec![0, 7, 0, 3]);
}

#[test]
fn backreference_rejects_mismatched_repeat() {
    let nfa = word_then_space_then_backreference();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    assert!(find_first(&engine, "foo bar").is_none());
}

fn digit_class() -> CharClass {
    CharClass::new(vec![('0', '9')])
}

/// Sub-NFA for `(\d+)`, used as the positive lookahead's sub-executor in
/// scenario 4. Its own capture slots 2/3 line up with the outer group 1
/// (`submatch::merge_captures`'s "two arrays share the same global group
/// numbering"); slots 0/1 are left unset since the outer pattern has no
/// use for the lookahead's own extent.
fn digits_lookahead_sub_nfa() -> Nfa {
    let mut b = NfaBuilder::new(2);
    let init = unanchored_init(&mut b);
    let open = b.add_state(StateKind::EmptyMatch);
    let ch = b.add_state(StateKind::CharacterClass(digit_class()));
    let close = b.add_state(StateKind::EmptyMatch);
    let fin = unanchored_fin(&mut b);
    let q = b.add_quantifier(1, None, true);

    b.add_transition(init, open, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(2)));
    b.add_transition(open, ch, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Enter)));
    b.add_transition(ch, ch, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Loop)));
    b.add_transition(ch, close, TransitionSpec::new().guard(QuantifierGuard::symmetric(q, GuardKind::Exit)));
    b.add_transition(close, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(3)));
    b.finish()
}

/// Scenario 4 (`spec.md` §8): `(?=(\d+))\d` on `"123"` — a capturing
/// positive lookahead followed by one literal `\d`: `[0,1,0,3]`. The
/// lookahead writes captures, so it's never inlined regardless of
/// predecessor count (`submatch::is_inlineable`).
fn positive_lookahead_with_capture() -> Nfa {
    let mut b = NfaBuilder::new(2);
    let init = unanchored_init(&mut b);
    let lookaround = b.add_state(StateKind::Lookaround { sub_executor: 0, negated: false });
    let digit = b.add_state(StateKind::CharacterClass(digit_class()));
    let fin = unanchored_fin(&mut b);

    b.add_transition(init, lookaround, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));
    b.add_transition(lookaround, digit, TransitionSpec::new());
    b.add_transition(digit, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    b.finish()
}

#[test]
fn positive_lookahead_captures_and_outer_consumes_one_digit() {
    let sub = Engine::new(
        digits_lookahead_sub_nfa(),
        Direction::Forward,
        SubExecutors::new(Vec::new()),
        false,
        None,
        CancellationToken::new(),
    );
    let engine = Engine::new(
        positive_lookahead_with_capture(),
        Direction::Forward,
        SubExecutors::new(vec![Arc::new(sub)]),
        false,
        None,
        CancellationToken::new(),
    );
    let (start, caps) = find_first(&engine, "123").expect("expected a match");
    assert_eq!(start, 0);
    assert_eq!(caps, vec![0, 1, 0, 3]);
}

/// Sub-NFA for a bare literal `b`, used as the negative lookahead's
/// sub-executor in scenario 5. Writes no captures, so together with
/// `negated: true` the lookaround is inlineable either way.
fn literal_b_sub_nfa() -> Nfa {
    let mut b = NfaBuilder::new(1);
    let init = unanchored_init(&mut b);
    let ch = b.add_state(StateKind::CharacterClass(CharClass::single('b')));
    let fin = unanchored_fin(&mut b);
    b.add_transition(init, ch, TransitionSpec::new());
    b.add_transition(ch, fin, TransitionSpec::new());
    b.finish()
}

/// Scenario 5 (`spec.md` §8): `a(?!b)` on `"ab ac"` — the negative
/// lookahead at index 0 (followed by `b`) rejects, so the match is found
/// only at index 3 (followed by `c`), `[3,4]`.
fn a_not_followed_by_b() -> Nfa {
    let mut b = NfaBuilder::new(1);
    let init = unanchored_init(&mut b);
    let a_state = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let lookaround = b.add_state(StateKind::Lookaround { sub_executor: 0, negated: true });
    let fin = unanchored_fin(&mut b);

    b.add_transition(init, a_state, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));
    b.add_transition(a_state, lookaround, TransitionSpec::new());
    b.add_transition(lookaround, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    b.finish()
}

#[test]
fn negative_lookahead_skips_the_disallowed_occurrence() {
    let sub = Engine::new(
        literal_b_sub_nfa(),
        Direction::Forward,
        SubExecutors::new(Vec::new()),
        false,
        None,
        CancellationToken::new(),
    );
    let engine = Engine::new(
        a_not_followed_by_b(),
        Direction::Forward,
        SubExecutors::new(vec![Arc::new(sub)]),
        false,
        None,
        CancellationToken::new(),
    );
    let (start, caps) = find_first(&engine, "ab ac").expect("expected a match");
    assert_eq!(start, 3);
    assert_eq!(caps, vec![3, 4]);
}

/// Scenario 6 (`spec.md` §8): `(a*)*b` must not match `"aaaac"` (no
/// trailing `b`), and — the real point of this case — must not loop
/// forever doing it. The inner `(a*)` can itself match empty, so the
/// outer `*` needs `spec.md` §4.3's `exitZeroWidth` guard (armed by
/// `enterZeroWidth` each time the outer loop is re-entered) to refuse a
/// second zero-consuming outer iteration at the same index.
///
/// `outer_open` is revisited on every outer iteration (the body always
/// loops back to it rather than to a separate "repeat" state), so the
/// single `outer_open -> inner_open` transition carries the outer
/// quantifier's `Enter` guard for both the first and every subsequent
/// iteration; there's no separate `Loop` edge to keep in sync with it.
fn nested_star_then_b() -> Nfa {
    let mut b = NfaBuilder::new(2);
    let init = unanchored_init(&mut b);

    // Outer `(...)*`
    let outer_open = b.add_state(StateKind::EmptyMatch);
    let outer_close = b.add_state(StateKind::EmptyMatch);
    let outer_q = b.add_quantifier(0, None, true);

    // Inner `(a*)`
    let inner_open = b.add_state(StateKind::EmptyMatch);
    let a_char = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let inner_close = b.add_state(StateKind::EmptyMatch);
    let inner_q = b.add_quantifier(0, None, false);

    let b_char = b.add_state(StateKind::CharacterClass(CharClass::single('b')));
    let fin = unanchored_fin(&mut b);

    b.add_transition(init, outer_open, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));

    // Enter (or repeat) one outer iteration: higher priority than
    // skipping straight to `b`, so the engine always tries to match more
    // first (greedy `*`). Blocked outright once a prior iteration through
    // here consumed nothing.
    b.add_transition(
        outer_open,
        inner_open,
        TransitionSpec::new()
            .guard(QuantifierGuard::symmetric(outer_q, GuardKind::Enter))
            .guard(QuantifierGuard::symmetric(outer_q, GuardKind::ExitZeroWidth))
            .guard(QuantifierGuard::symmetric(outer_q, GuardKind::EnterZeroWidth))
            .boundaries(GroupBoundaries::new().with_update(2)),
    );
    // Stop the outer loop (min is 0, so this is always eligible once
    // nothing higher-priority admits).
    b.add_transition(outer_open, b_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(outer_q, GuardKind::Exit)));

    b.add_transition(inner_open, a_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(inner_q, GuardKind::Enter)));
    b.add_transition(a_char, a_char, TransitionSpec::new().guard(QuantifierGuard::symmetric(inner_q, GuardKind::Loop)));
    b.add_transition(a_char, inner_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(inner_q, GuardKind::Exit)));
    // Zero `a`s this iteration (inner min is 0 too).
    b.add_transition(inner_open, inner_close, TransitionSpec::new().guard(QuantifierGuard::symmetric(inner_q, GuardKind::Exit)));

    b.add_transition(
        inner_close,
        outer_close,
        TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(3)),
    );
    b.add_transition(outer_close, outer_open, TransitionSpec::new());
    b.add_transition(b_char, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    b.finish()
}

#[test]
fn nested_star_with_no_trailing_b_does_not_match_and_terminates() {
    let nfa = nested_star_then_b();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    // No `b` anywhere in the input: every start position must fail, and
    // must do so in finite time (the test itself times out at the
    // process level if the dispatcher ever spins).
    assert!(find_first(&engine, "aaaac").is_none());
}

#[test]
fn nested_star_matches_when_b_is_present() {
    let nfa = nested_star_then_b();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let (start, caps) = find_first(&engine, "aaab").expect("expected a match");
    assert_eq!(start, 0);
    assert_eq!(caps[0], 0);
    assert_eq!(caps[1], 4);
}

/// Termination scales to long runs of `a` before the eventual failure,
/// not just the four-character example in §8's table: this is the
/// "polynomial, not exponential" guarantee the zero-width guard buys.
#[test]
fn nested_star_terminates_on_long_non_matching_input() {
    let nfa = nested_star_then_b();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let input: String = "a".repeat(200) + "c";
    assert!(find_first(&engine, &input).is_none());
}

/// `fromIndex > 0` with a non-sticky pattern: `spec.md` §6's `createFrame`
/// takes an explicit `from_index`/`index` pair, and a host driving
/// `initial_loop_back` semantics itself (as `find_first` does here) must
/// still find the match starting mid-string rather than requiring it at
/// position 0.
#[test]
fn from_index_greater_than_zero_finds_a_later_match() {
    let nfa = a_not_followed_by_b_simple();
    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let input = "xxaxx";
    let len = input.chars().count();

    // Starting the search at index 3 must not find the `a` at index 2.
    let mut frame = engine.create_frame(3, 3, len);
    let outcome = engine.execute(&mut frame, input, false).unwrap();
    assert_eq!(outcome, MatchOutcome::NoMatch);

    // Starting at index 0 (scanning forward, as `initial_loop_back` would
    // direct a host to do) finds it at 2.
    let (start, caps) = find_first(&engine, input).expect("expected a match");
    assert_eq!(start, 2);
    assert_eq!(caps, vec![2, 3]);
}

fn a_not_followed_by_b_simple() -> Nfa {
    let mut b = NfaBuilder::new(1);
    let init = unanchored_init(&mut b);
    let ch = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let fin = unanchored_fin(&mut b);
    b.add_transition(init, ch, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));
    b.add_transition(ch, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    b.finish()
}

/// `initial_loop_back` itself: an anchored-initial state with the flag
/// set gets an implicit extra, lowest-priority hop to the
/// unanchored-initial state, which in turn has the same try-then-retry
/// shape, so a single `Engine::execute` call gets the same "retry at
/// each position" behaviour `find_first` otherwise builds by hand. This
/// only matters when `anchored_initial != unanchored_initial`; the
/// scenarios above all share one state for both because they have no `^`
/// anchor to distinguish, so this test builds a graph where they differ.
#[test]
fn initial_loop_back_retries_at_each_position_from_one_call() {
    let mut b = NfaBuilder::new(1);
    let anchored = b.add_state(StateKind::InitialOrFinal(InitialOrFinalFlags {
        anchored_initial: true,
        ..Default::default()
    }));
    let unanchored = b.add_state(StateKind::InitialOrFinal(InitialOrFinalFlags {
        unanchored_initial: true,
        ..Default::default()
    }));
    let ch = b.add_state(StateKind::CharacterClass(CharClass::single('a')));
    let fin = unanchored_fin(&mut b);
    b.set_anchored_initial(anchored);
    b.set_unanchored_initial(unanchored);
    b.set_initial_loop_back(true);

    // Try matching at the current position first (higher priority); only
    // fall back to advancing the start position when that's not
    // possible. Both initial states share this same "try here" edge into
    // the pattern body, and each also has its own lower-priority retry
    // hop onward.
    b.add_transition(anchored, ch, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));
    b.add_transition(anchored, unanchored, TransitionSpec::new());
    b.add_transition(unanchored, ch, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(0)));
    b.add_transition(unanchored, unanchored, TransitionSpec::new());
    b.add_transition(ch, fin, TransitionSpec::new().boundaries(GroupBoundaries::new().with_update(1)));
    let nfa = b.finish();

    let engine = Engine::new(nfa, Direction::Forward, SubExecutors::new(Vec::new()), false, None, CancellationToken::new());
    let mut frame = engine.create_frame(0, 0, 5);
    let outcome = engine.execute(&mut frame, "xxaxx", false).unwrap();
    assert_eq!(outcome, MatchOutcome::Matched(vec![2, 3]));
}
