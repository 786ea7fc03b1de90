// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Transition Evaluator (`spec.md` §4.3): decides whether a single
//! transition is admissible from the current frame, without mutating
//! anything. Guard checks come first (cheapest to fail fast on), then a
//! test that depends on the transition's target state kind.

use crate::direction::Direction;
use crate::error::EngineError;
use crate::frame::Frame;
use crate::groups::resolved_group;
use crate::input::{CaseFold, InputCursor};
use crate::nfa::{GuardKind, Nfa, StateKind, Transition};
use crate::submatch::{self, SubExecutors};

/// Tests whether `transition` may be taken from `frame`'s current
/// position. `current_char` is the character the dispatcher already read
/// via `InputCursor::next_in_direction` for this step.
#[allow(clippy::too_many_arguments)]
pub fn transition_matches<C: InputCursor>(
    nfa: &Nfa,
    dir: Direction,
    transition: &Transition,
    frame: &Frame,
    cursor: &C,
    current_char: Option<char>,
    case_insensitive: bool,
    case_fold: Option<&CaseFold>,
    sub_executors: &SubExecutors,
) -> Result<bool, EngineError> {
    if transition.caret_guard && frame.index != 0 {
        return Ok(false);
    }
    if transition.dollar_guard && frame.index != frame.max_index {
        return Ok(false);
    }

    if !quantifier_guards_admit(nfa, dir, transition, frame) {
        return Ok(false);
    }

    let target_id = transition.target(dir);
    let target = nfa.state(target_id);

    let admits = match &target.kind {
        StateKind::InitialOrFinal(flags) => {
            if flags.unanchored_initial {
                !cursor.at_end(frame.index, dir)
            } else if flags.anchored_final {
                cursor.at_end(frame.index, dir)
            } else {
                true
            }
        }
        StateKind::CharacterClass(class) => match current_char {
            Some(c) => class.contains(c),
            None => false,
        },
        StateKind::Lookaround { .. } => {
            if submatch::is_inlineable(nfa, dir, target_id, sub_executors)? {
                let (admitted, _merge) =
                    submatch::run_sub_match(nfa, cursor, frame, target_id, sub_executors)?;
                admitted
            } else {
                // Evaluated for real by the dispatcher once it lands on
                // this state; admissible here just to let the transition
                // through.
                true
            }
        }
        StateKind::BackReference { group } => {
            backreference_admits(transition, frame, cursor, dir, *group, case_insensitive, case_fold)
        }
        StateKind::EmptyMatch => true,
    };

    Ok(admits)
}

/// Per-guard admissibility, `spec.md` §4.3. Order doesn't matter for
/// admissibility (unlike the Frame Updater's *application* order), so this
/// walks the list forward regardless of direction.
fn quantifier_guards_admit(nfa: &Nfa, dir: Direction, transition: &Transition, frame: &Frame) -> bool {
    for guard in &transition.guards {
        let q = nfa.quantifier(guard.quantifier);
        let count = frame.quant_counts[q.index];
        match guard.kind(dir) {
            GuardKind::Enter | GuardKind::Loop => {
                if let Some(max) = q.max {
                    if count >= max {
                        return false;
                    }
                }
            }
            GuardKind::Exit => {
                if count < q.min {
                    return false;
                }
            }
            GuardKind::EnterEmptyMatch => {
                if count >= q.min {
                    return false;
                }
            }
            GuardKind::ExitZeroWidth => {
                if let Some(zw) = q.zero_width_index {
                    let witness = frame.zero_width[zw];
                    // A quantifier with `min == 0` has already satisfied
                    // its minimum with zero iterations, so a second
                    // zero-width iteration at the same index can never
                    // make progress: reject outright. One with `min > 0`
                    // may still need empty iterations to reach that
                    // minimum, so it's only rejected once it's gone past
                    // it (`count > q.min`).
                    let no_counter = q.min == 0;
                    if witness == frame.index as isize && (no_counter || count > q.min) {
                        return false;
                    }
                }
            }
            GuardKind::EnterInc | GuardKind::LoopInc | GuardKind::ExitReset | GuardKind::EnterZeroWidth => {}
        }
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn backreference_admits<C: InputCursor>(
    transition: &Transition,
    frame: &Frame,
    cursor: &C,
    dir: Direction,
    group: usize,
    case_insensitive: bool,
    case_fold: Option<&CaseFold>,
) -> bool {
    let (start, end) = resolved_group(transition, frame, group);
    if start < 0 || end < 0 || end <= start {
        // Unset or empty-length group: a backreference to it always
        // succeeds without consuming input (`spec.md` §4.3).
        return true;
    }
    let len = (end - start) as usize;
    let (anchor, fits) = match dir {
        Direction::Forward => (start as usize, frame.index + len <= frame.max_index),
        Direction::Backward => (end as usize, frame.index >= len),
    };
    if !fits {
        return false;
    }
    if cursor.region_matches(anchor, frame.index, len, dir, case_insensitive) {
        return true;
    }
    if case_insensitive {
        if let Some(fold) = case_fold {
            return cursor.region_matches_with(anchor, frame.index, len, dir, fold);
        }
    }
    false
}
