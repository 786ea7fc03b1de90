// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error handling (`spec.md` §7). Only the two fatal "corrupt NFA"
//! conditions are errors; "no match" and "cancelled" are ordinary control
//! flow and are represented by `MatchOutcome`, not by `EngineError`.

use crate::nfa::{LookaroundId, StateId};

/// A fatal condition signalling that the `Nfa` handed to the engine is
/// internally inconsistent. Neither variant should ever be reachable from
/// an `Nfa` assembled by a correct compiler; both are fatal rather than
/// recoverable because there is no sane way to keep matching once the
/// graph itself can't be trusted.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A state was reached whose `kind` the dispatcher, evaluator or
    /// updater doesn't recognize, or an impossible branch was taken while
    /// computing the next input index.
    #[error("internal invariant violated: unreachable state {state}")]
    UnreachableState { state: StateId },

    /// A `Lookaround` state referenced a sub-executor id with no
    /// registered executor.
    #[error("internal invariant violated: no sub-executor registered for lookaround {lookaround}")]
    MissingSubExecutor { lookaround: LookaroundId },
}

/// The result of `Engine::execute`: a produced capture array, an absence
/// of a match, or cooperative cancellation. None of these three are
/// `EngineError`s (`spec.md` §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(Vec<isize>),
    NoMatch,
    Cancelled,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    pub fn into_captures(self) -> Option<Vec<isize>> {
        match self {
            MatchOutcome::Matched(caps) => Some(caps),
            MatchOutcome::NoMatch | MatchOutcome::Cancelled => None,
        }
    }
}
