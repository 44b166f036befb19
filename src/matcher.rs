//! Thompson NFA simulation.
//!
//! The matcher tracks active states with two index lists, one for the
//! current step and one for the next. A per-state `last_active` table
//! records the step at which each state was last entered, which makes the
//! duplicate check O(1) without clearing a visited set between steps; each
//! step therefore costs O(states), and a whole match O(states * input).
//!
//! All working memory is allocated when the matcher is created, sized to
//! the pattern's arena. Matching itself never allocates and never fails.

use smallvec::SmallVec;

use crate::arena::{State, StateArena, StateId};
use crate::Pattern;

/// Step number meaning "never entered".
const NEVER: usize = usize::MAX;

/// A reusable matcher for a compiled pattern.
///
/// A matcher borrows its pattern, so the pattern always outlives it, and
/// matching takes `&mut self`, so a matcher is never shared between
/// threads. Independent matchers may drive the same pattern concurrently.
pub struct Matcher<'a> {
    pattern: &'a Pattern,
    /// Active states for the current step.
    current: Vec<StateId>,
    /// Active states being collected for the next step.
    next: Vec<StateId>,
    /// Step at which each state was last entered.
    last_active: Vec<usize>,
}

impl<'a> Matcher<'a> {
    /// Create a matcher with working buffers sized to `pattern`.
    pub fn new(pattern: &'a Pattern) -> Self {
        let n = pattern.states.len();
        Self {
            pattern,
            current: Vec::with_capacity(n),
            next: Vec::with_capacity(n),
            last_active: vec![NEVER; n],
        }
    }

    /// Returns true if `input` as a whole matches the pattern.
    ///
    /// Matching is anchored at both ends; there is no substring search.
    /// The matcher resets itself first, so repeated calls are independent.
    pub fn is_match(&mut self, input: &str) -> bool {
        let states = &self.pattern.states;

        self.current.clear();
        self.next.clear();
        self.last_active.fill(NEVER);

        enter_state(
            states,
            &mut self.last_active,
            &mut self.current,
            0,
            self.pattern.start,
        );

        for (i, c) in input.bytes().enumerate() {
            let step = i + 1;

            // Advance every active range state that accepts this byte.
            self.next.clear();
            for &id in &self.current {
                if let State::Range { lo, hi, next } = states[id] {
                    if lo <= c && c <= hi {
                        enter_state(states, &mut self.last_active, &mut self.next, step, next);
                    }
                }
            }

            std::mem::swap(&mut self.current, &mut self.next);
        }

        self.current
            .iter()
            .any(|&id| matches!(states[id], State::Match))
    }
}

/// Add `s` and its epsilon successors to `list`, at most once per step.
///
/// Split states are expanded on the spot, so `list` only ever holds range
/// and match states. The work stack rarely outgrows its inline capacity
/// because epsilon chains are short in practice.
fn enter_state(
    states: &StateArena,
    last_active: &mut [usize],
    list: &mut Vec<StateId>,
    step: usize,
    s: StateId,
) {
    let mut stack: SmallVec<[StateId; 8]> = SmallVec::new();
    stack.push(s);

    while let Some(s) = stack.pop() {
        if s.is_none() || last_active[s.index()] == step {
            continue;
        }
        last_active[s.index()] = step;

        match states[s] {
            State::Split(out1, out2) => {
                stack.push(out1);
                stack.push(out2);
            }
            _ => list.push(s),
        }
    }
}
