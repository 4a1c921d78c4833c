//! The compiled run-automaton: an O(1)-per-symbol matcher built from a
//! determinized automaton, trading the per-step interval scan of
//! [`crate::automaton::Automaton::step`] for a flat `state * class` lookup
//! table.

use crate::automaton::{Automaton, Symbol};
use crate::error::{AutomatonError, Result};

const DIRECT_CLASSMAP_LIMIT: usize = 256;

/// An immutable, `Send + Sync` matcher compiled from a deterministic
/// automaton. Safe to share and read from any number of threads
/// concurrently.
#[derive(Debug, Clone)]
pub struct CompiledAutomaton {
    points: Vec<Symbol>,
    accept: Vec<bool>,
    /// `transitions[state * points.len() + class]`; `None` means no
    /// transition (dead).
    transitions: Vec<Option<usize>>,
    classmap: [u32; DIRECT_CLASSMAP_LIMIT + 1],
    num_classes: usize,
}

impl CompiledAutomaton {
    /// Builds a matcher from a deterministic automaton. Fails with
    /// `InvalidInput` if `a` is not deterministic.
    pub fn new(a: &Automaton) -> Result<Self> {
        if !a.is_deterministic() {
            return Err(AutomatonError::InvalidInput(
                "CompiledAutomaton requires a deterministic automaton".to_string(),
            ));
        }

        let points = a.get_start_points();
        let num_classes = points.len();
        let num_states = a.num_states();

        let mut transitions = vec![None; num_states * num_classes.max(1)];
        let mut accept = vec![false; num_states];
        for s in 0..num_states {
            accept[s] = a.is_accept(s);
            for (c, &point) in points.iter().enumerate() {
                transitions[s * num_classes + c] = a.step(s, point);
            }
        }

        let mut classmap = [0u32; DIRECT_CLASSMAP_LIMIT + 1];
        for (v, slot) in classmap.iter_mut().enumerate() {
            *slot = class_for(&points, v as Symbol) as u32;
        }

        Ok(Self {
            points,
            accept,
            transitions,
            classmap,
            num_classes,
        })
    }

    fn class_of(&self, v: Symbol) -> usize {
        if (v as usize) < self.classmap.len() {
            self.classmap[v as usize] as usize
        } else {
            class_for(&self.points, v)
        }
    }

    /// Runs `symbols` through the compiled automaton, returning whether it
    /// is accepted.
    pub fn matches(&self, symbols: &[Symbol]) -> bool {
        if self.accept.is_empty() {
            return false;
        }
        let mut state = 0usize;
        for &v in symbols {
            let c = self.class_of(v);
            match self.transitions[state * self.num_classes + c] {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.accept[state]
    }

    /// As [`Self::matches`], but operating on raw `&str` input (each `char`
    /// cast to its code point).
    pub fn matches_str(&self, s: &str) -> bool {
        let symbols = crate::symbols::chars_to_symbols(s);
        self.matches(&symbols)
    }

    pub fn num_states(&self) -> usize {
        self.accept.len()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Binary search over `points` for the class index `k` with
/// `points[k] <= v < points[k+1]`.
fn class_for(points: &[Symbol], v: Symbol) -> usize {
    match points.binary_search(&v) {
        Ok(i) => i,
        Err(i) => i - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::determinize::determinize;
    use crate::testing::make_overlapping_nfa;

    #[test]
    fn rejects_nondeterministic_input() {
        let a = make_overlapping_nfa();
        assert!(CompiledAutomaton::new(&a).is_err());
    }

    #[test]
    fn compiled_matches_agrees_with_run() {
        let a = determinize(&make_overlapping_nfa());
        let compiled = CompiledAutomaton::new(&a).unwrap();
        for s in ["a", "b", "abc", "bbbb", "abcd", "", "z"] {
            let symbols: Vec<Symbol> = s.bytes().map(|b| b as Symbol).collect();
            assert_eq!(
                compiled.matches(&symbols),
                crate::algebra::run(&a, &symbols),
                "mismatch on {s:?}"
            );
        }
    }

    #[test]
    fn full_sigma_star_accepts_everything() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        a.set_accept(s0, true);
        a.add_transition(s0, s0, 0, a.alpha_max()).unwrap();
        a.finish_state();
        let compiled = CompiledAutomaton::new(&a).unwrap();
        assert!(compiled.matches(&[]));
        assert!(compiled.matches(&[1, 2, 3, 500, 90000]));
    }

    #[test]
    fn classmap_matches_binary_search_beyond_direct_range() {
        let mut a = Automaton::new();
        let s0 = a.create_state();
        let s1 = a.create_state();
        a.set_accept(s1, true);
        a.add_transition(s0, s1, 1000, 2000).unwrap();
        a.finish_state();
        let compiled = CompiledAutomaton::new(&a).unwrap();
        assert!(compiled.matches(&[1500]));
        assert!(!compiled.matches(&[3000]));
    }
}
