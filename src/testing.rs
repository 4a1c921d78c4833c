//! Test utilities shared across unit tests.
//!
//! Compiled only under `cfg(test)`. Provides canonical constructors for
//! small hand-built automatons so unit tests across modules don't each
//! reinvent them.

#![doc(hidden)]

use crate::automaton::{Automaton, Symbol};

/// An automaton accepting exactly the one string `symbols` (a linear chain
/// of singleton-symbol transitions).
pub fn make_string_automaton(symbols: &[Symbol]) -> Automaton {
    let mut a = Automaton::new();
    let mut prev = a.create_state();
    for &sym in symbols {
        let next = a.create_state();
        a.add_transition(prev, next, sym, sym).unwrap();
        prev = next;
    }
    a.set_accept(prev, true);
    a.finish_state();
    a
}

/// A hand-built nondeterministic automaton with two states and overlapping
/// transitions, used to exercise the determinizer without going through the
/// Levenshtein builder: `0 --[a-c]--> 1` (accept), `0 --[b-d]--> 0`.
pub fn make_overlapping_nfa() -> Automaton {
    let mut a = Automaton::new();
    let s0 = a.create_state();
    let s1 = a.create_state();
    a.set_accept(s1, true);
    a.add_transition(s0, s1, b'a' as u32, b'c' as u32).unwrap();
    a.add_transition(s0, s0, b'b' as u32, b'd' as u32).unwrap();
    a.finish_state();
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::run;

    #[test]
    fn string_automaton_accepts_only_its_own_string() {
        let a = make_string_automaton(&[1, 2, 3]);
        assert!(run(&a, &[1, 2, 3]));
        assert!(!run(&a, &[1, 2]));
        assert!(!run(&a, &[1, 2, 3, 4]));
    }

    #[test]
    fn empty_symbol_list_accepts_only_empty_string() {
        let a = make_string_automaton(&[]);
        assert!(run(&a, &[]));
        assert!(!run(&a, &[1]));
    }

    #[test]
    fn overlapping_nfa_is_not_deterministic() {
        let a = make_overlapping_nfa();
        assert!(!a.is_deterministic());
    }
}
