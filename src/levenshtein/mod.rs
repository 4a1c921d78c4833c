//! Parametric Levenshtein automaton construction: turns a query word plus
//! an edit-distance degree into an [`Automaton`] that accepts exactly the
//! strings within that many edits (optionally counting an adjacent-character
//! swap as one edit).
//!
//! Builds an NFA over position sets, then drives a real
//! [`Automaton`]/[`crate::determinize`]/[`crate::minimize`] pipeline end to
//! end rather than falling back to a DP distance check at match time.

mod tables;

use crate::automaton::{Automaton, Symbol, DEFAULT_ALPHA_MAX};
use crate::error::{AutomatonError, Result};
use tables::{description_for, Kind};

/// The largest edit-distance degree this builder supports. `n` above this
/// is an `InvalidInput` error.
pub const MAXIMUM_SUPPORTED_DISTANCE: u8 = 2;

/// Builds Levenshtein (or Damerau-Levenshtein, with `with_transpositions`)
/// automatons for a fixed query word.
#[derive(Debug, Clone)]
pub struct LevenshteinAutomata {
    word: Vec<Symbol>,
    with_transpositions: bool,
    alpha_max: Symbol,
}

impl LevenshteinAutomata {
    pub fn new(word: &[Symbol], with_transpositions: bool) -> Self {
        Self { word: word.to_vec(), with_transpositions, alpha_max: DEFAULT_ALPHA_MAX }
    }

    /// Widens the symbol ceiling beyond the default 16-bit-code-unit range,
    /// for callers that need full Unicode code points as symbols.
    pub fn with_alpha_max(mut self, alpha_max: Symbol) -> Self {
        self.alpha_max = alpha_max;
        self
    }

    /// Builds the automaton accepting every string within edit distance `n`
    /// of the query word, optionally prefixed with a literal string that
    /// must match exactly. `n` must be in `0..=2`.
    pub fn to_automaton(&self, n: u8, prefix: &[Symbol]) -> Result<Automaton> {
        if n > MAXIMUM_SUPPORTED_DISTANCE {
            return Err(AutomatonError::InvalidInput(format!(
                "edit distance {n} exceeds MAXIMUM_SUPPORTED_DISTANCE ({MAXIMUM_SUPPORTED_DISTANCE})"
            )));
        }

        let body = if n == 0 {
            linear_chain(&self.word, self.alpha_max)
        } else {
            let kind = Kind::for_degree(n, self.with_transpositions)
                .expect("n in 1..=MAXIMUM_SUPPORTED_DISTANCE always has a Kind");
            self.build_nondegenerate(kind)?
        };

        if prefix.is_empty() {
            Ok(body)
        } else {
            let chain = linear_chain(prefix, self.alpha_max);
            crate::algebra::concatenate(&[chain, body])
        }
    }

    fn build_nondegenerate(&self, kind: Kind) -> Result<Automaton> {
        let desc = description_for(kind);
        let w = self.word.len();
        let n = desc.max_errors() as i32;
        let range = desc.range();
        let num_states = desc.size() * (w + 1);

        let mut a = Automaton::with_alpha_max(self.alpha_max);
        a.create_states(num_states);

        for abs in 0..num_states {
            let state_index = abs / (w + 1);
            let offset = abs % (w + 1);
            let remaining = (w - offset) as i32;
            a.set_accept(abs, remaining + desc.min_errors(state_index) <= n);
        }

        let mut alphabet: Vec<Symbol> = self.word.clone();
        alphabet.sort_unstable();
        alphabet.dedup();

        for abs in 0..num_states {
            let state_index = abs / (w + 1);
            let xpos = abs % (w + 1);

            for &ch in &alphabet {
                let cvec = characteristic_vector(&self.word, xpos, ch, range);
                if let Some((next_state, delta)) = desc.transition(state_index, cvec) {
                    let dest = next_state * (w + 1) + clamp_offset(xpos, delta, w);
                    a.add_transition(abs, dest, ch, ch)?;
                }
            }

            for (lo, hi) in complementary_ranges(&alphabet, self.alpha_max) {
                if let Some((next_state, delta)) = desc.transition(state_index, 0) {
                    let dest = next_state * (w + 1) + clamp_offset(xpos, delta, w);
                    a.add_transition(abs, dest, lo, hi)?;
                }
            }
        }
        a.finish_state();
        Ok(a)
    }
}

fn clamp_offset(xpos: usize, delta: i32, w: usize) -> usize {
    (xpos as i32 + delta).clamp(0, w as i32) as usize
}

/// `cvec = 0; for i in [xpos, min(w, xpos+range)): cvec = (cvec<<1)|(word[i]==ch)`,
/// zero-padded up to `range` bits when the word runs out before the window
/// does.
fn characteristic_vector(word: &[Symbol], xpos: usize, ch: Symbol, range: usize) -> u64 {
    let w = word.len();
    let hi = (xpos + range).min(w);
    let mut cvec: u64 = 0;
    for &wc in &word[xpos..hi] {
        cvec = (cvec << 1) | u64::from(wc == ch);
    }
    cvec << (range - (hi - xpos))
}

/// The ranges covering `[0, alpha_max] \ alphabet`, `alphabet` sorted and
/// deduplicated first.
fn complementary_ranges(alphabet: &[Symbol], alpha_max: Symbol) -> Vec<(Symbol, Symbol)> {
    let mut ranges = Vec::new();
    let mut next = 0u32;
    for &a in alphabet {
        if a > next {
            ranges.push((next, a - 1));
        }
        next = a.saturating_add(1);
    }
    if next <= alpha_max {
        ranges.push((next, alpha_max));
    }
    ranges
}

fn linear_chain(symbols: &[Symbol], alpha_max: Symbol) -> Automaton {
    let mut a = Automaton::with_alpha_max(alpha_max);
    let mut prev = a.create_state();
    for &sym in symbols {
        let next = a.create_state();
        a.add_transition(prev, next, sym, sym).expect("literal symbol in range");
        prev = next;
    }
    a.set_accept(prev, true);
    a.finish_state();
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::run;
    use crate::compiled::CompiledAutomaton;
    use crate::determinize::determinize;
    use crate::minimize::minimize;
    use crate::symbols::chars_to_symbols;

    fn accepts(word: &str, n: u8, transpose: bool, candidate: &str) -> bool {
        let lev = LevenshteinAutomata::new(&chars_to_symbols(word), transpose);
        let a = lev.to_automaton(n, &[]).unwrap();
        run(&a, &chars_to_symbols(candidate))
    }

    #[test]
    fn degree_zero_is_exact_match() {
        assert!(accepts("cat", 0, false, "cat"));
        assert!(!accepts("cat", 0, false, "cats"));
        assert!(!accepts("cat", 0, false, "bat"));
    }

    #[test]
    fn degree_one_accepts_single_substitution() {
        assert!(accepts("cat", 1, false, "cot"));
        assert!(accepts("cat", 1, false, "cat"));
        assert!(!accepts("cat", 1, false, "cog"));
    }

    #[test]
    fn degree_one_accepts_single_insertion_and_deletion() {
        assert!(accepts("cat", 1, false, "cats"));
        assert!(accepts("cat", 1, false, "ct"));
        assert!(!accepts("cat", 1, false, "cats!"));
    }

    #[test]
    fn degree_two_accepts_two_edits() {
        assert!(accepts("kitten", 2, false, "sitten"));
        assert!(accepts("kitten", 2, false, "sittin"));
        assert!(!accepts("kitten", 1, false, "sittin"));
    }

    #[test]
    fn transposition_counts_as_one_edit_only_when_enabled() {
        assert!(accepts("ab", 1, true, "ba"));
        assert!(!accepts("ab", 0, true, "ba"));
    }

    #[test]
    fn empty_word_degree_n_accepts_short_strings() {
        assert!(accepts("", 1, false, ""));
        assert!(accepts("", 1, false, "a"));
        assert!(!accepts("", 1, false, "ab"));
    }

    #[test]
    fn rejects_distance_exceeding_maximum_supported() {
        let lev = LevenshteinAutomata::new(&chars_to_symbols("abc"), false);
        assert!(lev.to_automaton(3, &[]).is_err());
    }

    #[test]
    fn prefix_must_match_exactly_before_fuzzy_matching_applies() {
        let lev = LevenshteinAutomata::new(&chars_to_symbols("log"), false);
        let a = lev.to_automaton(1, &chars_to_symbols("sys/")).unwrap();
        assert!(run(&a, &chars_to_symbols("sys/log")));
        assert!(run(&a, &chars_to_symbols("sys/lag")));
        assert!(!run(&a, &chars_to_symbols("syz/log")));
    }

    #[test]
    fn compiled_matcher_agrees_with_run_after_minimize() {
        let lev = LevenshteinAutomata::new(&chars_to_symbols("hello"), false);
        let nfa = lev.to_automaton(2, &[]).unwrap();
        let min = minimize(&nfa);
        let compiled = CompiledAutomaton::new(&min).unwrap();
        for candidate in ["hello", "hallo", "help", "jello", "worldly", "h"] {
            let symbols = chars_to_symbols(candidate);
            assert_eq!(
                compiled.matches(&symbols),
                run(&determinize(&nfa), &symbols),
                "mismatch on {candidate:?}"
            );
        }
    }

    #[test]
    fn minimized_automaton_is_deterministic_and_compiles() {
        let lev = LevenshteinAutomata::new(&chars_to_symbols("automaton"), true);
        let nfa = lev.to_automaton(2, &[]).unwrap();
        let min = minimize(&nfa);
        assert!(min.is_deterministic());
        assert!(CompiledAutomaton::new(&min).is_ok());
    }
}
