// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the parametric Levenshtein DFA builder.
//!
//! Builds a Levenshtein automaton for an arbitrary word and distance,
//! compiles it, and checks the compiled matcher's verdict against a naive
//! edit-distance computation on a handful of arbitrary probe strings. This
//! is the property the whole crate exists to guarantee: the fast path and
//! the textbook DP must never disagree.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use levenshtein_automata_core::{minimize, symbols::chars_to_symbols, CompiledAutomaton, LevenshteinAutomata};

#[derive(Debug, Arbitrary)]
struct DfaInput {
    word: String,
    probe: String,
    distance: u8,
    transpositions: bool,
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b.len()).collect();
    for (i, &ac) in a.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, &bc) in b.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = if ac == bc { 0 } else { 1 };
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }
    dp[b.len()]
}

fuzz_target!(|input: DfaInput| {
    let word: String = input.word.chars().take(24).collect();
    let probe: String = input.probe.chars().take(24).collect();
    let n = input.distance % 3; // 0, 1, or 2; keeps us inside MAXIMUM_SUPPORTED_DISTANCE

    let lev = LevenshteinAutomata::new(&chars_to_symbols(&word), input.transpositions);
    let nfa = match lev.to_automaton(n, &[]) {
        Ok(a) => a,
        Err(_) => return,
    };
    let min = minimize(&nfa);
    let matcher = match CompiledAutomaton::new(&min) {
        Ok(m) => m,
        Err(_) => return,
    };

    let accepted = matcher.matches_str(&probe);
    let distance = levenshtein_distance(&word, &probe);

    if input.transpositions {
        // With transpositions enabled the automaton can accept strings the plain
        // DP distance says are one edit further away (a transposition costs 1,
        // not 2), so only the "definitely within n" direction is checked.
        if distance <= n as usize {
            assert!(accepted, "within plain edit distance {distance} <= {n} but automaton rejected");
        }
    } else {
        assert_eq!(
            accepted,
            distance <= n as usize,
            "automaton verdict {accepted} disagrees with edit distance {distance} (n={n}) for word={word:?} probe={probe:?}"
        );
    }
});
