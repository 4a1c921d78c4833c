// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the automaton algebra (union, intersection, concatenate,
//! reverse, minimize).
//!
//! Builds two exact-match automata from arbitrary words, combines them, and
//! checks the combined automaton's language against the boolean combination
//! of `run` on the two inputs directly. A mismatch means one of the algebra
//! operations produced a wrong automaton, not just a slow one.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use levenshtein_automata_core::{
    concatenate, determinize, intersection, minimize, reverse, run, same_language, union,
    LevenshteinAutomata,
};

#[derive(Debug, Arbitrary)]
struct AlgebraInput {
    word_a: Vec<u8>,
    word_b: Vec<u8>,
    probe: Vec<u8>,
}

fn symbols(bytes: &[u8]) -> Vec<u32> {
    bytes.iter().take(24).map(|&b| b as u32).collect()
}

fuzz_target!(|input: AlgebraInput| {
    let a_syms = symbols(&input.word_a);
    let b_syms = symbols(&input.word_b);
    let probe = symbols(&input.probe);

    let lev_a = LevenshteinAutomata::new(&a_syms, false);
    let lev_b = LevenshteinAutomata::new(&b_syms, false);
    let a = match lev_a.to_automaton(0, &[]) {
        Ok(a) => a,
        Err(_) => return,
    };
    let b = match lev_b.to_automaton(0, &[]) {
        Ok(b) => b,
        Err(_) => return,
    };

    let in_a = run(&determinize(&a), &probe);
    let in_b = run(&determinize(&b), &probe);

    if let Ok(u) = union(&[a.clone(), b.clone()]) {
        let min_u = minimize(&u);
        assert_eq!(run(&min_u, &probe), in_a || in_b, "union disagrees with run on inputs");
    }

    let inter = intersection(&determinize(&a), &determinize(&b));
    assert_eq!(run(&inter, &probe), in_a && in_b, "intersection disagrees with run on inputs");

    // probe == word_a exactly iff a accepts probe, since a is an exact-match automaton.
    assert_eq!(in_a, probe == a_syms);

    // Reversing twice (through minimize, which also determinizes) reproduces the same language.
    if let Ok(rev_once) = reverse(&a) {
        if let Ok(rev_twice) = reverse(&rev_once) {
            let min_a = minimize(&a);
            let min_twice = minimize(&rev_twice);
            assert!(same_language(&min_a, &min_twice), "double reverse changed the language");
        }
    }

    // Concatenating a with b then running the pair of words back to back should accept.
    if let Ok(cat) = concatenate(&[a.clone(), b.clone()]) {
        let min_cat = minimize(&cat);
        let mut joined = a_syms.clone();
        joined.extend_from_slice(&b_syms);
        assert!(run(&min_cat, &joined), "concatenation did not accept the joined word");
    }
});
