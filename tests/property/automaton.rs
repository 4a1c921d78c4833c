//! Property tests for the automaton algebra: union, intersection,
//! concatenation, reversal, and the membership/emptiness/subset predicates
//! built on top of them.
//!
//! Exact-match automata (edit distance 0) stand in for "an automaton built
//! from an arbitrary word" here, since `LevenshteinAutomata` is the only
//! automaton constructor this crate exposes publicly.

use proptest::prelude::*;

use levenshtein_automata_core::{
    concatenate, determinize, intersection, is_empty, is_finite, minimize, reverse, run,
    same_language, subset_of, symbols::chars_to_symbols, union, LevenshteinAutomata,
};

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c]{0,6}").unwrap()
}

fn exact(word: &str) -> levenshtein_automata_core::Automaton {
    LevenshteinAutomata::new(&chars_to_symbols(word), false)
        .to_automaton(0, &[])
        .expect("exact-match construction never fails")
}

proptest! {
    #[test]
    fn exact_automaton_accepts_only_its_own_word(word in word_strategy(), probe in word_strategy()) {
        let a = determinize(&exact(&word));
        prop_assert_eq!(run(&a, &chars_to_symbols(&probe)), word == probe);
    }

    #[test]
    fn union_accepts_iff_either_accepts(a in word_strategy(), b in word_strategy(), probe in word_strategy()) {
        let au = union(&[exact(&a), exact(&b)]).unwrap();
        let min = minimize(&au);
        let probe_syms = chars_to_symbols(&probe);
        prop_assert_eq!(run(&min, &probe_syms), probe == a || probe == b);
    }

    #[test]
    fn intersection_of_distinct_exact_words_is_empty(a in word_strategy(), b in word_strategy()) {
        prop_assume!(a != b);
        let inter = intersection(&determinize(&exact(&a)), &determinize(&exact(&b)));
        prop_assert!(is_empty(&inter));
    }

    #[test]
    fn intersection_of_identical_words_is_that_word(word in word_strategy()) {
        let inter = intersection(&determinize(&exact(&word)), &determinize(&exact(&word)));
        prop_assert!(same_language(&inter, &exact(&word)));
    }

    #[test]
    fn concatenation_accepts_the_joined_word(a in word_strategy(), b in word_strategy()) {
        let cat = concatenate(&[exact(&a), exact(&b)]).unwrap();
        let min = minimize(&cat);
        let mut joined = a.clone();
        joined.push_str(&b);
        prop_assert!(run(&min, &chars_to_symbols(&joined)));
    }

    #[test]
    fn reversing_twice_preserves_the_language(word in word_strategy()) {
        let a = exact(&word);
        let twice = reverse(&reverse(&a).unwrap()).unwrap();
        prop_assert!(same_language(&a, &twice));
    }

    #[test]
    fn reverse_accepts_the_reversed_word(word in word_strategy()) {
        let rev = minimize(&reverse(&exact(&word)).unwrap());
        let reversed: String = word.chars().rev().collect();
        prop_assert!(run(&rev, &chars_to_symbols(&reversed)));
    }

    #[test]
    fn every_exact_automaton_is_finite(word in word_strategy()) {
        prop_assert!(is_finite(&exact(&word)));
    }

    #[test]
    fn subset_of_is_reflexive(word in word_strategy()) {
        let d = determinize(&exact(&word));
        prop_assert!(subset_of(&d, &d).unwrap());
    }

    #[test]
    fn word_is_subset_of_its_union_with_another(a in word_strategy(), b in word_strategy()) {
        let au = minimize(&union(&[exact(&a), exact(&b)]).unwrap());
        let da = determinize(&exact(&a));
        prop_assert!(subset_of(&da, &au).unwrap());
    }
}
