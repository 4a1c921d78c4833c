//! Property tests for the parametric Levenshtein automaton builder,
//! checked against a textbook dynamic-programming edit distance.

use proptest::prelude::*;

use levenshtein_automata_core::{minimize, symbols::chars_to_symbols, CompiledAutomaton, LevenshteinAutomata};

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c]{0,6}").unwrap()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b.len()).collect();
    for (i, &ac) in a.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, &bc) in b.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }
    dp[b.len()]
}

fn matcher(word: &str, n: u8) -> CompiledAutomaton {
    let lev = LevenshteinAutomata::new(&chars_to_symbols(word), false);
    let min = minimize(&lev.to_automaton(n, &[]).unwrap());
    CompiledAutomaton::new(&min).unwrap()
}

proptest! {
    #[test]
    fn degree_zero_matches_only_exact(word in word_strategy(), probe in word_strategy()) {
        let m = matcher(&word, 0);
        prop_assert_eq!(m.matches_str(&probe), word == probe);
    }

    #[test]
    fn matcher_agrees_with_dp_distance(word in word_strategy(), probe in word_strategy(), n in 0u8..=2) {
        let m = matcher(&word, n);
        let d = edit_distance(&word, &probe);
        prop_assert_eq!(m.matches_str(&probe), d <= n as usize);
    }

    #[test]
    fn word_always_matches_itself(word in word_strategy(), n in 0u8..=2) {
        let m = matcher(&word, n);
        prop_assert!(m.matches_str(&word));
    }

    #[test]
    fn wider_distance_accepts_everything_a_narrower_one_does(
        word in word_strategy(),
        probe in word_strategy(),
    ) {
        let narrow = matcher(&word, 0);
        let wide = matcher(&word, 1);
        if narrow.matches_str(&probe) {
            prop_assert!(wide.matches_str(&probe));
        }
    }

    #[test]
    fn single_insertion_is_within_distance_one(word in word_strategy(), idx in 0usize..8, ch in "[a-c]") {
        let mut chars: Vec<char> = word.chars().collect();
        let at = idx.min(chars.len());
        chars.insert(at, ch.chars().next().unwrap());
        let inserted: String = chars.into_iter().collect();

        let m = matcher(&word, 1);
        prop_assert!(m.matches_str(&inserted));
    }

    #[test]
    fn prefix_must_match_exactly(prefix in word_strategy(), rest in word_strategy(), probe in word_strategy()) {
        let lev = LevenshteinAutomata::new(&chars_to_symbols(&rest), false);
        let min = minimize(&lev.to_automaton(1, &chars_to_symbols(&prefix)).unwrap());
        let m = CompiledAutomaton::new(&min).unwrap();

        if !probe.starts_with(&prefix) {
            prop_assert!(!m.matches_str(&probe));
        }
    }
}
