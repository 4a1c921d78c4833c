// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deterministic Levenshtein-distance automata: build, determinize,
//! minimize, and run.
//!
//! Builds a DFA that accepts exactly the strings within a given edit
//! distance of a fixed query word, optionally counting an adjacent-
//! character transposition as a single edit, and compiles it into a
//! matcher that runs in time linear in input length. One automaton is
//! built per query; many candidates are then tested against it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ levenshtein  │────▶│  determinize  │────▶│   minimize   │
//! │ (word, n) →  │     │  (subset      │     │  (Hopcroft   │
//! │     NFA      │     │  construction)│     │  refinement) │
//! └──────────────┘     └───────────────┘     └──────┬───────┘
//!                                                     │
//!                                                     ▼
//!                                            ┌──────────────┐
//!                                            │   compiled   │
//!                                            │ (O(1)/symbol │
//!                                            │   matcher)   │
//!                                            └──────────────┘
//! ```
//!
//! `automaton` and `algebra` underlie every stage above: the mutable graph
//! representation and the operations (union, concatenate, reverse, ...)
//! that combine and inspect it.
//!
//! # Usage
//!
//! ```
//! use levenshtein_automata_core::{determinize, minimize, run, symbols::chars_to_symbols, CompiledAutomaton, LevenshteinAutomata};
//!
//! let lev = LevenshteinAutomata::new(&chars_to_symbols("kitten"), false);
//! let nfa = lev.to_automaton(2, &[]).unwrap();
//! let min = minimize(&nfa);
//! let matcher = CompiledAutomaton::new(&min).unwrap();
//!
//! assert!(matcher.matches_str("sittin"));
//! assert!(!matcher.matches_str("sitting"));
//! assert_eq!(matcher.matches(&chars_to_symbols("kitten")), run(&determinize(&nfa), &chars_to_symbols("kitten")));
//! ```

pub mod algebra;
pub mod automaton;
pub mod bits;
pub mod compiled;
#[cfg(any(test, doc))]
pub mod contracts;
#[cfg(not(any(test, doc)))]
mod contracts;
pub mod determinize;
pub mod error;
pub mod fuzzy;
pub mod int_set;
pub mod levenshtein;
pub mod minimize;
pub mod symbols;

#[cfg(test)]
pub(crate) mod testing;

pub use algebra::{
    concatenate, get_common_prefix, intersection, is_empty, is_finite, optional, remove_dead_states,
    repeat, repeat_min, reverse, run, same_language, subset_of, totalize, union,
};
pub use automaton::{Automaton, AutomatonBuilder, Symbol, Transition, DEFAULT_ALPHA_MAX};
pub use compiled::CompiledAutomaton;
pub use determinize::determinize;
pub use error::{AutomatonError, Result};
pub use fuzzy::levenshtein_within;
pub use int_set::{FrozenIntSet, SortedIntSet};
pub use levenshtein::{LevenshteinAutomata, MAXIMUM_SUPPORTED_DISTANCE};
pub use minimize::minimize;
