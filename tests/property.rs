//! Property-based tests for the automaton core.

#[path = "property/automaton.rs"]
mod automaton;

#[path = "property/levenshtein.rs"]
mod levenshtein;
